//! Integration tests for the REST API.
//!
//! These tests drive the router end to end:
//! 1. Request bodies are validated before any handler runs
//! 2. Domain errors map to the documented status codes
//! 3. A confirmed topic exposes metadata, a guide and evaluation

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{explore_body, TestApp};
use drawing_companion::adapters::llm::purpose;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn first_explore_returns_three_topics() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/topics/explore", Some(explore_body("S1", "first")))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"].as_array().unwrap().len(), 3);
    assert_eq!(body["select"], "false");
    assert_eq!(body["status"], "ok");
    assert!(body["aiUtterance"].as_str().unwrap().contains("Grandpa Lee"));
}

#[tokio::test]
async fn invalid_timed_out_flag_is_rejected() {
    let app = TestApp::new();
    let mut body = explore_body("S1", "first");
    body["isTimedOut"] = json!("maybe");

    let (status, body) = app.send(Method::POST, "/topics/explore", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "isTimedOut");
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn negative_rejected_count_is_rejected() {
    let app = TestApp::new();
    let mut body = explore_body("S1", "first");
    body["rejectedCount"] = json!(-1);

    let (status, _) = app.send(Method::POST, "/topics/explore", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/topics/explore", Some(explore_body("nobody", "a cat")))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["sessionId"], "nobody");
}

#[tokio::test]
async fn confirmed_topic_exposes_metadata_guide_and_evaluation() {
    let app = TestApp::new();
    app.send(Method::POST, "/topics/explore", Some(explore_body("S1", "first")))
        .await;

    app.classify_as(r#"{"selectedTopic": "rabbit"}"#);
    let (_, proposed) = app
        .send(Method::POST, "/topics/explore", Some(explore_body("S1", "the rabbit")))
        .await;
    assert_eq!(proposed["topics"], "rabbit");
    assert_eq!(proposed["select"], "false");

    app.classify_as(r#"{"confirmedTopic": true}"#);
    app.ai.push_response_for(purpose::ENCOURAGEMENT, "Let's begin with the long ears!");
    let (status, confirmed) = app
        .send(Method::POST, "/topics/explore", Some(explore_body("S1", "yes")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["select"], "true");
    assert_eq!(confirmed["metadata"]["topic"], "rabbit");
    assert_eq!(confirmed["metadata"]["guidelineSteps"].as_array().unwrap().len(), 3);

    let (status, metadata) = app.send(Method::GET, "/topics/rabbit/metadata", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metadata["status"], "ready");
    assert!(metadata["metadata"]["imageRef"].as_str().unwrap().len() > 0);

    let (status, guide) = app.send(Method::GET, "/sessions/S1/guides/rabbit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(guide["sessionId"], "S1");
    assert_eq!(guide["steps"].as_array().unwrap().len(), 3);

    let (status, evaluated) = app
        .send(
            Method::POST,
            "/sessions/S1/guides/rabbit/evaluation",
            Some(json!({"score": 85, "feedback": "Lovely ears"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(evaluated["evaluation"]["score"], 85);

    let (status, _) = app
        .send(
            Method::POST,
            "/sessions/S1/guides/rabbit/evaluation",
            Some(json!({"score": 140})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn guide_for_unconfirmed_topic_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/sessions/S1/guides/cat", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GUIDE_NOT_FOUND");
}

#[tokio::test]
async fn metadata_of_unknown_topic_is_missing() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/topics/teapot/metadata", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "missing");
    assert!(body.get("metadata").is_none());
}

#[tokio::test]
async fn welcome_first_turn_greets_by_name() {
    let app = TestApp::new();
    app.ai.push_response_for(purpose::GREETING, "Good morning, Grandpa Lee!");

    let (status, body) = app
        .send(
            Method::POST,
            "/conversation/welcome",
            Some(json!({
                "sessionId": "S1",
                "userName": "Grandpa Lee",
                "userUtterance": "first",
                "attendanceStreak": 3
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aiUtterance"], "Good morning, Grandpa Lee!");
    assert_eq!(body["choice"], false);
}

#[tokio::test]
async fn welcome_reply_can_hand_over_to_exploration() {
    let app = TestApp::new();
    app.ai.push_response_for(
        purpose::WELCOME,
        r#"{"reply": "Wonderful, let's pick something!", "wantsToDraw": true, "interests": []}"#,
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/conversation/welcome",
            Some(json!({
                "sessionId": "S1",
                "userName": "Grandpa Lee",
                "userUtterance": "I'd like to draw today"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["choice"], true);
}
