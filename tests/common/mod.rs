//! Shared wiring for integration tests: the real application stack on top
//! of in-memory stores and mock AI collaborators.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use drawing_companion::adapters::ai::{MockAIProvider, MockImageGenerator};
use drawing_companion::adapters::http::{api_router, ApiHandlers, GuideHandlers, TopicHandlers, WelcomeHandlers};
use drawing_companion::adapters::llm::{
    purpose, LlmGuideWriter, LlmIntentClassifier, LlmTopicGenerator, LlmWelcomeResponder,
};
use drawing_companion::adapters::memory::{
    InMemoryConversationStore, InMemoryDrawingGuideStore, InMemorySessionStore, InMemoryTopicMetadataStore,
};
use drawing_companion::adapters::storage::InMemoryObjectStorage;
use drawing_companion::application::handlers::{
    ExplorationCollaborators, ExploreSettings, ExploreTopicsCommand, ExploreTopicsHandler,
    GetDrawingGuideHandler, GetTopicMetadataHandler, RecordEvaluationHandler, WelcomeHandler,
};
use drawing_companion::application::services::{
    MetadataCollaborators, RetryPolicy, SessionLocks, TopicMetadataCache,
};
use drawing_companion::domain::exploration::ExplorationSession;
use drawing_companion::domain::foundation::SessionId;
use drawing_companion::ports::SessionStore;

pub const GROUPS: &str = r#"{
    "animals": ["cat", "dog", "rabbit", "horse", "duck", "owl"],
    "garden": ["tulip", "sunflower", "watering can", "snail", "rose", "bench"]
}"#;

pub const GUIDE: &str = r#"{"steps": [
    {"title": "Outline", "instruction": "Draw the big shape first."},
    {"title": "Details", "instruction": "Add the small parts."},
    {"title": "Finish", "instruction": "Go over the lines you like."}
]}"#;

pub struct TestApp {
    pub ai: Arc<MockAIProvider>,
    pub images: Arc<MockImageGenerator>,
    pub sessions: Arc<InMemorySessionStore>,
    pub conversations: Arc<InMemoryConversationStore>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub cache: TopicMetadataCache,
    pub explore: Arc<ExploreTopicsHandler>,
    pub welcome: Arc<WelcomeHandler>,
    pub router: Router,
}

impl TestApp {
    /// An app whose model answers group, choice and guide requests sensibly.
    pub fn new() -> Self {
        Self::with_ai(
            MockAIProvider::new()
                .with_response_for(purpose::TOPIC_GROUPS, GROUPS)
                .with_response_for(purpose::GROUP_CHOICE, r#"{"group": "animals"}"#)
                .with_response_for(purpose::GUIDE, GUIDE),
        )
    }

    pub fn with_ai(ai: MockAIProvider) -> Self {
        let ai = Arc::new(ai);
        let images = Arc::new(MockImageGenerator::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let conversations = Arc::new(InMemoryConversationStore::new());
        let storage = Arc::new(InMemoryObjectStorage::default());
        let retry = RetryPolicy::new(Duration::from_secs(1), 1, Duration::from_millis(1));

        let topics = Arc::new(LlmTopicGenerator::new(ai.clone(), "English"));
        let writer = Arc::new(LlmGuideWriter::new(ai.clone(), "English"));

        let cache = TopicMetadataCache::new(
            MetadataCollaborators {
                metadata: Arc::new(InMemoryTopicMetadataStore::new()),
                guides: Arc::new(InMemoryDrawingGuideStore::new()),
                images: images.clone(),
                storage: storage.clone(),
                writer: writer.clone(),
            },
            retry,
            None,
        );

        let explore = Arc::new(ExploreTopicsHandler::new(
            ExplorationCollaborators {
                sessions: sessions.clone(),
                conversations: conversations.clone(),
                generator: topics.clone(),
                chooser: topics,
                classifier: Arc::new(LlmIntentClassifier::new(ai.clone())),
                writer,
            },
            cache.clone(),
            SessionLocks::new(),
            retry,
            ExploreSettings {
                confirm_wait: Duration::from_secs(2),
                ..ExploreSettings::default()
            },
        ));
        let welcome = Arc::new(WelcomeHandler::new(
            Arc::new(LlmWelcomeResponder::new(ai.clone(), "English")),
            conversations.clone(),
            retry,
        ));

        let router = api_router(ApiHandlers {
            topics: TopicHandlers::new(
                explore.clone(),
                Arc::new(GetTopicMetadataHandler::new(cache.clone())),
            ),
            welcome: WelcomeHandlers::new(welcome.clone()),
            guides: GuideHandlers::new(
                Arc::new(GetDrawingGuideHandler::new(cache.clone())),
                Arc::new(RecordEvaluationHandler::new(cache.clone())),
            ),
        });

        Self {
            ai,
            images,
            sessions,
            conversations,
            storage,
            cache,
            explore,
            welcome,
            router,
        }
    }

    /// Queues the classifier's verdict for the next reply.
    pub fn classify_as(&self, json: &str) {
        self.ai.push_response_for(purpose::INTENT, json);
    }

    pub async fn session(&self, id: &str) -> ExplorationSession {
        self.sessions
            .get(&sid(id))
            .await
            .unwrap()
            .expect("session should exist")
    }

    /// Sends a request through the router and decodes the JSON body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

pub fn sid(id: &str) -> SessionId {
    SessionId::new(id).unwrap()
}

pub fn say(session: &str, utterance: &str) -> ExploreTopicsCommand {
    ExploreTopicsCommand {
        session_id: sid(session),
        user_name: "Grandpa Lee".to_string(),
        rejected_count: 0,
        user_utterance: utterance.to_string(),
        is_timed_out: false,
    }
}

pub fn explore_body(session: &str, utterance: &str) -> Value {
    serde_json::json!({
        "sessionId": session,
        "userName": "Grandpa Lee",
        "rejectedCount": 0,
        "userUtterance": utterance,
        "isTimedOut": "false"
    })
}
