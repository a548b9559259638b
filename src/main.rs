//! Drawing Companion HTTP server.

use std::sync::Arc;

use axum::Router;
use http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use drawing_companion::adapters::ai::{OpenAIConfig, OpenAIProvider};
use drawing_companion::adapters::http::{api_router, ApiHandlers, GuideHandlers, TopicHandlers, WelcomeHandlers};
use drawing_companion::adapters::llm::{
    LlmGuideWriter, LlmIntentClassifier, LlmTopicGenerator, LlmWelcomeResponder,
};
use drawing_companion::adapters::memory::{
    InMemoryConversationStore, InMemoryDrawingGuideStore, InMemorySessionStore, InMemoryTopicMetadataStore,
};
use drawing_companion::adapters::storage::LocalObjectStorage;
use drawing_companion::application::handlers::{
    ExplorationCollaborators, ExploreSettings, ExploreTopicsHandler, GetDrawingGuideHandler,
    GetTopicMetadataHandler, RecordEvaluationHandler, WelcomeHandler,
};
use drawing_companion::application::services::{
    MetadataCollaborators, RetryPolicy, SessionLocks, TopicMetadataCache,
};
use drawing_companion::config::{AppConfig, ServerConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let app = build_app(&config)?;

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "starting drawing companion");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));

    if config.server.json_logs() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_app(config: &AppConfig) -> Result<Router, BoxError> {
    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .ok_or("ai.openai_api_key is required")?;
    let openai = Arc::new(OpenAIProvider::new(
        OpenAIConfig::new(api_key.expose_secret().clone())
            .with_base_url(&config.ai.base_url)
            .with_model(&config.ai.text_model)
            .with_image_model(&config.ai.image_model)
            .with_image_size(&config.ai.image_size)
            .with_timeout(config.ai.timeout()),
    )?);

    let language = config.exploration.language.as_str();
    let topics = Arc::new(LlmTopicGenerator::new(openai.clone(), language));
    let writer = Arc::new(LlmGuideWriter::new(openai.clone(), language));
    let classifier = Arc::new(LlmIntentClassifier::new(openai.clone()));
    let responder = Arc::new(LlmWelcomeResponder::new(openai.clone(), language));

    let sessions = Arc::new(InMemorySessionStore::new());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let storage = Arc::new(LocalObjectStorage::new(
        &config.storage.root_dir,
        &config.storage.public_base_url,
        config.storage.download_timeout(),
    )?);

    let retry = RetryPolicy::new(
        config.ai.timeout(),
        config.ai.max_retries,
        config.ai.retry_base_delay(),
    );

    let cache = TopicMetadataCache::new(
        MetadataCollaborators {
            metadata: Arc::new(InMemoryTopicMetadataStore::new()),
            guides: Arc::new(InMemoryDrawingGuideStore::new()),
            images: openai,
            storage,
            writer: writer.clone(),
        },
        retry,
        Some(config.ai.image_size.clone()),
    );

    let settings = ExploreSettings {
        sample_size: config.exploration.sample_size,
        interest_window: config.exploration.interest_window,
        metadata_mode: config.exploration.metadata_mode,
        confirm_wait: config.exploration.confirm_wait(),
        session_ttl_secs: config.exploration.session_ttl_secs,
    };
    let explore = ExploreTopicsHandler::new(
        ExplorationCollaborators {
            sessions,
            conversations: conversations.clone(),
            generator: topics.clone(),
            chooser: topics,
            classifier,
            writer,
        },
        cache.clone(),
        SessionLocks::new(),
        retry,
        settings,
    );

    let handlers = ApiHandlers {
        topics: TopicHandlers::new(
            Arc::new(explore),
            Arc::new(GetTopicMetadataHandler::new(cache.clone())),
        ),
        welcome: WelcomeHandlers::new(Arc::new(WelcomeHandler::new(responder, conversations, retry))),
        guides: GuideHandlers::new(
            Arc::new(GetDrawingGuideHandler::new(cache.clone())),
            Arc::new(RecordEvaluationHandler::new(cache)),
        ),
    };

    Ok(api_router(handlers)
        .nest_service("/objects", ServeDir::new(&config.storage.root_dir))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .origins()
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
