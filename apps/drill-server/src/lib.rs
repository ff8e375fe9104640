pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use drill_core::{ConceptDictionary, Validator};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<Validator>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, dictionary: ConceptDictionary) -> Self {
        Self {
            validator: Arc::new(Validator::new(Arc::new(dictionary))),
            sessions: Arc::new(SessionStore::new(
                config.session_retention,
                config.session_idle_timeout,
            )),
            config: Arc::new(config),
        }
    }

    /// Load the configured concept dictionary, or start with an empty one.
    pub fn load(config: ServerConfig) -> anyhow::Result<Self> {
        let dictionary = match &config.dictionary_path {
            Some(path) => {
                tracing::info!("Loading concept dictionary from {}", path.display());
                let dictionary = ConceptDictionary::from_path(path)?;
                tracing::info!("Loaded {} concepts", dictionary.len());
                dictionary
            }
            None => {
                tracing::warn!("CONCEPT_DICTIONARY_PATH not set, concept prompts need exact answers");
                ConceptDictionary::default()
            }
        };
        Ok(Self::new(config, dictionary))
    }
}

/// Build the application router without middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/validate", post(routes::validate::validate))
        .route("/api/sessions", post(routes::sessions::create))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::close),
        )
        .route("/api/sessions/:id/submit", post(routes::sessions::submit))
        .route("/api/sessions/:id/skip", post(routes::sessions::skip))
        .route("/api/sessions/:id/hint", post(routes::sessions::hint))
        .route("/api/sessions/:id/restart", post(routes::sessions::restart))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = config.addr();
    let sweep_period = config
        .session_retention
        .min(Duration::from_secs(60))
        .max(Duration::from_secs(1));
    let state = AppState::load(config)?;
    state.sessions.spawn_sweeper(sweep_period);

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
