//! Common test utilities and fixtures for integration tests.
//!
//! Everything runs in memory: the concept dictionary is the sample file
//! shipped under `data/`, and sessions are untimed unless a test opts in.

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;

use drill_core::{ConceptDictionary, SessionConfig};
use drill_server::config::ServerConfig;
use drill_server::{build_router, AppState};

/// Result delay used by every test session, in milliseconds.
pub const RESULT_DELAY_MS: u64 = 50;

/// Test context holding the shared application state.
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a new test context backed by the sample dictionary.
    pub fn new() -> Self {
        let dictionary = ConceptDictionary::from_json(fixtures::SAMPLE_DICTIONARY)
            .expect("sample dictionary should parse");

        let config = ServerConfig {
            session: SessionConfig {
                time_limit_secs: None,
                result_display_ms: RESULT_DELAY_MS,
                ..SessionConfig::default()
            },
            ..ServerConfig::default()
        };

        let state = AppState::new(config, dictionary);
        let app = build_router(state.clone());

        Self { state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}

/// Wait long enough for a pending result delay to elapse.
pub async fn wait_for_advance() {
    tokio::time::sleep(std::time::Duration::from_millis(RESULT_DELAY_MS * 4)).await;
}
