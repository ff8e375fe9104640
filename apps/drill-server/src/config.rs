//! Server configuration loaded from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use drill_core::SessionConfig;

use crate::services::sessions::{DEFAULT_IDLE_TIMEOUT, DEFAULT_RETENTION};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// JSON concept dictionary; without one only direct matches are possible.
    pub dictionary_path: Option<PathBuf>,

    /// Base for every new session before request overrides.
    pub session: SessionConfig,

    /// How long a completed session stays readable.
    pub session_retention: Duration,
    /// How long a session may go without a request before it is dropped.
    pub session_idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            dictionary_path: None,
            session: SessionConfig::default(),
            session_retention: DEFAULT_RETENTION,
            session_idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base = defaults.session;

        let time_limit_secs = match parsed::<u32, _>(&lookup, "DRILL_TIME_LIMIT_SECS") {
            Some(0) => None,
            Some(secs) => Some(secs),
            None => base.time_limit_secs,
        };

        let session = SessionConfig {
            points_per_correct: parsed(&lookup, "DRILL_POINTS_PER_CORRECT")
                .unwrap_or(base.points_per_correct),
            initial_lives: parsed(&lookup, "DRILL_INITIAL_LIVES")
                .filter(|lives: &u32| {
                    if *lives == 0 {
                        tracing::warn!("DRILL_INITIAL_LIVES must be at least 1, using default");
                    }
                    *lives > 0
                })
                .unwrap_or(base.initial_lives),
            max_hints: parsed(&lookup, "DRILL_MAX_HINTS").unwrap_or(base.max_hints),
            time_limit_secs,
            result_display_ms: parsed(&lookup, "DRILL_RESULT_DELAY_MS")
                .unwrap_or(base.result_display_ms),
            ..base
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            dictionary_path: lookup("CONCEPT_DICTIONARY_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            session,
            session_retention: parsed(&lookup, "SESSION_RETENTION_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_retention),
            session_idle_timeout: parsed(&lookup, "SESSION_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_timeout),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
