//! Core library for the multi-script word drill.
//!
//! Provides:
//! - Script-aware normalization (case, diacritics, Indic and Arabic folding)
//! - Language resolution from word, session and character ranges
//! - Cross-language concept matching for picture prompts
//! - Answer validation with a lenient fallback for high-variance scripts
//! - The session state machine and its countdown, plus a tokio driver

pub mod concept;
pub mod error;
pub mod live;
pub mod normalize;
pub mod resolver;
pub mod script;
pub mod session;
pub mod timer;
pub mod types;
pub mod validation;

pub use concept::{ConceptDictionary, ConceptEntry, ConceptMatch, ConceptPass};
pub use error::{DrillError, Result};
pub use live::LiveSession;
pub use normalize::{normalize, normalize_lenient, normalize_with, Strictness};
pub use resolver::resolve;
pub use script::Script;
pub use session::{
    AdvanceTicket, HistoryEntry, Phase, Response, SessionMachine, SessionState,
};
pub use timer::{SessionTimer, Tick, TimerStatus};
pub use types::{
    Difficulty, LanguageRef, MatchedVia, SessionConfig, SessionOverrides, ValidationResult, Word,
};
pub use validation::{levenshtein_distance, normalized_similarity, validate, Validator};
