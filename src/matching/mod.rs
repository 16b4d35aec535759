//! Fuzzy resolution of OCR text to catalog names.

pub mod advisory;
pub mod candidates;
pub mod config;
pub mod normalize;
pub mod policy;
pub mod rank;
pub mod resolver;
pub mod similarity;
pub mod types;

pub use advisory::{AdvisoryError, AdvisoryVerdict, PlausibilityReview};
pub use config::MatcherConfig;
pub use normalize::Normalizer;
pub use resolver::{evaluate, resolve_names, Resolver};
pub use similarity::Scorer;
pub use types::{Candidate, MatchDecision, MatchOutcome, MatchResult, NormalizedText};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be within 0..=100, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("suggest_threshold ({suggest}) must not exceed accept_threshold ({accept})")]
    ThresholdOrder { suggest: f64, accept: f64 },

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("Failed to read matcher config {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse matcher config {0}: {1}")]
    Parse(String, String),
}
