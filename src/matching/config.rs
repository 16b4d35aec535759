//! Matcher configuration: stop terms, candidate caps and thresholds.
//!
//! Every knob has a default, so a JSON config file only needs the fields it
//! overrides. `validate()` must pass before a config reaches the resolver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::similarity::Scorer;
use super::ConfigError;

/// Default stop terms (Spanish packaging, unit and regulatory words).
pub const DEFAULT_STOP_TERMS: &[&str] = &[
    "mg", "ml", "tabletas", "comprimidos", "capsulas", "jarabe", "solucion",
    "via", "oral", "uso", "industria", "venta", "libre", "bayer",
    "argentina", "genfarc", "farmacia", "análgesico", "analgesico",
    "antifebril",
    // Singular and accented packaging variants
    "tableta", "comprimido", "capsula", "cápsula", "cápsulas", "solución",
    "gotas", "suspension", "suspensión", "inyectable", "envase", "lote",
    "vence", "registro", "sanitario",
];

pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 96.0;
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Tokens dropped during normalization (case-insensitive).
    pub stop_terms: Vec<String>,
    /// Tokens with this many characters or fewer are dropped.
    pub short_token_len: usize,
    /// Drop numeric and number-plus-unit tokens such as `500mg`.
    pub drop_numeric_tokens: bool,
    /// Cleaned text shorter than this (in characters) is treated as noise.
    pub min_text_len: usize,
    /// Candidates kept per token in the token pass (M).
    pub per_token_limit: usize,
    /// Candidates kept in the phrase pass (N).
    pub phrase_limit: usize,
    /// Maximum suggestions returned (K).
    pub suggestion_limit: usize,
    pub accept_threshold: f64,
    pub suggest_threshold: f64,
    /// Substring-tolerant scorer for the token pass.
    pub token_scorer: Scorer,
    /// Composite scorer for the phrase pass.
    pub phrase_scorer: Scorer,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stop_terms: DEFAULT_STOP_TERMS.iter().map(|t| t.to_string()).collect(),
            short_token_len: 2,
            drop_numeric_tokens: true,
            min_text_len: 4,
            per_token_limit: 3,
            phrase_limit: 5,
            suggestion_limit: 5,
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
            token_scorer: Scorer::PartialRatio,
            phrase_scorer: Scorer::WeightedRatio,
        }
    }
}

impl MatcherConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(path.display().to_string(), e.to_string()))?;
        let config: MatcherConfig = serde_json::from_str(&json)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("accept_threshold", self.accept_threshold)?;
        check_threshold("suggest_threshold", self.suggest_threshold)?;

        if self.suggest_threshold > self.accept_threshold {
            return Err(ConfigError::ThresholdOrder {
                suggest: self.suggest_threshold,
                accept: self.accept_threshold,
            });
        }

        for (field, value) in [
            ("per_token_limit", self.per_token_limit),
            ("phrase_limit", self.phrase_limit),
            ("suggestion_limit", self.suggestion_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(field));
            }
        }

        Ok(())
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}
