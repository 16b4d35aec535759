use serde::{Deserialize, Serialize};

use super::advisory::AdvisoryVerdict;
use crate::models::CatalogEntry;

/// Cleaned query text plus the tokens that survived filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    pub cleaned: String,
    pub tokens: Vec<String>,
}

impl NormalizedText {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self {
            cleaned: tokens.join(" "),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty()
    }

    /// Length of the cleaned string in characters.
    pub fn char_len(&self) -> usize {
        self.cleaned.chars().count()
    }
}

/// A catalog name with the score it reached in one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Three-way outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Top candidate met the acceptance threshold.
    Confident,
    /// Nothing accepted, but some candidates cleared the suggestion threshold.
    NeedsConfirmation,
    NoMatch,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Confident => "confident",
            MatchOutcome::NeedsConfirmation => "needs_confirmation",
            MatchOutcome::NoMatch => "no_match",
        }
    }
}

/// Policy decision expressed in catalog names, before the accepted record is
/// looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub accepted_name: Option<String>,
    pub suggestions: Vec<Candidate>,
    pub confidence: f64,
    pub outcome: MatchOutcome,
}

impl MatchDecision {
    pub fn no_match() -> Self {
        Self {
            accepted_name: None,
            suggestions: Vec::new(),
            confidence: 0.0,
            outcome: MatchOutcome::NoMatch,
        }
    }
}

/// Final output of a resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub accepted: Option<CatalogEntry>,
    /// Score-descending, names unique.
    pub suggestions: Vec<Candidate>,
    /// Top score when `accepted` is set, otherwise 0.
    pub confidence: f64,
    pub outcome: MatchOutcome,
    /// Post-acceptance plausibility note. Never influences `accepted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<AdvisoryVerdict>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            accepted: None,
            suggestions: Vec::new(),
            confidence: 0.0,
            outcome: MatchOutcome::NoMatch,
            advisory: None,
        }
    }

    pub fn accepted_name(&self) -> Option<&str> {
        self.accepted.as_ref().map(|entry| entry.name.as_str())
    }

    /// Confidence rendered as a percentage with two decimals, e.g. `"95.24%"`.
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}
