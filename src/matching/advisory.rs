//! Optional post-acceptance plausibility review.
//!
//! A reviewer (typically an external language model) gets the accepted record
//! and the raw detected text and returns a verdict. The verdict is attached to
//! the result as a note. It never changes what was accepted, and a failing
//! reviewer only costs the note.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CatalogEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryVerdict {
    pub plausible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Reviewer unavailable: {0}")]
    Unavailable(String),

    #[error("Reviewer returned an unusable response: {0}")]
    InvalidResponse(String),
}

pub trait PlausibilityReview: Send + Sync {
    fn review(
        &self,
        entry: &CatalogEntry,
        detected_text: &str,
    ) -> Result<AdvisoryVerdict, AdvisoryError>;
}
