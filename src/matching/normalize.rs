//! Cleaning of raw recognized text into comparison form.
//!
//! OCR output carries punctuation, dosage strings and packaging words that say
//! nothing about which medication is on the box. Normalization strips those so
//! the scorers only see tokens that can identify the product.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::config::MatcherConfig;
use super::types::NormalizedText;

/// Anything that is not a letter, digit or whitespace (accented vowels and ñ
/// are letters).
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());

/// Bare numbers and numbers fused with a dose unit: `12345`, `500mg`, `5ml`.
static DOSE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{N}+(?:mg|mcg|µg|ug|g|kg|ml|cc|l|ui|iu)?$").unwrap()
});

/// Replace non-word characters with spaces, collapse whitespace, lowercase.
///
/// Catalog names go through this too, without any token filtering.
pub fn clean(raw: &str) -> String {
    let replaced = NON_WORD.replace_all(raw, " ");
    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Token filter built once from a `MatcherConfig`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_terms: HashSet<String>,
    short_token_len: usize,
    drop_numeric_tokens: bool,
}

impl Normalizer {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            stop_terms: config
                .stop_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            short_token_len: config.short_token_len,
            drop_numeric_tokens: config.drop_numeric_tokens,
        }
    }

    /// Never fails: empty or all-noise input yields an empty `NormalizedText`.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let cleaned = clean(raw);
        let tokens = cleaned
            .split(' ')
            .filter(|token| self.keeps(token))
            .map(str::to_string)
            .collect();
        NormalizedText::from_tokens(tokens)
    }

    fn keeps(&self, token: &str) -> bool {
        if token.chars().count() <= self.short_token_len {
            return false;
        }
        if self.stop_terms.contains(token) {
            return false;
        }
        !(self.drop_numeric_tokens && DOSE_TOKEN.is_match(token))
    }
}
