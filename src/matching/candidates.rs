//! Candidate generation: a per-token pass and a whole-phrase pass.
//!
//! OCR output often surfaces one correct token among garbage (the token pass
//! catches it) or the whole name with reordered or partial words (the phrase
//! pass catches it). Both pools are concatenated, not merged; deduplication
//! happens in `rank`.

use super::config::MatcherConfig;
use super::rank::sort_candidates;
use super::similarity::Scorer;
use super::types::{Candidate, NormalizedText};
use crate::catalog::PreparedCatalog;

pub fn generate(
    normalized: &NormalizedText,
    catalog: &PreparedCatalog,
    config: &MatcherConfig,
) -> Vec<Candidate> {
    if normalized.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(
        normalized.tokens.len() * config.per_token_limit + config.phrase_limit,
    );

    for token in &normalized.tokens {
        candidates.extend(top_scoring(
            token,
            catalog,
            config.token_scorer,
            config.per_token_limit,
        ));
    }

    candidates.extend(top_scoring(
        &normalized.cleaned,
        catalog,
        config.phrase_scorer,
        config.phrase_limit,
    ));

    candidates
}

/// Score `query` against every catalog name and keep the best `limit`.
fn top_scoring(
    query: &str,
    catalog: &PreparedCatalog,
    scorer: Scorer,
    limit: usize,
) -> Vec<Candidate> {
    let mut scored: Vec<Candidate> = catalog
        .names()
        .iter()
        .map(|entry| Candidate::new(entry.name.as_str(), scorer.score(query, &entry.comparable)))
        .collect();
    sort_candidates(&mut scored);
    scored.truncate(limit);
    scored
}
