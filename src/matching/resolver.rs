//! Resolution pipeline: normalize, generate, rank, decide, then materialize the accepted record.

use std::sync::Arc;

use super::advisory::PlausibilityReview;
use super::candidates::generate;
use super::config::MatcherConfig;
use super::normalize::Normalizer;
use super::policy::{decide, is_noise};
use super::rank::rank;
use super::types::{MatchDecision, MatchResult, NormalizedText};
use super::ConfigError;
use crate::catalog::{CatalogCache, CatalogError, CatalogProvider, PreparedCatalog};

/// Run the pure part of the pipeline against an already prepared catalog.
pub fn evaluate(
    normalized: &NormalizedText,
    catalog: &PreparedCatalog,
    config: &MatcherConfig,
) -> MatchDecision {
    if is_noise(normalized, config) {
        return MatchDecision::no_match();
    }
    let candidates = generate(normalized, catalog, config);
    let ranked = rank(candidates);
    decide(&ranked, normalized, config)
}

/// Resolve raw text against a plain list of catalog names.
///
/// No I/O and no shared state. `config` is assumed to have passed
/// `MatcherConfig::validate`.
pub fn resolve_names(raw_text: &str, names: &[String], config: &MatcherConfig) -> MatchDecision {
    let normalized = Normalizer::new(config).normalize(raw_text);
    let catalog = PreparedCatalog::from_names(None, names.iter().cloned());
    evaluate(&normalized, &catalog, config)
}

/// Entry point binding a catalog provider to a validated configuration.
pub struct Resolver<P: CatalogProvider> {
    catalog: P,
    config: MatcherConfig,
    normalizer: Normalizer,
    cache: CatalogCache,
    reviewer: Option<Arc<dyn PlausibilityReview>>,
}

impl<P: CatalogProvider> Resolver<P> {
    pub fn new(catalog: P, config: MatcherConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(&config),
            catalog,
            config,
            cache: CatalogCache::new(),
            reviewer: None,
        })
    }

    /// Attach a post-acceptance plausibility reviewer.
    pub fn with_reviewer(mut self, reviewer: Arc<dyn PlausibilityReview>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn catalog(&self) -> &P {
        &self.catalog
    }

    pub fn normalize(&self, raw_text: &str) -> NormalizedText {
        self.normalizer.normalize(raw_text)
    }

    pub fn resolve(&self, raw_text: &str) -> Result<MatchResult, CatalogError> {
        let normalized = self.normalizer.normalize(raw_text);
        if is_noise(&normalized, &self.config) {
            tracing::debug!(
                cleaned_len = normalized.char_len(),
                "Normalized text below minimum length, skipping catalog"
            );
            return Ok(MatchResult::no_match());
        }

        let catalog = self.cache.load(&self.catalog)?;
        let decision = evaluate(&normalized, &catalog, &self.config);

        tracing::debug!(
            tokens = normalized.tokens.len(),
            catalog_size = catalog.len(),
            outcome = decision.outcome.as_str(),
            top_score = decision.suggestions.first().map(|c| c.score).unwrap_or(0.0),
            "Resolved text against catalog"
        );

        self.materialize(decision, raw_text)
    }

    fn materialize(&self, decision: MatchDecision, raw_text: &str) -> Result<MatchResult, CatalogError> {
        let accepted = match decision.accepted_name {
            Some(name) => match self.catalog.find_by_name(&name)? {
                Some(entry) => Some(entry),
                None => {
                    tracing::warn!(name = %name, "Accepted name has no catalog record");
                    return Err(CatalogError::MissingRecord(name));
                }
            },
            None => None,
        };

        let advisory = match (&accepted, &self.reviewer) {
            (Some(entry), Some(reviewer)) => match reviewer.review(entry, raw_text) {
                Ok(verdict) => Some(verdict),
                Err(e) => {
                    tracing::warn!(error = %e, name = %entry.name, "Plausibility review failed");
                    None
                }
            },
            _ => None,
        };

        Ok(MatchResult {
            accepted,
            suggestions: decision.suggestions,
            confidence: decision.confidence,
            outcome: decision.outcome,
            advisory,
        })
    }
}
