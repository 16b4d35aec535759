//! Acceptance policy over a ranked candidate list.
//!
//! Three outcomes:
//! - top score at or above `accept_threshold`: confident match, top name
//!   accepted, unfiltered top-K returned as suggestions;
//! - otherwise, top-K filtered to `suggest_threshold`: a near miss the user
//!   should confirm, or no match when the filtered list is empty;
//! - cleaned text shorter than `min_text_len`: no match before any candidate
//!   is looked at.

use super::config::MatcherConfig;
use super::rank::top_suggestions;
use super::types::{Candidate, MatchDecision, MatchOutcome, NormalizedText};

/// True when the normalized text is too short to trust any match.
pub fn is_noise(normalized: &NormalizedText, config: &MatcherConfig) -> bool {
    normalized.char_len() < config.min_text_len
}

/// `ranked` must already be deduplicated and sorted (see `rank::rank`).
pub fn decide(
    ranked: &[Candidate],
    normalized: &NormalizedText,
    config: &MatcherConfig,
) -> MatchDecision {
    if is_noise(normalized, config) {
        return MatchDecision::no_match();
    }

    let Some(top) = ranked.first() else {
        return MatchDecision::no_match();
    };

    if top.score >= config.accept_threshold {
        return MatchDecision {
            accepted_name: Some(top.name.clone()),
            suggestions: top_suggestions(ranked, config.suggestion_limit),
            confidence: top.score,
            outcome: MatchOutcome::Confident,
        };
    }

    let suggestions: Vec<Candidate> = top_suggestions(ranked, config.suggestion_limit)
        .into_iter()
        .filter(|c| c.score >= config.suggest_threshold)
        .collect();

    let outcome = if suggestions.is_empty() {
        MatchOutcome::NoMatch
    } else {
        MatchOutcome::NeedsConfirmation
    };

    MatchDecision {
        accepted_name: None,
        suggestions,
        confidence: 0.0,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> NormalizedText {
        NormalizedText::from_tokens(s.split_whitespace().map(str::to_string).collect())
    }

    fn config() -> MatcherConfig {
        MatcherConfig {
            accept_threshold: 85.0,
            suggest_threshold: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_top_at_threshold() {
        let ranked = vec![Candidate::new("Paracetamol", 85.0), Candidate::new("Ibuprofeno", 40.0)];
        let decision = decide(&ranked, &text("paracetamol"), &config());

        assert_eq!(decision.accepted_name.as_deref(), Some("Paracetamol"));
        assert_eq!(decision.outcome, MatchOutcome::Confident);
        assert_eq!(decision.confidence, 85.0);
        // Accepted results keep low-scoring suggestions
        assert_eq!(decision.suggestions.len(), 2);
    }

    #[test]
    fn below_threshold_filters_suggestions() {
        let ranked = vec![
            Candidate::new("Paracetamol", 84.9),
            Candidate::new("Pantoprazol", 61.0),
            Candidate::new("Ibuprofeno", 40.0),
        ];
        let decision = decide(&ranked, &text("paracetaol"), &config());

        assert!(decision.accepted_name.is_none());
        assert_eq!(decision.outcome, MatchOutcome::NeedsConfirmation);
        assert_eq!(decision.confidence, 0.0);
        let names: Vec<_> = decision.suggestions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol", "Pantoprazol"]);
    }

    #[test]
    fn nothing_above_suggest_threshold_is_no_match() {
        let ranked = vec![Candidate::new("Paracetamol", 45.0)];
        let decision = decide(&ranked, &text("factura numero"), &config());
        assert_eq!(decision, MatchDecision::no_match());
    }

    #[test]
    fn empty_ranked_is_no_match() {
        let decision = decide(&[], &text("paracetamol"), &config());
        assert_eq!(decision, MatchDecision::no_match());
    }

    #[test]
    fn short_text_short_circuits_before_candidates() {
        let ranked = vec![Candidate::new("Paracetamol", 100.0)];
        let decision = decide(&ranked, &text("par"), &config());
        assert_eq!(decision, MatchDecision::no_match());
        assert!(is_noise(&text(""), &config()));
        assert!(!is_noise(&text("abcd"), &config()));
    }

    #[test]
    fn suggestions_capped_at_limit() {
        let ranked: Vec<Candidate> = (0..9)
            .map(|i| Candidate::new(format!("Med{i}"), 95.0 - i as f64))
            .collect();
        let decision = decide(&ranked, &text("medicamento"), &config());
        assert_eq!(decision.suggestions.len(), 5);
        assert_eq!(decision.suggestions[0].name, "Med0");
        assert_eq!(decision.suggestions[4].name, "Med4");
    }
}
