use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::Candidate;

/// Score descending, then name ascending so equal scores order reproducibly.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_candidates);
}

/// Collapse candidates to one entry per name holding the best score seen for
/// it, ordered by `compare_candidates`. The list is not truncated.
pub fn rank(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut best: HashMap<String, f64> = HashMap::with_capacity(candidates.len());

    for Candidate { name, score } in candidates {
        best.entry(name)
            .and_modify(|kept| {
                if score > *kept {
                    *kept = score;
                }
            })
            .or_insert(score);
    }

    let mut ranked: Vec<Candidate> = best
        .into_iter()
        .map(|(name, score)| Candidate { name, score })
        .collect();
    sort_candidates(&mut ranked);
    ranked
}

/// Public suggestion list: the first `limit` ranked entries.
pub fn top_suggestions(ranked: &[Candidate], limit: usize) -> Vec<Candidate> {
    ranked.iter().take(limit).cloned().collect()
}
