//! String similarity ratios on a 0 to 100 scale.
//!
//! Every scorer here is built on the indel distance (insertions and deletions
//! only), so the base `ratio` is `2 * LCS / (len_a + len_b) * 100`. The token
//! and weighted variants combine that base ratio the way fuzzy-matching
//! libraries usually do, which keeps scores comparable across scorers.
//!
//! Inputs are compared as given. Callers are expected to pass text that has
//! already been cleaned and lowercased. An empty input on either side scores 0.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Down-weighting applied to token-based ratios in `weighted_ratio`.
const UNBASE_SCALE: f64 = 0.95;

/// Length ratio below which `weighted_ratio` skips the partial scorers.
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which partial scores are scaled down harder.
const LONG_LENGTH_RATIO: f64 = 8.0;

/// Selectable similarity scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    Ratio,
    PartialRatio,
    TokenSortRatio,
    TokenSetRatio,
    PartialTokenRatio,
    WeightedRatio,
}

impl Scorer {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Scorer::Ratio => ratio(a, b),
            Scorer::PartialRatio => partial_ratio(a, b),
            Scorer::TokenSortRatio => token_sort_ratio(a, b),
            Scorer::TokenSetRatio => token_set_ratio(a, b),
            Scorer::PartialTokenRatio => partial_token_ratio(a, b),
            Scorer::WeightedRatio => weighted_ratio(a, b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scorer::Ratio => "ratio",
            Scorer::PartialRatio => "partial_ratio",
            Scorer::TokenSortRatio => "token_sort_ratio",
            Scorer::TokenSetRatio => "token_set_ratio",
            Scorer::PartialTokenRatio => "partial_token_ratio",
            Scorer::WeightedRatio => "weighted_ratio",
        }
    }
}

/// Normalized indel similarity of two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    ratio_chars(&a_chars, &b_chars)
}

/// Best `ratio` of the shorter string against any equally long window of the
/// longer one. Windows hanging off either end are included, so a query that
/// matches a prefix or suffix of the target still scores high.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return 0.0;
    }

    let pattern = PatternMask::new(&short);
    let long_masks: Option<Vec<u64>> = pattern
        .as_ref()
        .map(|p| long.iter().map(|&c| p.mask(c)).collect());
    let in_short: HashSet<char> = short.iter().copied().collect();

    let k = short.len();
    let n = long.len() as isize;
    let mut best = 0.0f64;

    for start in (1 - k as isize)..n {
        let from = start.max(0) as usize;
        let to = (start + k as isize).min(n) as usize;

        // A window whose outer character is absent from `short` never beats
        // its neighbour one step inward: same LCS, same or shorter length.
        let outer = if start < 0 { long[to - 1] } else { long[from] };
        if !in_short.contains(&outer) {
            continue;
        }

        let width = to - from;
        let total = (k + width) as f64;
        if 200.0 * width as f64 / total <= best {
            continue;
        }

        let common = match &long_masks {
            Some(masks) => lcs_from_masks(k, &masks[from..to]),
            None => lcs_dp(&short, &long[from..to]),
        };
        let score = 200.0 * common as f64 / total;
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// `ratio` after sorting the whitespace-separated tokens of both inputs.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Set-based comparison: shared tokens are compared against each side's
/// shared-plus-remaining tokens. A side whose tokens are all shared scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let split = TokenSplit::new(a, b);
    if split.is_empty_side() {
        return 0.0;
    }
    if split.one_side_contained() {
        return 100.0;
    }

    let sect = split.common.join(" ");
    let combined_a = join_nonempty(&sect, &split.only_a.join(" "));
    let combined_b = join_nonempty(&sect, &split.only_b.join(" "));

    let mut best = ratio(&combined_a, &combined_b);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_a))
            .max(ratio(&sect, &combined_b));
    }
    best
}

/// Best of the partial token-sort and partial token-set ratios.
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let split = TokenSplit::new(a, b);
    if split.is_empty_side() {
        return 0.0;
    }
    // Any shared token is a full partial match.
    if !split.common.is_empty() {
        return 100.0;
    }

    let sort_score = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));
    let set_score = partial_ratio(&split.only_a.join(" "), &split.only_b.join(" "));
    sort_score.max(set_score)
}

/// Composite ratio tolerant of word reordering, partial token overlap and
/// large length differences.
///
/// Similar lengths use the plain and token ratios. Once one side is at least
/// 1.5x longer the partial scorers join in, scaled down so that a substring
/// hit never outranks a full-string match.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let mut best = ratio(a, b);

    if len_ratio < PARTIAL_LENGTH_RATIO {
        let token_score = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return best.max(token_score * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < LONG_LENGTH_RATIO { 0.9 } else { 0.6 };
    best = best.max(partial_ratio(a, b) * partial_scale);
    best.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    match PatternMask::new(short) {
        Some(pattern) => {
            let masks: Vec<u64> = long.iter().map(|&c| pattern.mask(c)).collect();
            lcs_from_masks(short.len(), &masks)
        }
        None => lcs_dp(a, b),
    }
}

/// Two-row DP, used for patterns longer than one machine word.
fn lcs_dp(a: &[char], b: &[char]) -> usize {
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for &a_ch in a {
        for (j, &b_ch) in b.iter().enumerate() {
            curr[j + 1] = if a_ch == b_ch {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Per-character position bitmasks of a pattern of at most 64 characters.
struct PatternMask {
    masks: HashMap<char, u64>,
}

impl PatternMask {
    fn new(pattern: &[char]) -> Option<Self> {
        if pattern.len() > 64 {
            return None;
        }
        let mut masks = HashMap::with_capacity(pattern.len());
        for (i, &c) in pattern.iter().enumerate() {
            *masks.entry(c).or_insert(0u64) |= 1u64 << i;
        }
        Some(Self { masks })
    }

    fn mask(&self, c: char) -> u64 {
        self.masks.get(&c).copied().unwrap_or(0)
    }
}

/// Bit-parallel LCS (Hyyro) of a pattern against a text given as the
/// pattern masks of its characters. One word operation per text character.
fn lcs_from_masks(pattern_len: usize, text_masks: &[u64]) -> usize {
    let mut s = u64::MAX;
    for &m in text_masks {
        let u = s & m;
        s = s.wrapping_add(u) | s.wrapping_sub(u);
    }
    let valid = if pattern_len >= 64 {
        u64::MAX
    } else {
        (1u64 << pattern_len) - 1
    };
    (!s & valid).count_ones() as usize
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Token sets of two strings split into shared and per-side remainders,
/// each in sorted order.
struct TokenSplit<'a> {
    common: Vec<&'a str>,
    only_a: Vec<&'a str>,
    only_b: Vec<&'a str>,
}

impl<'a> TokenSplit<'a> {
    fn new(a: &'a str, b: &'a str) -> Self {
        let set_a: BTreeSet<&str> = a.split_whitespace().collect();
        let set_b: BTreeSet<&str> = b.split_whitespace().collect();
        Self {
            common: set_a.intersection(&set_b).copied().collect(),
            only_a: set_a.difference(&set_b).copied().collect(),
            only_b: set_b.difference(&set_a).copied().collect(),
        }
    }

    fn is_empty_side(&self) -> bool {
        (self.common.is_empty() && self.only_a.is_empty())
            || (self.common.is_empty() && self.only_b.is_empty())
    }

    fn one_side_contained(&self) -> bool {
        !self.common.is_empty() && (self.only_a.is_empty() || self.only_b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 0.01
    }

    #[test]
    fn lcs_basic() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(lcs_len(&chars("kitten"), &chars("sitting")), 4);
        assert_eq!(lcs_len(&chars("abc"), &chars("abc")), 3);
        assert_eq!(lcs_len(&chars("abc"), &chars("xyz")), 0);
    }

    #[test]
    fn bit_parallel_lcs_matches_dp() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        let long_name = "amoxicilina clavulanico suspension oral pediatrica 250 mg";
        let pairs = [
            ("kitten", "sitting"),
            ("paracetaol", "paracetamol"),
            ("ácido fólico", "acido folico"),
            ("aaaa", "aa"),
            ("xyz", "abc"),
            (long_name, "clavulanico amoxicilina"),
            (long_name, &long_name[5..]),
        ];
        for (a, b) in pairs {
            assert_eq!(lcs_len(&chars(a), &chars(b)), lcs_dp(&chars(a), &chars(b)), "{a:?} / {b:?}");
        }

        // 64 characters is still one word, 65 falls back to the DP
        let word: String = "abcdefgh".repeat(8);
        let over = format!("{word}z");
        assert_eq!(lcs_len(&chars(&word), &chars(&over)), 64);
        assert_eq!(lcs_len(&chars(&over), &chars(&over)), 65);
    }

    /// Every window scored with the plain DP, no skipping.
    fn partial_ratio_exhaustive(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        if short.is_empty() {
            return 0.0;
        }
        let k = short.len() as isize;
        let n = long.len() as isize;
        ((1 - k)..n)
            .map(|start| {
                let from = start.max(0) as usize;
                let to = (start + k).min(n) as usize;
                let window = &long[from..to];
                200.0 * lcs_dp(&short, window) as f64 / (short.len() + window.len()) as f64
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn partial_ratio_window_skipping_is_exact() {
        let pairs = [
            ("paracetaol", "paracetamol forte"),
            ("molxyz", "paracetamol"),
            ("factura", "paracetamol"),
            ("lote vence ibuprofen 400", "ibuprofeno"),
            ("qqq", "paracetamol"),
            ("loratadina", "lote 4471 vence 2026 loratadna industria argentina"),
        ];
        for (a, b) in pairs {
            assert_eq!(partial_ratio(a, b), partial_ratio_exhaustive(a, b), "{a:?} / {b:?}");
        }
    }

    #[test]
    fn long_ocr_text_is_scored() {
        let mut text = "lote vence industria argentina comprimidos ".repeat(100);
        text.push_str("paracetamol ");
        text.push_str(&"registro sanitario ".repeat(100));

        assert_eq!(partial_ratio("paracetamol", &text), 100.0);
        let score = weighted_ratio(&text, "paracetamol");
        assert!(approx(score, 60.0), "got {score}");
    }

    #[test]
    fn ratio_identical_is_100() {
        assert!(approx(ratio("paracetamol", "paracetamol"), 100.0));
    }

    #[test]
    fn ratio_single_deletion() {
        // LCS 10 over 21 characters
        let score = ratio("paracetaol", "paracetamol");
        assert!(approx(score, 2000.0 / 21.0), "got {score}");
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(ratio("", "abc"), 0.0);
        assert_eq!(ratio("", ""), 0.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
        assert_eq!(token_set_ratio("", "abc"), 0.0);
        assert_eq!(weighted_ratio("abc", ""), 0.0);
    }

    #[test]
    fn partial_ratio_rewards_substring() {
        assert!(approx(partial_ratio("amoxicilina", "amoxicilina clavulanico"), 100.0));
        assert!(approx(partial_ratio("clavulanico", "amoxicilina clavulanico"), 100.0));
    }

    #[test]
    fn partial_ratio_is_symmetric() {
        let ab = partial_ratio("ibuprofeno", "ibuprofeno forte");
        let ba = partial_ratio("ibuprofeno forte", "ibuprofeno");
        assert!(approx(ab, ba));
    }

    #[test]
    fn partial_ratio_tolerates_edge_overlap() {
        // Only a prefix of the query hangs onto the end of the target
        let score = partial_ratio("molxyz", "paracetamol");
        assert!(score >= 50.0, "got {score}");
    }

    #[test]
    fn token_sort_ignores_word_order() {
        assert!(approx(token_sort_ratio("acido folico", "folico acido"), 100.0));
        assert!(ratio("acido folico", "folico acido") < 100.0);
    }

    #[test]
    fn token_set_contained_side_is_100() {
        assert!(approx(token_set_ratio("paracetamol", "paracetamol forte"), 100.0));
    }

    #[test]
    fn token_set_disjoint_falls_back_to_ratio() {
        let score = token_set_ratio("ibuprofeno", "amoxicilina");
        assert!(approx(score, ratio("ibuprofeno", "amoxicilina")));
    }

    #[test]
    fn partial_token_ratio_shared_token() {
        assert!(approx(partial_token_ratio("caja paracetamol", "paracetamol"), 100.0));
    }

    #[test]
    fn weighted_ratio_exact_match() {
        assert!(approx(weighted_ratio("paracetamol", "paracetamol"), 100.0));
    }

    #[test]
    fn weighted_ratio_reordered_words() {
        let score = weighted_ratio("clavulanico amoxicilina", "amoxicilina clavulanico");
        assert!(approx(score, 95.0), "got {score}");
    }

    #[test]
    fn weighted_ratio_partial_is_capped_below_exact() {
        let score = weighted_ratio("paracetamol lote vence", "paracetamol");
        assert!(score < 100.0);
        assert!(approx(score, 90.0), "got {score}");
    }

    #[test]
    fn weighted_ratio_unrelated_is_low() {
        assert!(weighted_ratio("factura numero", "paracetamol") < 60.0);
    }

    #[test]
    fn scorer_dispatch_matches_functions() {
        let (a, b) = ("ibuprofeno", "ibuprofeno forte");
        assert_eq!(Scorer::Ratio.score(a, b), ratio(a, b));
        assert_eq!(Scorer::PartialRatio.score(a, b), partial_ratio(a, b));
        assert_eq!(Scorer::WeightedRatio.score(a, b), weighted_ratio(a, b));
    }

    #[test]
    fn scorer_serializes_snake_case() {
        let json = serde_json::to_string(&Scorer::WeightedRatio).unwrap();
        assert_eq!(json, "\"weighted_ratio\"");
        let parsed: Scorer = serde_json::from_str("\"partial_ratio\"").unwrap();
        assert_eq!(parsed, Scorer::PartialRatio);
    }
}
