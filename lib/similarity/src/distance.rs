//! Similarity functions for normalized field values
//!
//! Both metrics are pure functions of their two inputs and return a score
//! in [0.0, 1.0] where 1.0 means identical.

use ahash::AHashMap;
use serde::Serialize;

/// The two independent syntactic scores of one field pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldScores {
    /// Dice coefficient over character bigram multisets
    pub bigram: f64,
    /// 1 - levenshtein / max(len)
    pub edit: f64,
}

/// Score two normalized strings with both metrics
pub fn score_pair(a: &str, b: &str) -> FieldScores {
    FieldScores {
        bigram: bigram_similarity(a, b),
        edit: edit_similarity(a, b),
    }
}

/// Dice coefficient over character bigrams
///
/// `2 * |A ∩ B| / (|A| + |B|)` where A and B are the bigram multisets.
/// Identical strings score 1.0 (including two empty strings); a string too
/// short to hold a bigram scores 0.0 against anything different.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let bigrams_a = bigram_counts(a);
    let bigrams_b = bigram_counts(b);

    let total_a: usize = bigrams_a.values().sum();
    let total_b: usize = bigrams_b.values().sum();
    if total_a == 0 || total_b == 0 {
        return 0.0;
    }

    let intersection: usize = bigrams_a
        .iter()
        .map(|(bigram, count_a)| {
            bigrams_b
                .get(bigram)
                .map_or(0, |count_b| (*count_a).min(*count_b))
        })
        .sum();

    (2.0 * intersection as f64) / (total_a + total_b) as f64
}

/// Normalized edit similarity
///
/// Unit-cost Levenshtein distance over Unicode scalar values, divided by the
/// longer length. Two empty strings score 1.0.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

/// Count character bigrams in a string
fn bigram_counts(s: &str) -> AHashMap<(char, char), usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = AHashMap::with_capacity(chars.len().saturating_sub(1));
    for w in chars.windows(2) {
        *counts.entry((w[0], w[1])).or_insert(0) += 1;
    }
    counts
}
