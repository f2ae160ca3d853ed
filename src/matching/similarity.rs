use std::collections::HashSet;

/// Convert a count to f64 for ratio calculations.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Blend of token-set overlap and normalized edit distance, in [0, 1].
///
/// Both inputs are case-folded; tokens are whitespace-split. The score is
/// `0.6 * jaccard + 0.4 * (1 - levenshtein / longest)`, clamped to [0, 1],
/// where `longest` is the longer input's character count (minimum 1).
/// Returns 0 when either input is empty. Symmetric and pure.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_folded = a.to_lowercase();
    let b_folded = b.to_lowercase();

    let tokens_a = tokenize(&a_folded);
    let tokens_b = tokenize(&b_folded);
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count().max(1);
    let jaccard = count_to_f64(intersection) / count_to_f64(union);

    let longest = a.chars().count().max(b.chars().count()).max(1);
    let edit_score =
        1.0 - count_to_f64(strsim::levenshtein(&a_folded, &b_folded)) / count_to_f64(longest);

    (0.6 * jaccard + 0.4 * edit_score).clamp(0.0, 1.0)
}

fn tokenize(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}
