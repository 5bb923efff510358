use core::cmp::Ordering;

/// Descending score, then ascending position.
/// Equivalent to a stable descending sort over positions in corpus order.
#[inline(always)]
fn rank_cmp(scores: &[f64], a: usize, b: usize) -> Ordering {
    scores[b]
        .partial_cmp(&scores[a])
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.cmp(&b))
}

/// Top-`k` positions of `scores`, best first.
/// - ties keep ascending position order
/// - positions in `exclude` are never returned
/// - returns fewer than `k` positions when not enough are available
///
/// Complexity: O(n + k log k) via selection, then a sort of the head.
pub fn top_k_desc(scores: &[f64], k: usize, exclude: &[usize]) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }
    let mut positions: Vec<usize> = (0..scores.len())
        .filter(|pos| !exclude.contains(pos))
        .collect();

    if k < positions.len() {
        positions.select_nth_unstable_by(k - 1, |&a, &b| rank_cmp(scores, a, b));
        positions.truncate(k);
    }
    positions.sort_unstable_by(|&a, &b| rank_cmp(scores, a, b));
    positions
}
