/// Total ordering over scored candidates.
///
/// Keyset pagination needs a *total* order, not a partial one: any two
/// distinct items must compare unequal, or rows could be duplicated or
/// skipped across pages. Primary key is score descending; ties break by
/// creation time descending (newer wins), then id descending. Unique ids
/// make the order strict.
use std::cmp::Ordering;

use crate::services::scoring::ScoredCandidate;

/// Strict weak ordering: score desc, created_at desc, id desc.
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    // total_cmp keeps the comparator transitive even for pathological floats.
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Sort candidates into the feed's total order, highest ranked first.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(compare);
    candidates
}
