/// Keyset pagination over the ranked sequence.
///
/// Given the full ranked order and an optional decoded cursor, keep only the
/// items sorting strictly after the cursor, then probe for `limit + 1` items:
/// receiving the extra one proves another page exists without a second
/// round-trip, and the `limit`-th item becomes the next cursor.
use crate::services::cursor::FeedCursor;
use crate::services::scoring::ScoredCandidate;

/// One page of ranked candidates plus the resume position, if any.
#[derive(Debug)]
pub struct RankedPage {
    pub items: Vec<ScoredCandidate>,
    pub next_cursor: Option<FeedCursor>,
}

/// True when `item` sorts strictly after the cursor position in the feed's
/// total order (lower score, or same score and older, or same score and
/// timestamp with a lexicographically smaller id).
fn sorts_after(item: &ScoredCandidate, cursor: &FeedCursor) -> bool {
    if item.score != cursor.score {
        return item.score < cursor.score;
    }
    if item.created_at != cursor.created_at {
        return item.created_at < cursor.created_at;
    }
    item.id < cursor.id
}

/// Apply the cursor filter and truncate to the page size.
///
/// `ranked` must already be in the feed's total order.
pub fn paginate(
    ranked: Vec<ScoredCandidate>,
    cursor: Option<&FeedCursor>,
    limit: usize,
) -> RankedPage {
    let mut remaining: Vec<ScoredCandidate> = match cursor {
        Some(cursor) => ranked
            .into_iter()
            .filter(|item| sorts_after(item, cursor))
            .collect(),
        None => ranked,
    };

    if remaining.len() > limit {
        remaining.truncate(limit);
        let last = &remaining[limit - 1];
        let next_cursor = Some(FeedCursor {
            score: last.score,
            created_at: last.created_at,
            id: last.id.clone(),
        });
        RankedPage {
            items: remaining,
            next_cursor,
        }
    } else {
        RankedPage {
            items: remaining,
            next_cursor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use crate::services::ranking::rank;
    use chrono::{DateTime, Duration, Utc};

    fn scored(id: &str, score: f64, created_at: DateTime<Utc>) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                id: id.to_string(),
                author_id: Some("author".to_string()),
                caption: None,
                media_key: Some("clips/x.mp4".to_string()),
                created_at,
                upvote_count: 0,
                comment_count: 0,
                latitude: None,
                longitude: None,
            },
            score,
            created_at,
            id: id.to_string(),
        }
    }

    fn ids(page: &RankedPage) -> Vec<&str> {
        page.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn first_page_and_probe() {
        let now = Utc::now();
        let ranked = rank(vec![
            scored("a", 50.0, now),
            scored("b", 40.0, now),
            scored("c", 30.0, now),
        ]);

        let page = paginate(ranked, None, 2);
        assert_eq!(ids(&page), vec!["a", "b"]);
        let cursor = page.next_cursor.expect("more items remain");
        assert_eq!(cursor.id, "b");
        assert_eq!(cursor.score, 40.0);
    }

    #[test]
    fn exhausted_pool_has_no_cursor() {
        let now = Utc::now();
        let ranked = rank(vec![scored("a", 50.0, now), scored("b", 40.0, now)]);

        // Exactly `limit` items left: no next page
        let page = paginate(ranked, None, 2);
        assert_eq!(ids(&page), vec!["a", "b"]);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_resumes_exact_suffix() {
        let now = Utc::now();
        let pool = vec![
            scored("a", 50.0, now),
            scored("b", 50.0, now - Duration::hours(1)),
            scored("c", 30.0, now),
            scored("d", 20.0, now),
            scored("e", 10.0, now),
        ];
        let ranked = rank(pool.clone());
        let full_order: Vec<String> = ranked.iter().map(|i| i.id.clone()).collect();

        let mut seen = Vec::new();
        let mut cursor: Option<FeedCursor> = None;
        loop {
            let page = paginate(rank(pool.clone()), cursor.as_ref(), 2);
            seen.extend(page.items.iter().map(|i| i.id.clone()));
            match page.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        // No duplicates, no gaps, same order as the unpaginated ranking
        assert_eq!(seen, full_order);
    }

    #[test]
    fn score_tie_resumes_by_timestamp_then_id() {
        let now = Utc::now();
        let pool = vec![
            scored("x", 50.0, now),
            scored("w", 50.0, now),
            scored("v", 50.0, now - Duration::hours(1)),
        ];

        // Ranked order: x (id desc beats w), w, v
        let page = paginate(rank(pool.clone()), None, 1);
        assert_eq!(ids(&page), vec!["x"]);

        let page = paginate(rank(pool.clone()), page.next_cursor.as_ref(), 1);
        assert_eq!(ids(&page), vec!["w"]);

        let page = paginate(rank(pool), page.next_cursor.as_ref(), 1);
        assert_eq!(ids(&page), vec!["v"]);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn empty_pool_yields_empty_page() {
        let page = paginate(Vec::new(), None, 10);
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
