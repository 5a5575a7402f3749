/// Final-page hydration.
///
/// Only the page about to be returned is hydrated — not the whole candidate
/// pool — to bound I/O. Author display info and per-viewer flags are fetched
/// in batches, and the paginator's order is preserved exactly: nothing after
/// this stage may re-sort.
use std::collections::HashSet;
use tracing::warn;

use crate::db::FeedStore;
use crate::error::Result;
use crate::models::{media_kind, FeedItemPayload};
use crate::services::scoring::ScoredCandidate;

/// Hydrate ranked page items into response payloads.
///
/// Items whose author lookup comes back empty (author deleted mid-request)
/// are dropped rather than failing the page.
pub async fn hydrate(
    store: &dyn FeedStore,
    viewer_id: Option<&str>,
    items: &[ScoredCandidate],
) -> Result<Vec<FeedItemPayload>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
    let author_ids: Vec<String> = items
        .iter()
        .filter_map(|i| i.candidate.author_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors = store.find_authors(&author_ids).await?;

    // Per-viewer flags only exist for signed-in viewers; the page-scoped
    // follow batch is cheaper than the pool-wide one used for scoring.
    let (upvoted, bookmarked, following) = match viewer_id {
        Some(viewer) => (
            store.find_upvoted(viewer, &item_ids).await?,
            store.find_bookmarked(viewer, &item_ids).await?,
            store.find_follow_edges(viewer, &author_ids).await?,
        ),
        None => (HashSet::new(), HashSet::new(), HashSet::new()),
    };

    let mut payloads = Vec::with_capacity(items.len());
    for item in items {
        let Some(author_id) = item.candidate.author_id.as_deref() else {
            continue;
        };
        let Some(author) = authors.get(author_id) else {
            warn!(item_id = %item.id, author_id = %author_id, "Dropping item with missing author");
            continue;
        };

        payloads.push(FeedItemPayload {
            id: item.id.clone(),
            media_url: item.candidate.media_key.clone(),
            media_kind: item
                .candidate
                .media_key
                .as_deref()
                .map(media_kind)
                .unwrap_or("unknown")
                .to_string(),
            caption: item.candidate.caption.clone(),
            created_at: item.created_at,
            upvote_count: item.candidate.upvote_count.max(0) as u32,
            comment_count: item.candidate.comment_count.max(0) as u32,
            has_upvoted: upvoted.contains(&item.id),
            has_bookmarked: bookmarked.contains(&item.id),
            author: author.clone(),
            is_following_author: following.contains(author_id),
        });
    }

    Ok(payloads)
}
