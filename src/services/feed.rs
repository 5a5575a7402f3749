/// The ranked feed pipeline orchestrator.
///
/// Wires the stages strictly in sequence: fetch -> extract -> score -> rank
/// -> cursor filter -> paginate -> assemble. The pipeline is request-scoped
/// with no shared mutable state, so any number of requests may run it
/// concurrently; every suspension point is an awaited store call.
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::FeedConfig;
use crate::db::FeedStore;
use crate::error::{AppError, Result};
use crate::metrics::{FEED_CANDIDATE_COUNT, FEED_REQUEST_DURATION_SECONDS};
use crate::models::FeedItemPayload;
use crate::services::signals::{self, GeoPoint};
use crate::services::scoring::{score_candidate, RankingWeights, ScoredCandidate};
use crate::services::{cursor, pagination, ranking};

/// The viewer on whose behalf the feed is computed. Anonymous viewers get no
/// follow, locality, or per-viewer flags.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub id: Option<String>,
    pub location: Option<GeoPoint>,
}

/// One feed request after HTTP-level parsing and clamping.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub category: String,
    pub window: Duration,
    pub limit: usize,
    pub cursor: Option<String>,
    pub viewer: Viewer,
}

/// One assembled page plus the encoded resume token.
#[derive(Debug)]
pub struct FeedPage {
    pub items: Vec<FeedItemPayload>,
    pub next_cursor: Option<String>,
}

pub struct FeedRankingService {
    store: Arc<dyn FeedStore>,
    weights: RankingWeights,
    candidate_pool_size: usize,
    fetch_timeout: std::time::Duration,
    locality_radius_km: f64,
}

impl FeedRankingService {
    pub fn new(store: Arc<dyn FeedStore>, config: &FeedConfig) -> Self {
        Self {
            store,
            weights: RankingWeights::from(config),
            candidate_pool_size: config.candidate_pool_size.max(1),
            fetch_timeout: std::time::Duration::from_secs(config.fetch_timeout_secs.max(1)),
            locality_radius_km: config.locality_radius_km,
        }
    }

    pub fn with_weights(mut self, weights: RankingWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Run the full pipeline for one request.
    pub async fn get_page(&self, request: &FeedRequest) -> Result<FeedPage> {
        let start = Instant::now();
        let now = Utc::now();
        let since = now - request.window;

        // Stage 1: bounded candidate pool, newest first. A partial pool would
        // bias ranking nondeterministically between requests and break cursor
        // stability, so a timeout fails the whole request instead.
        let candidates = timeout(
            self.fetch_timeout,
            self.store
                .find_candidates(&request.category, since, self.candidate_pool_size as i64),
        )
        .await
        .map_err(|_| {
            warn!(category = %request.category, "Candidate fetch timed out");
            AppError::Unavailable("candidate fetch timed out".to_string())
        })??;

        FEED_CANDIDATE_COUNT
            .with_label_values(&["fetched"])
            .observe(candidates.len() as f64);

        // One malformed record must never fail the page: candidates missing
        // an author are excluded from the pool here.
        let eligible: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.author_id.is_some())
            .collect();

        // Stage 2: pool-wide follow set, batched once per request.
        let followed = self.pool_follow_set(&request.viewer, &eligible).await?;

        // Stages 3-4: score with an explicit `now`, then impose the total order.
        let scored: Vec<ScoredCandidate> = eligible
            .into_iter()
            .map(|candidate| {
                let bundle = signals::extract(
                    &candidate,
                    now,
                    &followed,
                    request.viewer.location,
                    self.locality_radius_km,
                );
                score_candidate(&self.weights, candidate, &bundle)
            })
            .collect();
        let ranked = ranking::rank(scored);

        // Stages 5-6: permissive cursor decode, then the limit+1 probe.
        let resume = cursor::decode(request.cursor.as_deref());
        let page = pagination::paginate(ranked, resume.as_ref(), request.limit);
        let next_cursor = page.next_cursor.as_ref().map(cursor::encode);

        // Stage 7: hydrate only the returned page.
        let items = super::assembler::hydrate(
            self.store.as_ref(),
            request.viewer.id.as_deref(),
            &page.items,
        )
        .await?;

        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&["pipeline"])
            .observe(start.elapsed().as_secs_f64());

        debug!(
            category = %request.category,
            items = items.len(),
            has_more = next_cursor.is_some(),
            "Feed page assembled"
        );

        Ok(FeedPage { items, next_cursor })
    }

    async fn pool_follow_set(
        &self,
        viewer: &Viewer,
        candidates: &[crate::models::Candidate],
    ) -> Result<HashSet<String>> {
        let Some(viewer_id) = viewer.id.as_deref() else {
            return Ok(HashSet::new());
        };

        let author_ids: Vec<String> = candidates
            .iter()
            .filter_map(|c| c.author_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        self.store.find_follow_edges(viewer_id, &author_ids).await
    }
}
