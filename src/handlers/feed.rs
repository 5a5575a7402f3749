use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use chrono::Duration;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::metrics::{FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL};
use crate::middleware::ViewerContext;
use crate::models::{RankedFeedResponse, TopFeedResponse};
use crate::services::{FeedRankingService, FeedRequest};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;
/// Guard against absurd range values overflowing duration math.
const MAX_RANGE_UNITS: i64 = 100_000;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    /// Filter partition; the one required parameter.
    pub category: Option<String>,
    /// Time window like "7d", "90m", "240h". Malformed input falls back to
    /// the default rather than being rejected.
    pub range: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub cursor: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl FeedQueryParams {
    fn required_category(&self) -> Result<String> {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => Ok(category.to_string()),
            _ => Err(AppError::BadRequest("category is required".to_string())),
        }
    }

    fn clamped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT) as usize
    }

    fn window(&self) -> Duration {
        parse_range(self.range.as_deref())
    }

    fn to_request(&self, viewer: ViewerContext) -> Result<FeedRequest> {
        Ok(FeedRequest {
            category: self.required_category()?,
            window: self.window(),
            limit: self.clamped_limit(),
            cursor: self.cursor.clone(),
            viewer: viewer.0,
        })
    }
}

/// Parse a `<number><d|h|m>` time window. Absent or malformed input falls
/// back to seven days — never rejected.
fn parse_range(raw: Option<&str>) -> Duration {
    let default = Duration::days(7);

    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return default;
    };

    let Some(unit) = raw.chars().last().filter(char::is_ascii_alphabetic) else {
        return default;
    };
    let digits = &raw[..raw.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return default;
    }
    let Ok(value) = digits.parse::<i64>() else {
        return default;
    };
    let value = value.min(MAX_RANGE_UNITS);

    match unit {
        'd' => Duration::days(value),
        'h' => Duration::hours(value),
        'm' => Duration::minutes(value),
        _ => default,
    }
}

pub struct FeedHandlerState {
    pub feed: Arc<FeedRankingService>,
}

/// Ranked feed, v2 response shape.
#[get("/ranked")]
pub async fn get_ranked_feed(
    query: web::Query<FeedQueryParams>,
    viewer: ViewerContext,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let start = Instant::now();
    let request = query.to_request(viewer)?;

    debug!(
        category = %request.category,
        limit = request.limit,
        has_cursor = request.cursor.is_some(),
        "Ranked feed request"
    );

    let page = state.feed.get_page(&request).await?;

    FEED_REQUEST_TOTAL.with_label_values(&["ranked"]).inc();
    FEED_REQUEST_DURATION_SECONDS
        .with_label_values(&["ranked"])
        .observe(start.elapsed().as_secs_f64());

    // The feed is viewer-personalized and time-sensitive: a cached response
    // would go stale or leak one viewer's flags to another.
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(RankedFeedResponse {
            items: page.items,
            next_cursor: page.next_cursor,
        }))
}

/// Ranked feed, legacy "national top" response shape. Same ranking core as
/// `/ranked`; only the presentation differs.
#[get("/top")]
pub async fn get_top_feed(
    query: web::Query<FeedQueryParams>,
    viewer: ViewerContext,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let start = Instant::now();
    let request = query.to_request(viewer)?;

    debug!(
        category = %request.category,
        limit = request.limit,
        has_cursor = request.cursor.is_some(),
        "Top feed request (legacy shape)"
    );

    let page = state.feed.get_page(&request).await?;

    FEED_REQUEST_TOTAL.with_label_values(&["top"]).inc();
    FEED_REQUEST_DURATION_SECONDS
        .with_label_values(&["top"])
        .observe(start.elapsed().as_secs_f64());

    let has_more = page.next_cursor.is_some();
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(TopFeedResponse {
            plays: page.items,
            cursor: page.next_cursor,
            has_more,
        }))
}
