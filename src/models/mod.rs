use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content item eligible for ranking, as fetched from the datastore.
///
/// Engagement counters are read-only snapshots taken at fetch time; the
/// engine never mutates them. `created_at` is immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: String,
    /// None when the author row was deleted; such candidates are excluded
    /// from the pool instead of failing the batch.
    pub author_id: Option<String>,
    pub caption: Option<String>,
    pub media_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i32,
    pub comment_count: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Author display info for hydrated feed items
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Fully hydrated feed item returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemPayload {
    pub id: String,
    pub media_url: Option<String>,
    /// Derived from the media reference's extension, not stored.
    pub media_kind: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub upvote_count: u32,
    pub comment_count: u32,
    /// Whether the current viewer has upvoted this item
    #[serde(default)]
    pub has_upvoted: bool,
    /// Whether the current viewer has bookmarked this item
    #[serde(default)]
    pub has_bookmarked: bool,
    pub author: AuthorSummary,
    #[serde(default)]
    pub is_following_author: bool,
}

/// v2 response shape: ranked items plus an opaque resume token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFeedResponse {
    pub items: Vec<FeedItemPayload>,
    pub next_cursor: Option<String>,
}

/// Legacy "national top" response shape, kept for older clients. Same
/// ranking core, different presentation adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFeedResponse {
    pub plays: Vec<FeedItemPayload>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Detect a coarse media kind from the reference's file extension.
pub fn media_kind(media_key: &str) -> &'static str {
    let ext = media_key
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "mov" | "webm" | "m4v" => "video",
        "jpg" | "jpeg" | "png" | "gif" | "webp" => "image",
        _ => "unknown",
    }
}
