/// Datastore collaborator boundary for the feed pipeline.
///
/// The engine only needs simple filter/sort primitives from the store:
/// recency-ordered candidate pools and batched per-viewer lookups. Both are
/// expressed on the `FeedStore` trait so the pipeline can run against
/// Postgres in production and an in-memory store in tests.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::models::{AuthorSummary, Candidate};

#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Up to `limit` candidates in `category` created after `since`, newest
    /// first, restricted to items that carry media. Recency order here is a
    /// cheap pre-filter; the true order is only known after scoring.
    async fn find_candidates(
        &self,
        category: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Candidate>>;

    /// Subset of `author_ids` that `viewer_id` follows. Batched once per
    /// request to avoid an N+1 pattern across the candidate pool.
    async fn find_follow_edges(
        &self,
        viewer_id: &str,
        author_ids: &[String],
    ) -> Result<HashSet<String>>;

    /// Subset of `item_ids` the viewer has upvoted.
    async fn find_upvoted(&self, viewer_id: &str, item_ids: &[String]) -> Result<HashSet<String>>;

    /// Subset of `item_ids` the viewer has bookmarked.
    async fn find_bookmarked(
        &self,
        viewer_id: &str,
        item_ids: &[String],
    ) -> Result<HashSet<String>>;

    /// Display info for the given authors. Authors deleted mid-request are
    /// simply absent from the map.
    async fn find_authors(&self, author_ids: &[String]) -> Result<HashMap<String, AuthorSummary>>;
}

/// Postgres-backed store implementation
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn find_candidates(
        &self,
        category: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT id, author_id, caption, media_key, created_at,
                   upvote_count, comment_count, latitude, longitude
            FROM plays
            WHERE category = $1
              AND created_at > $2
              AND media_key IS NOT NULL
              AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    async fn find_follow_edges(
        &self,
        viewer_id: &str,
        author_ids: &[String],
    ) -> Result<HashSet<String>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT followee_id
            FROM follows
            WHERE follower_id = $1 AND followee_id = ANY($2)
            "#,
        )
        .bind(viewer_id)
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn find_upvoted(&self, viewer_id: &str, item_ids: &[String]) -> Result<HashSet<String>> {
        if item_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT play_id
            FROM upvotes
            WHERE user_id = $1 AND play_id = ANY($2)
            "#,
        )
        .bind(viewer_id)
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn find_bookmarked(
        &self,
        viewer_id: &str,
        item_ids: &[String],
    ) -> Result<HashSet<String>> {
        if item_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT play_id
            FROM bookmarks
            WHERE user_id = $1 AND play_id = ANY($2)
            "#,
        )
        .bind(viewer_id)
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn find_authors(&self, author_ids: &[String]) -> Result<HashMap<String, AuthorSummary>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, AuthorSummary>(
            r#"
            SELECT id, display_name, avatar_url
            FROM users
            WHERE id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(author_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|a| (a.id.clone(), a)).collect())
    }
}
