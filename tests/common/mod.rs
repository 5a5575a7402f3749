#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use playfeed_service::db::FeedStore;
use playfeed_service::error::{AppError, Result};
use playfeed_service::models::{AuthorSummary, Candidate};

/// In-memory stand-in for the datastore collaborator, mirroring the
/// filter/sort primitives the Postgres store provides.
#[derive(Default)]
pub struct InMemoryFeedStore {
    /// (category, candidate) pairs
    pub items: Vec<(String, Candidate)>,
    pub authors: HashMap<String, AuthorSummary>,
    /// viewer id -> followed author ids
    pub follows: HashMap<String, HashSet<String>>,
    /// viewer id -> upvoted item ids
    pub upvotes: HashMap<String, HashSet<String>>,
    /// viewer id -> bookmarked item ids
    pub bookmarks: HashMap<String, HashSet<String>>,
    /// Simulate an unreachable store
    pub unavailable: bool,
}

impl InMemoryFeedStore {
    pub fn with_item(mut self, category: &str, candidate: Candidate) -> Self {
        self.items.push((category.to_string(), candidate));
        self
    }

    pub fn with_author(mut self, id: &str, display_name: &str) -> Self {
        self.authors.insert(
            id.to_string(),
            AuthorSummary {
                id: id.to_string(),
                display_name: display_name.to_string(),
                avatar_url: None,
            },
        );
        self
    }

    pub fn with_follow(mut self, viewer: &str, author: &str) -> Self {
        self.follows
            .entry(viewer.to_string())
            .or_default()
            .insert(author.to_string());
        self
    }

    pub fn with_upvote(mut self, viewer: &str, item: &str) -> Self {
        self.upvotes
            .entry(viewer.to_string())
            .or_default()
            .insert(item.to_string());
        self
    }

    pub fn with_bookmark(mut self, viewer: &str, item: &str) -> Self {
        self.bookmarks
            .entry(viewer.to_string())
            .or_default()
            .insert(item.to_string());
        self
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn find_candidates(
        &self,
        category: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Candidate>> {
        if self.unavailable {
            return Err(AppError::Unavailable("store down".to_string()));
        }

        let mut matching: Vec<Candidate> = self
            .items
            .iter()
            .filter(|(cat, c)| {
                cat == category && c.created_at > since && c.media_key.is_some()
            })
            .map(|(_, c)| c.clone())
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn find_follow_edges(
        &self,
        viewer_id: &str,
        author_ids: &[String],
    ) -> Result<HashSet<String>> {
        let followed = self.follows.get(viewer_id).cloned().unwrap_or_default();
        Ok(author_ids
            .iter()
            .filter(|id| followed.contains(*id))
            .cloned()
            .collect())
    }

    async fn find_upvoted(&self, viewer_id: &str, item_ids: &[String]) -> Result<HashSet<String>> {
        let upvoted = self.upvotes.get(viewer_id).cloned().unwrap_or_default();
        Ok(item_ids
            .iter()
            .filter(|id| upvoted.contains(*id))
            .cloned()
            .collect())
    }

    async fn find_bookmarked(
        &self,
        viewer_id: &str,
        item_ids: &[String],
    ) -> Result<HashSet<String>> {
        let bookmarked = self.bookmarks.get(viewer_id).cloned().unwrap_or_default();
        Ok(item_ids
            .iter()
            .filter(|id| bookmarked.contains(*id))
            .cloned()
            .collect())
    }

    async fn find_authors(&self, author_ids: &[String]) -> Result<HashMap<String, AuthorSummary>> {
        Ok(author_ids
            .iter()
            .filter_map(|id| self.authors.get(id).map(|a| (id.clone(), a.clone())))
            .collect())
    }
}

/// A media-bearing candidate with the given engagement counters.
pub fn candidate(
    id: &str,
    author_id: &str,
    created_at: DateTime<Utc>,
    upvotes: i32,
    comments: i32,
) -> Candidate {
    Candidate {
        id: id.to_string(),
        author_id: Some(author_id.to_string()),
        caption: Some(format!("caption for {}", id)),
        media_key: Some(format!("clips/{}.mp4", id)),
        created_at,
        upvote_count: upvotes,
        comment_count: comments,
        latitude: None,
        longitude: None,
    }
}
