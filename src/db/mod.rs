pub mod feed_repo;

pub use feed_repo::{FeedStore, PgFeedStore};
