pub mod feed;

pub use feed::{get_ranked_feed, get_top_feed, FeedHandlerState};
