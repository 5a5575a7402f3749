pub mod assembler;
pub mod cursor;
pub mod feed;
pub mod pagination;
pub mod ranking;
pub mod scoring;
pub mod signals;

pub use cursor::FeedCursor;
pub use feed::{FeedPage, FeedRankingService, FeedRequest, Viewer};
pub use scoring::{RankingWeights, ScoredCandidate};
pub use signals::{GeoPoint, SignalBundle};
