/// Multi-signal scoring.
///
/// Combines a candidate's signal bundle into one scalar score using
/// configurable weights and two step-function boost tables. Step functions
/// over fixed buckets were chosen over continuous decay for predictability:
/// scores do not drift as items age within a bucket, which keeps the ranked
/// order stable between page fetches.
use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::models::Candidate;
use crate::services::signals::SignalBundle;

/// Scoring policy: flat boosts plus ordered `(threshold, boost)` tables.
///
/// Tables are evaluated top-down; the first matching row wins. Keeping the
/// policy as data makes bucket boundaries trivial to enumerate in tests.
#[derive(Debug, Clone)]
pub struct RankingWeights {
    /// Flat boost when the viewer follows the author
    pub follow_boost: f64,
    /// Flat boost when the item is within the viewer's locality radius
    pub local_boost: f64,
    /// Flat boost when the item carries media
    pub media_boost: f64,
    /// `(max_age_hours, boost)` rows, ascending by age. Ages past the last
    /// row get `recency_floor`.
    pub recency_buckets: Vec<(f64, f64)>,
    /// Minimum recency boost for very old items
    pub recency_floor: f64,
    /// `(min_engagement, boost)` rows, descending by threshold. Engagement
    /// below the last row gets no boost.
    pub engagement_buckets: Vec<(u32, f64)>,
}

impl Default for RankingWeights {
    fn default() -> Self {
        RankingWeights {
            follow_boost: 8.0,
            local_boost: 6.0,
            media_boost: 4.0,
            recency_buckets: vec![
                (12.0, 20.0),
                (24.0, 15.0),
                (72.0, 10.0),
                (168.0, 6.0),
                (336.0, 3.0),
            ],
            recency_floor: 1.0,
            engagement_buckets: vec![(100, 15.0), (50, 10.0), (20, 6.0), (10, 4.0), (5, 2.0)],
        }
    }
}

impl From<&FeedConfig> for RankingWeights {
    fn from(config: &FeedConfig) -> Self {
        RankingWeights {
            follow_boost: config.follow_boost,
            local_boost: config.local_boost,
            media_boost: config.media_boost,
            ..RankingWeights::default()
        }
    }
}

impl RankingWeights {
    /// Step boost for content age. Pure function of its inputs.
    pub fn recency_boost(&self, age_hours: f64) -> f64 {
        for &(max_age, boost) in &self.recency_buckets {
            if age_hours <= max_age {
                return boost;
            }
        }
        self.recency_floor
    }

    /// Step boost for engagement magnitude. Pure function of its inputs.
    pub fn engagement_boost(&self, engagement: u32) -> f64 {
        for &(min_engagement, boost) in &self.engagement_buckets {
            if engagement >= min_engagement {
                return boost;
            }
        }
        0.0
    }
}

/// A candidate plus its computed score and the exact keys used for
/// tie-breaking. Created by the scorer, consumed by the ranker, never
/// persisted.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub id: String,
}

/// Combine a signal bundle into a scalar score.
pub fn score(weights: &RankingWeights, signals: &SignalBundle) -> f64 {
    let mut score = signals.engagement as f64;

    if signals.is_followed {
        score += weights.follow_boost;
    }
    if signals.is_local {
        score += weights.local_boost;
    }
    if signals.has_media {
        score += weights.media_boost;
    }

    score += weights.recency_boost(signals.age_hours);
    score += weights.engagement_boost(signals.engagement);

    score
}

pub fn score_candidate(
    weights: &RankingWeights,
    candidate: Candidate,
    signals: &SignalBundle,
) -> ScoredCandidate {
    let score = score(weights, signals);
    let created_at = candidate.created_at;
    let id = candidate.id.clone();
    ScoredCandidate {
        candidate,
        score,
        created_at,
        id,
    }
}
