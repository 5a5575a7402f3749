/// Configuration management for the playfeed service
///
/// Loads configuration from environment variables with sensible development
/// defaults. Ranking weights live here so tuning never touches ranking logic.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Feed ranking configuration
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Feed ranking configuration (weights, candidate pool limits)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Upper bound on candidates fetched per request. True rank order is only
    /// known after scoring, so the store over-fetches well past one page.
    pub candidate_pool_size: usize,
    /// Deadline for the candidate fetch; on expiry the request fails fast.
    pub fetch_timeout_secs: u64,
    /// Locality radius in kilometres for the bounding-box signal.
    pub locality_radius_km: f64,
    /// Score boost when the viewer follows the author.
    pub follow_boost: f64,
    /// Score boost when the item is within the viewer's locality radius.
    pub local_boost: f64,
    /// Score boost when the item carries media.
    pub media_boost: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("PLAYFEED_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PLAYFEED_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8086),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/playfeed".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            feed: FeedConfig {
                candidate_pool_size: std::env::var("FEED_CANDIDATE_POOL_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(200),
                fetch_timeout_secs: std::env::var("FEED_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
                locality_radius_km: parse_env_or_default("FEED_LOCALITY_RADIUS_KM", 100.0)?,
                follow_boost: parse_env_or_default("FEED_FOLLOW_BOOST", 8.0)?,
                local_boost: parse_env_or_default("FEED_LOCAL_BOOST", 6.0)?,
                media_boost: parse_env_or_default("FEED_MEDIA_BOOST", 4.0)?,
            },
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            candidate_pool_size: 200,
            fetch_timeout_secs: 5,
            locality_radius_km: 100.0,
            follow_boost: 8.0,
            local_boost: 6.0,
            media_boost: 4.0,
        }
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
