/// Opaque pagination cursor codec.
///
/// A cursor captures the ranking key of the last item on the previous page:
/// `(score, created_at, id)`. That is the minimal state needed to resume the
/// total order at an exact position, and it stays valid under concurrent
/// inserts and deletes — unlike an offset, which those would invalidate.
///
/// Wire format: base64(JSON). Clients replay the token verbatim; its
/// structure is not part of the contract. Decoding is deliberately
/// permissive: any malformed or tampered token is treated as "no cursor"
/// (first page), never as an error, so pagination failures can never break a
/// client.
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCursor {
    /// Score of the last returned item
    pub score: f64,
    /// Creation timestamp of the last returned item (RFC3339)
    pub created_at: DateTime<Utc>,
    /// Id of the last returned item
    pub id: String,
}

/// Encode a cursor to its opaque wire form.
pub fn encode(cursor: &FeedCursor) -> String {
    // Serializing a plain struct with these field types cannot fail.
    let json = serde_json::to_string(cursor).unwrap_or_default();
    general_purpose::STANDARD.encode(json)
}

/// Decode an optional incoming cursor. Any structural or type failure yields
/// `None`, which callers must treat exactly as a first-page request.
pub fn decode(raw: Option<&str>) -> Option<FeedCursor> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let bytes = match general_purpose::STANDARD.decode(raw) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("Ignoring cursor with invalid base64");
            return None;
        }
    };

    match serde_json::from_slice::<FeedCursor>(&bytes) {
        Ok(cursor) => Some(cursor),
        Err(_) => {
            debug!("Ignoring cursor with invalid payload");
            None
        }
    }
}
