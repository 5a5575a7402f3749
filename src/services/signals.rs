/// Per-candidate signal extraction.
///
/// Signals are the independent inputs to scoring: engagement, age, follow
/// status, locality, media presence. A bundle is computed fresh per request
/// and discarded after scoring; nothing here touches I/O — the follow set is
/// batch-fetched upstream and passed in.
use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::Candidate;

/// Kilometres per degree of latitude (and of longitude at the equator).
const KM_PER_DEG_LAT: f64 = 110.574;
const KM_PER_DEG_LNG_EQUATOR: f64 = 111.320;

/// Viewer coordinates used for the locality signal
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Derived scoring inputs for one candidate
#[derive(Debug, Clone)]
pub struct SignalBundle {
    pub age_hours: f64,
    /// upvotes + comments * 2 (comments are higher-effort engagement)
    pub engagement: u32,
    pub is_followed: bool,
    pub is_local: bool,
    pub has_media: bool,
}

/// Compute the signal bundle for a candidate.
///
/// `now` is passed explicitly so scoring stays reproducible for a fixed
/// candidate set — a requirement for cursor correctness.
pub fn extract(
    candidate: &Candidate,
    now: DateTime<Utc>,
    followed_authors: &HashSet<String>,
    viewer_location: Option<GeoPoint>,
    radius_km: f64,
) -> SignalBundle {
    // Clamp to zero so clock skew can never produce negative ages.
    let age_hours = ((now - candidate.created_at).num_seconds() as f64 / 3600.0).max(0.0);

    let upvotes = candidate.upvote_count.max(0) as u32;
    let comments = candidate.comment_count.max(0) as u32;
    let engagement = upvotes + comments * 2;

    let is_followed = candidate
        .author_id
        .as_deref()
        .map(|author| followed_authors.contains(author))
        .unwrap_or(false);

    let is_local = match (viewer_location, candidate.latitude, candidate.longitude) {
        (Some(viewer), Some(lat), Some(lng)) => within_radius(viewer, lat, lng, radius_km),
        _ => false,
    };

    let has_media = candidate
        .media_key
        .as_deref()
        .map(|k| !k.is_empty())
        .unwrap_or(false);

    SignalBundle {
        age_hours,
        engagement,
        is_followed,
        is_local,
        has_media,
    }
}

/// Bounding-box locality check using an equirectangular approximation.
///
/// Flat-earth math is acceptable at the default ~100 km radius and the
/// latitudes this runs at. The constants must be re-validated before
/// swapping in great-circle distance or using much larger radii.
fn within_radius(viewer: GeoPoint, lat: f64, lng: f64, radius_km: f64) -> bool {
    let delta_lat = radius_km / KM_PER_DEG_LAT;
    let cos_lat = viewer.latitude.to_radians().cos();
    if cos_lat.abs() < f64::EPSILON {
        // Degenerate at the poles; no locality signal there.
        return false;
    }
    let delta_lng = radius_km / (KM_PER_DEG_LNG_EQUATOR * cos_lat);

    (lat - viewer.latitude).abs() <= delta_lat && (lng - viewer.longitude).abs() <= delta_lng
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(created_at: DateTime<Utc>, upvotes: i32, comments: i32) -> Candidate {
        Candidate {
            id: "play-1".to_string(),
            author_id: Some("author-1".to_string()),
            caption: None,
            media_key: Some("clips/play-1.mp4".to_string()),
            created_at,
            upvote_count: upvotes,
            comment_count: comments,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn age_is_never_negative() {
        let now = Utc::now();
        // Created "in the future" relative to now (clock skew)
        let c = candidate(now + Duration::hours(2), 0, 0);
        let bundle = extract(&c, now, &HashSet::new(), None, 100.0);
        assert_eq!(bundle.age_hours, 0.0);
    }

    #[test]
    fn comments_weigh_double() {
        let now = Utc::now();
        let c = candidate(now, 10, 5);
        let bundle = extract(&c, now, &HashSet::new(), None, 100.0);
        assert_eq!(bundle.engagement, 20);
    }

    #[test]
    fn follow_signal_uses_batch_set() {
        let now = Utc::now();
        let c = candidate(now, 0, 0);

        let mut followed = HashSet::new();
        assert!(!extract(&c, now, &followed, None, 100.0).is_followed);

        followed.insert("author-1".to_string());
        assert!(extract(&c, now, &followed, None, 100.0).is_followed);
    }

    #[test]
    fn locality_requires_both_coordinates() {
        let now = Utc::now();
        let viewer = GeoPoint {
            latitude: 40.0,
            longitude: -74.0,
        };

        let mut c = candidate(now, 0, 0);
        c.latitude = Some(40.1);
        // Longitude missing: no locality signal
        let bundle = extract(&c, now, &HashSet::new(), Some(viewer), 100.0);
        assert!(!bundle.is_local);

        c.longitude = Some(-74.2);
        let bundle = extract(&c, now, &HashSet::new(), Some(viewer), 100.0);
        assert!(bundle.is_local);
    }

    #[test]
    fn locality_respects_radius() {
        let now = Utc::now();
        let viewer = GeoPoint {
            latitude: 40.0,
            longitude: -74.0,
        };

        // ~555 km north: well outside a 100 km box
        let mut c = candidate(now, 0, 0);
        c.latitude = Some(45.0);
        c.longitude = Some(-74.0);
        let bundle = extract(&c, now, &HashSet::new(), Some(viewer), 100.0);
        assert!(!bundle.is_local);
    }

    #[test]
    fn empty_media_key_is_not_media() {
        let now = Utc::now();
        let mut c = candidate(now, 0, 0);
        assert!(extract(&c, now, &HashSet::new(), None, 100.0).has_media);

        c.media_key = Some(String::new());
        assert!(!extract(&c, now, &HashSet::new(), None, 100.0).has_media);

        c.media_key = None;
        assert!(!extract(&c, now, &HashSet::new(), None, 100.0).has_media);
    }
}
