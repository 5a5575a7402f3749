/// Identity collaborator boundary.
///
/// Authentication lives outside this service: the gateway validates the
/// session and forwards the viewer's identity and last-known coordinates as
/// trusted headers. Absent or unparseable headers mean an anonymous viewer,
/// never a rejected request — the feed degrades to its non-personalized
/// form.
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::services::{GeoPoint, Viewer};

const VIEWER_ID_HEADER: &str = "x-viewer-id";
const VIEWER_LAT_HEADER: &str = "x-viewer-lat";
const VIEWER_LNG_HEADER: &str = "x-viewer-lng";

/// Extracted viewer identity for the current request.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext(pub Viewer);

impl ViewerContext {
    fn from_request_headers(req: &HttpRequest) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let id = header(VIEWER_ID_HEADER).map(str::to_string);

        let location = match (
            header(VIEWER_LAT_HEADER).and_then(|v| v.parse::<f64>().ok()),
            header(VIEWER_LNG_HEADER).and_then(|v| v.parse::<f64>().ok()),
        ) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        ViewerContext(Viewer { id, location })
    }
}

impl FromRequest for ViewerContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(ViewerContext::from_request_headers(req)))
    }
}
