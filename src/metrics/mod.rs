use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Duration of feed stages (pipeline) and endpoints (ranked, top).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed request duration segmented by stage or endpoint",
        &["stage"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total feed requests by endpoint shape.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed requests segmented by response shape",
        &["shape"]
    )
    .expect("failed to register feed_request_total");

    /// Candidate pool sizes observed per pipeline stage.
    pub static ref FEED_CANDIDATE_COUNT: HistogramVec = register_histogram_vec!(
        "feed_candidate_count",
        "Number of feed candidates evaluated segmented by stage",
        &["stage"]
    )
    .expect("failed to register feed_candidate_count");
}

/// Prometheus text exposition endpoint.
pub async fn serve_metrics() -> HttpResponse {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
