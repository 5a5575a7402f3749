use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playfeed_service::config::Config;
use playfeed_service::db::PgFeedStore;
use playfeed_service::handlers::{get_ranked_feed, get_top_feed, FeedHandlerState};
use playfeed_service::metrics::serve_metrics;
use playfeed_service::services::FeedRankingService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_target(true))
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("configuration error: {}", e))?;

    info!(
        "Starting playfeed-service v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.app.env
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let store = Arc::new(PgFeedStore::new(pool));
    let feed = Arc::new(FeedRankingService::new(store, &config.feed));
    let handler_state = web::Data::new(FeedHandlerState { feed });

    let bind_addr = (config.app.host.clone(), config.app.port);
    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(handler_state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(serve_metrics))
            .service(
                web::scope("/api/v1/feed")
                    .service(get_ranked_feed)
                    .service(get_top_feed),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
