use axum::{Router, routing::get};
use household_ledger::{
    api::{handlers::api_routes, openapi::ApiDoc},
    config::CONFIG,
    core::services::{CronSecret, LedgerService},
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStore},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(config = ?*CONFIG, "starting ledger server");
    for warning in &CONFIG.warnings {
        warn!("{}", warning);
    }
    if CONFIG.cron_secret.is_empty() {
        warn!("CRON_SECRET is not set; the booking trigger will reject every call");
    }

    let storage = InMemoryStore::new();
    let logging = InMemoryLogging::new();
    let service = Arc::new(LedgerService::new(
        storage,
        logging,
        CONFIG.scheduler_settings(),
        CronSecret::new(CONFIG.cron_secret.clone()),
    ));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
