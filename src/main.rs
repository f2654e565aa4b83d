//! PalHope backend server
//!
//! REST API for the PalHope donation platform: campaign and sub-campaign
//! management, the donation pipeline with token rewards and badges, and
//! donor leaderboards.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use palhope_server::config::Config;
use palhope_server::db;
use palhope_server::middleware;
use palhope_server::notifier::Mailer;
use palhope_server::routes;
use palhope_server::services::badges::badge_sweep;
use palhope_server::services::{
    BadgeService, CampaignService, DonationService, LeaderboardService, SubCampaignService,
    UserService,
};
use palhope_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = %config.environment.as_str(), "Starting PalHope backend");

    // Initialize database connection pool and schema
    let db_pool = db::create_pool(&config).await?;
    db::run_migrations(&db_pool).await?;

    // Outbound mail relay
    let mailer = Arc::new(Mailer::new(
        config.mail_relay_url.clone(),
        config.mail_from.clone(),
    ));

    // Wire up services
    let badge_service = BadgeService::new(db_pool.clone());
    let leaderboard_service = LeaderboardService::new(db_pool.clone());

    let donation_service = Arc::new(DonationService::new(
        db_pool.clone(),
        badge_service.clone(),
        mailer.clone(),
    ));
    let campaign_service = Arc::new(CampaignService::new(
        db_pool.clone(),
        leaderboard_service.clone(),
    ));
    let sub_campaign_service = Arc::new(SubCampaignService::new(db_pool.clone()));
    let user_service = Arc::new(UserService::new(db_pool.clone()));
    let badge_service = Arc::new(badge_service);
    let leaderboard_service = Arc::new(leaderboard_service);

    let app_state = AppState::new(
        donation_service,
        campaign_service,
        sub_campaign_service,
        badge_service.clone(),
        leaderboard_service,
        user_service,
    );

    // Background badge reconciliation sweep
    let sweep_service = badge_service.clone();
    let sweep_interval = config.badge_sweep_interval_secs;
    tokio::spawn(async move {
        tracing::info!(interval_secs = sweep_interval, "Badge sweep task started");
        badge_sweep(sweep_service, sweep_interval).await;
    });

    // Clone db_pool for health check
    let health_db_pool = db_pool.clone();

    // Create the app router
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_db_pool.clone())))
        .merge(routes::donation_routes())
        .merge(routes::campaign_routes())
        .merge(routes::sub_campaign_routes())
        .merge(routes::badge_routes())
        .merge(routes::user_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(&config));

    if config.environment.is_production() {
        app = app.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn root() -> &'static str {
    "PalHope API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let db_status = match db::check_health(&pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let allowed_origins_str = config.cors_allowed_origins.clone().unwrap_or_default();

    if allowed_origins_str.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
