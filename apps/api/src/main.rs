mod application;
mod auth;
mod company;
mod config;
mod db;
mod errors;
mod job;
mod models;
mod routes;
mod services;
mod state;
mod user;
mod validation;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::Db;
use crate::routes::build_router;
use crate::services::mailer::Mailer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging. Tracing targets use the underscored
    // crate name, not the dashed package name, so the fallback directive
    // must be built from CARGO_CRATE_NAME or it matches nothing.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB and the unique indexes backing the data model
    let db = Db::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    db.ensure_indexes().await?;

    // Initialize S3 / MinIO for resume storage
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize the SMTP mailer
    let mailer = Mailer::from_config(&config);
    info!("Mailer initialized");

    // Build app state
    let state = AppState {
        db,
        s3,
        mailer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_fallback_log_directive_targets_this_crate() {
        // Events emitted by this crate carry the underscored crate name as
        // their target; a directive built from the dashed package name would
        // silently drop every application log line when RUST_LOG is unset.
        let crate_target = module_path!().split("::").next().unwrap_or_default();
        assert_eq!(env!("CARGO_CRATE_NAME"), crate_target);
        assert!(!env!("CARGO_CRATE_NAME").contains('-'));
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobboard-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
