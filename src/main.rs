// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::logs_volume_service::LogsVolumeService;
use crate::application::policy_service::PolicyService;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::http_volume_source::HttpVolumeSource;
use crate::infrastructure::memory_policy_repository::InMemoryPolicyRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_group_by_label, get_policy_form, get_policy_schema, health_check, logs_volume_panels,
    reload_logs_volume, submit_policy, validate_policy_field,
};

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/policy", get(get_policy_form).put(submit_policy))
        .route("/policy/schema", get(get_policy_schema))
        .route("/policy/labels", post(add_group_by_label))
        .route("/policy/validate", post(validate_policy_field))
        .route("/logs-volume/panels", post(logs_volume_panels))
        .route("/logs-volume/reload", post(reload_logs_volume))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = load_settings()?;

    // Initialize tracing, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create adapters (infrastructure layer)
    let policy_repository = Arc::new(InMemoryPolicyRepository::from_settings(&settings.policy));
    let volume_source = Arc::new(HttpVolumeSource::new(&settings.logs_volume)?);

    // Create services (application layer)
    let policy_service = PolicyService::new(policy_repository, settings.policy.common_labels.clone());
    let logs_volume_service = LogsVolumeService::new(volume_source);

    let state = Arc::new(AppState {
        logs_volume_service,
        policy_service,
    });

    let addr: SocketAddr = settings
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", settings.server.bind_addr))?;
    tracing::info!("Starting volume-policy service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
