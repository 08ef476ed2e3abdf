use std::net::SocketAddr;

use anyhow::Context;

mod app;
mod auth;
mod config;
mod entries;
mod error;
mod health;
mod security;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "directory_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init()?;
    tracing::info!(data_file = %app_state.config.data_file.display(), "entry store ready");

    security::spawn_rate_limit_sweeper(app_state.limiter.clone());

    let addr: SocketAddr = format!("{}:{}", app_state.config.host, app_state.config.port)
        .parse()
        .context("invalid APP_HOST/APP_PORT")?;
    let app = app::build_app(app_state);

    tracing::info!("listening on {}", addr);
    tracing::info!("health check: http://{}/api/health", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
