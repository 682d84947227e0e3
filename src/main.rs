use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use iai_chat::{config::Settings, routes, state::AppState};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iai_chat=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;
    let state = Arc::new(AppState::new(&settings));

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                tracing::info!(removed, "expired sessions purged");
            }
        }
    });

    let cors = CorsLayer::very_permissive();

    let app: Router = routes::create_router(&settings.public_dir)
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!(addr = %settings.bind_addr, "IAI chat relay listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
