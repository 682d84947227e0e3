// src/routes/mod.rs
pub mod chat;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{animation_handler, chat_handler, session_handler};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(public_dir: &Path) -> Router<SharedState> {
    Router::new()
        .route("/session", post(session_handler))
        .route("/chat", post(chat_handler))
        .route("/animation", get(animation_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}
