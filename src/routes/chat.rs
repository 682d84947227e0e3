use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, SessionRequest, SessionResponse},
    services::conversation::take_turn,
    state::SharedState,
};

pub async fn session_handler(
    State(state): State<SharedState>,
    payload: Option<Json<SessionRequest>>,
) -> Json<SessionResponse> {
    let Json(payload) = payload.unwrap_or_default();
    let handle = state.sessions.get_or_create(payload.session_id.as_deref()).await;
    let session = handle.lock().await;

    Json(SessionResponse {
        session_id: session.id().to_string(),
        messages: session.messages().to_vec(),
    })
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let handle = state.sessions.get_or_create(payload.session_id.as_deref()).await;
    // Held for the whole turn: one turn at a time per session.
    let mut session = handle.lock().await;

    match take_turn(&mut session, &state.relay, &payload.message).await {
        Ok(reply) => Ok(Json(ChatResponse {
            session_id: session.id().to_string(),
            reply,
            messages: session.messages().to_vec(),
        })),
        Err(source) => Err(AppError::Relay {
            session_id: session.id().to_string(),
            source,
        }),
    }
}

pub async fn animation_handler(State(state): State<SharedState>) -> Response {
    let Some(url) = state.animation_url.as_deref() else {
        return StatusCode::NO_CONTENT.into_response();
    };
    match state.animations.get(url).await {
        Some(animation) => Json(animation).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
