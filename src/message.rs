// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::session_manager::Message;

#[derive(Deserialize, Serialize, Default)]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub messages: Vec<Message>,
}

#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body sent to the automation webhook.
#[derive(Debug, Serialize)]
pub struct WebhookRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}
