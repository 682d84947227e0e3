// src/services/conversation.rs
use super::relay::{RelayError, WebhookRelay};
use super::session_manager::{MessageRole, Session};

/// Run one chat turn against an exclusively borrowed session.
///
/// The user text is always recorded. The reply is recorded only when the
/// relay succeeds with non-empty text; on error the transcript keeps just the
/// user entry.
pub async fn take_turn(
    session: &mut Session,
    relay: &WebhookRelay,
    user_text: &str,
) -> Result<String, RelayError> {
    session.append(MessageRole::User, user_text);

    let session_id = session.id().to_string();
    match relay.relay(user_text, &session_id).await {
        Ok(reply) => {
            if !reply.is_empty() {
                session.append(MessageRole::Assistant, reply.as_str());
            }
            Ok(reply)
        }
        Err(err) => {
            tracing::warn!(session_id = %session_id, error = %err, "relay failed");
            Err(err)
        }
    }
}
