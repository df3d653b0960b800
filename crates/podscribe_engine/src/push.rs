use podscribe_core::PushedEvent;
use serde_json::Value;

use crate::{ApiError, FailureKind};

/// Classifies the JSON payload of one pushed transcription message.
///
/// Unparseable payloads are protocol errors. Any well-formed payload whose
/// `type` is missing or unknown is [`PushedEvent::Unrecognized`].
pub fn classify_pushed(data: &str) -> Result<PushedEvent, ApiError> {
    let message: Value = serde_json::from_str(data)
        .map_err(|err| ApiError::new(FailureKind::Protocol, format!("bad event payload: {err}")))?;
    let field = |name: &str| message.get(name).and_then(Value::as_str);
    let event = match field("type") {
        Some("transcription_text") => {
            PushedEvent::Text(field("text").unwrap_or_default().to_string())
        }
        Some("error") => {
            PushedEvent::Error(field("message").unwrap_or("unknown error").to_string())
        }
        _ => PushedEvent::Unrecognized,
    };
    Ok(event)
}
