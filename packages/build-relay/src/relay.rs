//! The relay pipeline: envelope → build event → filter → render → deliver.

use crate::build_event::BuildEvent;
use crate::envelope::PushEnvelope;
use crate::notification::ChatMessage;
use crate::webhook::WebhookClient;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

/// Terminal state of one push request.
#[derive(Debug)]
pub enum Outcome {
    /// Message rendered and accepted by the webhook.
    Delivered,
    /// Build still in progress; acknowledged without notifying.
    Filtered,
    /// Parse, decode or delivery failure.
    Failed(crate::Error),
}

impl Outcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Outcome::Delivered => StatusCode::ACCEPTED,
            Outcome::Filtered => StatusCode::NO_CONTENT,
            Outcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::Error> for Outcome {
    fn from(e: crate::Error) -> Self {
        Outcome::Failed(e)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}

/// Decode a push body into the build it describes.
pub fn decode(body: &[u8]) -> Result<BuildEvent, crate::Error> {
    let envelope = PushEnvelope::from_slice(body)?;
    debug!(
        subscription = %envelope.subscription,
        message_id = %envelope.message.message_id,
        build_id = %envelope.message.attributes.build_id,
        attr_status = %envelope.message.attributes.status,
        "Push envelope parsed"
    );
    let data = envelope.message.decode_data()?;
    BuildEvent::from_slice(&data)
}

/// Decide whether a build warrants a notification, and render it if so.
pub fn prepare(event: &BuildEvent) -> Option<ChatMessage> {
    if event.status.is_in_progress() {
        return None;
    }
    Some(ChatMessage::for_build(event))
}

/// Run the full pipeline for one push body.
pub async fn relay(webhook: &WebhookClient, body: &[u8]) -> Outcome {
    let event = match decode(body) {
        Ok(event) => event,
        Err(e) => return e.into(),
    };

    let Some(message) = prepare(&event) else {
        info!(build_id = %event.id, status = %event.status, "Build in progress, not notifying");
        return Outcome::Filtered;
    };

    info!(
        build_id = %event.id,
        status = %event.status,
        repo = event.repo_name(),
        branch = event.branch_name(),
        "Relaying build notification"
    );

    match webhook.deliver(&message).await {
        Ok(()) => Outcome::Delivered,
        Err(e) => {
            warn!(build_id = %event.id, error = %e, "Webhook delivery failed");
            e.into()
        }
    }
}
