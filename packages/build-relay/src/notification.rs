//! Outbound chat message.

use crate::build_event::BuildEvent;
use serde::Serialize;

/// Body posted to the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub content: String,
}

impl ChatMessage {
    /// Render the one-line summary for a build.
    ///
    /// Existing channel consumers match on this exact text, including the
    /// double space before the branch name.
    pub fn for_build(event: &BuildEvent) -> Self {
        Self {
            content: format!(
                "build status is: {} for repo {} branch  {} view logs at: {}",
                event.status,
                event.repo_name(),
                event.branch_name(),
                event.log_url
            ),
        }
    }
}
