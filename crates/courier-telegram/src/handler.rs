// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event handling: maps chat events to backend requests, carries
//! them through the bridge, and feeds the result to the rendering sink.
//!
//! Bridge and render failures surface to the user only as generic texts;
//! internal error detail stays in the logs.

use teloxide::prelude::*;
use tracing::{error, info, warn};

use courier_core::types::{Request, SessionId};
use courier_core::RenderSink;
use courier_rpc::RpcBridge;

/// Reserved request text for the start-of-session event.
pub const START_REQUEST: &str = "start";

/// Shown when the backend call fails (transport loss, timeout).
pub const FAILURE_TEXT: &str =
    "Sorry, something went wrong while processing your message. Please try again later.";

/// Shown when the reply could not be delivered back into the chat.
pub const APOLOGY_TEXT: &str =
    "An error occurred while delivering the reply. Please try again later.";

/// Session identifier for a chat message: the chat id, stringified.
pub fn session_of(msg: &Message) -> SessionId {
    SessionId(msg.chat.id.0.to_string())
}

/// Maps inbound message text to the backend request text.
///
/// `/start` (with or without a bot-name suffix) maps to the reserved
/// start-of-session request; other commands are ignored; plain text passes
/// through unchanged.
pub fn request_text(text: &str) -> Option<String> {
    match text.strip_prefix('/') {
        Some(rest) => {
            let command = rest.split_whitespace().next().unwrap_or("");
            let command = command.split('@').next().unwrap_or(command);
            (command == "start").then(|| START_REQUEST.to_string())
        }
        None => Some(text.to_string()),
    }
}

/// Carries one inbound chat event through the bridge and renders the result.
pub async fn handle_event(
    bridge: &RpcBridge,
    sink: &dyn RenderSink,
    source: &str,
    session: &SessionId,
    text: &str,
) {
    info!(session = %session, "inbound chat event");
    let request = Request {
        source: source.to_string(),
        session_id: session.0.clone(),
        text: text.to_string(),
    };

    match bridge.call(&request).await {
        Ok(reply) => {
            if let Err(e) = sink.render(session, &reply).await {
                warn!(session = %session, error = %e, "failed to deliver reply");
                sink.notify(session, APOLOGY_TEXT).await;
            } else {
                info!(session = %session, "reply delivered");
            }
        }
        Err(e) => {
            error!(session = %session, error = %e, "backend call failed");
            sink.notify(session, FAILURE_TEXT).await;
        }
    }
}
