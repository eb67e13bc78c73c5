// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering sink trait for delivering replies back into the chat platform.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{Reply, SessionId};

/// Delivers a decoded reply to the chat session that caused it.
#[async_trait]
pub trait RenderSink: Send + Sync {
    /// Sends, in order: the primary message (with an optional keyboard),
    /// then zero or more pictures, then an optional location.
    async fn render(&self, session: &SessionId, reply: &Reply) -> Result<(), CourierError>;

    /// Best-effort plain-text notification, used for the generic failure
    /// and apology messages. Delivery failures are logged, never propagated.
    async fn notify(&self, session: &SessionId, text: &str);
}
