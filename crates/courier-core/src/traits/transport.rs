// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait the RPC bridge publishes through.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::Envelope;

/// The narrow interface the bridge needs from the broker transport.
///
/// Consuming the reply queue is not part of this trait; the process driver
/// pumps deliveries from the concrete transport into the bridge.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    /// Name of the exclusive reply queue replies should be addressed to.
    fn reply_queue(&self) -> String;

    /// Fire-and-forget publish of one envelope toward the backend.
    ///
    /// Fails with [`CourierError::TransportBroken`] when the underlying
    /// channel or connection is no longer usable.
    async fn publish(&self, envelope: &Envelope) -> Result<(), CourierError>;
}
