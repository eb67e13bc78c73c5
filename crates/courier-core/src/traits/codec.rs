// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload codec trait for the backend wire representation.

use crate::error::CourierError;
use crate::types::{Reply, Request};

/// Serializes requests and deserializes replies for the broker body.
///
/// Two interchangeable encodings exist (XML markup and a compact binary
/// schema); the bridge and transport never depend on which one is active.
/// The encode-reply/decode-request half is what the backend side of the
/// wire uses, and is exercised by the integration tests.
pub trait PayloadCodec: Send + Sync {
    fn encode_request(&self, request: &Request) -> Result<Vec<u8>, CourierError>;

    fn decode_request(&self, body: &[u8]) -> Result<Request, CourierError>;

    fn encode_reply(&self, reply: &Reply) -> Result<Vec<u8>, CourierError>;

    fn decode_reply(&self, body: &[u8]) -> Result<Reply, CourierError>;
}
