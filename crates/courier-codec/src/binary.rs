// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compact binary payload codec.
//!
//! Bodies are bincode-serialized envelopes carrying a fresh UUID, a
//! millisecond timestamp, and the request or reply payload. Functionally
//! equivalent to the XML codec.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_core::error::CourierError;
use courier_core::types::{Reply, Request};
use courier_core::PayloadCodec;

/// Wire envelope shared by both directions.
#[derive(Debug, Serialize, Deserialize)]
struct BinaryEnvelope<T> {
    id: Uuid,
    timestamp_ms: i64,
    payload: T,
}

/// Compact binary codec.
pub struct BinaryCodec;

impl BinaryCodec {
    fn encode<T: Serialize>(payload: T) -> Result<Vec<u8>, CourierError> {
        let envelope = BinaryEnvelope {
            id: Uuid::new_v4(),
            timestamp_ms: Utc::now().timestamp_millis(),
            payload,
        };
        bincode::serialize(&envelope).map_err(binary_error)
    }

    fn decode<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, CourierError> {
        let envelope: BinaryEnvelope<T> = bincode::deserialize(body).map_err(binary_error)?;
        Ok(envelope.payload)
    }
}

impl PayloadCodec for BinaryCodec {
    fn encode_request(&self, request: &Request) -> Result<Vec<u8>, CourierError> {
        Self::encode(request)
    }

    fn decode_request(&self, body: &[u8]) -> Result<Request, CourierError> {
        Self::decode(body)
    }

    fn encode_reply(&self, reply: &Reply) -> Result<Vec<u8>, CourierError> {
        Self::encode(reply)
    }

    fn decode_reply(&self, body: &[u8]) -> Result<Reply, CourierError> {
        Self::decode(body)
    }
}

fn binary_error(e: bincode::Error) -> CourierError {
    CourierError::Codec {
        message: "malformed binary payload".to_string(),
        source: Some(Box::new(e)),
    }
}
