// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier adapter.

use thiserror::Error;

/// The primary error type used across the Courier workspace.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The broker could not be reached at all (connection establishment failed).
    /// Recovered by the bounded startup retry loop, otherwise fatal.
    #[error("broker unavailable: {source}")]
    BrokerUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The broker channel/connection broke mid-operation, or the reply path
    /// was invalidated by a reconnection before a reply arrived.
    #[error("transport broken: {message}")]
    TransportBroken {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No matching reply arrived within the configured bound.
    #[error("no reply within {duration:?}")]
    RequestTimeout { duration: std::time::Duration },

    /// Payload encoding or decoding failed.
    #[error("codec error: {message}")]
    Codec {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The chat platform refused or failed to deliver a rendered reply.
    #[error("render error: {message}")]
    Render {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors. Not recovered; terminates the process.
    #[error("internal error: {0}")]
    Internal(String),
}
