// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier chat-to-broker adapter.
//!
//! This crate provides the foundational trait seams, error types, and domain
//! types used throughout the Courier workspace: the payload codec, the broker
//! transport, and the rendering sink are all consumed through traits defined
//! here so the correlation bridge never depends on a concrete collaborator.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CourierError;
pub use types::{
    CorrelationId, Envelope, Key, Keyboard, KeyboardKind, Location, Picture, Reply, Request,
    SessionId,
};

// Re-export the trait seams at crate root.
pub use traits::{PayloadCodec, RenderSink, RequestTransport};
