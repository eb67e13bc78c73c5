// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the bridge core and its external collaborators.

pub mod codec;
pub mod render;
pub mod transport;

pub use codec::PayloadCodec;
pub use render::RenderSink;
pub use transport::RequestTransport;
