// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared between the codec, transport, bridge, and chat adapter.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of the chat session a request originated from.
///
/// For Telegram this is the stringified chat id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique token linking an outgoing request to its eventual reply.
///
/// Created at request time, retired when the matching reply is observed or
/// the call times out or fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Generates a fresh, globally unique correlation id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single backend request, created per inbound chat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the chat platform this adapter instance serves.
    pub source: String,
    /// Originating chat session.
    pub session_id: String,
    /// The user's message text, callback payload, or the reserved
    /// start-of-session text.
    pub text: String,
}

/// The transport-level unit placed on the broker: routing info, the
/// correlation token, and the serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub correlation_id: CorrelationId,
    /// Name of the exclusive reply queue the bridge is consuming.
    pub reply_to: String,
    pub body: Vec<u8>,
}

/// A decoded backend reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Primary message body.
    #[serde(default)]
    pub text: Option<String>,
    /// Fallback title used as the primary body when `text` is absent
    /// (typically accompanies a keyboard).
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub keyboard: Option<Keyboard>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl Reply {
    /// The text to send as the primary message: `text`, else the fallback
    /// `name`. At most one of the two is ever used.
    pub fn primary_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.name.as_deref())
    }
}

/// Which kind of Telegram markup a keyboard renders to.
///
/// The wire values are `InlineKeyboard` and `ReplyKeyboard`; an absent kind
/// defaults to inline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum KeyboardKind {
    #[default]
    #[strum(serialize = "InlineKeyboard")]
    Inline,
    #[strum(serialize = "ReplyKeyboard")]
    Reply,
}

/// A keyboard attached to a reply, laid out `row_width` keys per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    #[serde(default)]
    pub kind: KeyboardKind,
    /// Keys per rendered row, at least 1.
    #[serde(default = "default_row_width")]
    pub row_width: usize,
    pub keys: Vec<Key>,
}

fn default_row_width() -> usize {
    1
}

/// One keyboard key. At most one of `url` and `callback_data` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub callback_data: Option<String>,
}

impl Key {
    /// Callback payload for this key: its `callback_data`, else its text.
    pub fn callback_payload(&self) -> &str {
        self.callback_data.as_deref().unwrap_or(&self.text)
    }
}

/// A picture to deliver after the primary message, by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub url: String,
}

/// A geographic location to deliver after any pictures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
