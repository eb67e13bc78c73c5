// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier adapter.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Courier configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Adapter identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// RabbitMQ broker connection settings.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Telegram bot settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Payload codec selection.
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Adapter identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Source name stamped on every outgoing request.
    #[serde(default = "default_source")]
    pub source: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            log_level: default_log_level(),
        }
    }
}

fn default_source() -> String {
    "Telegram".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// RabbitMQ broker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Broker hostname.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Broker AMQP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional broker username. Both username and password must be set for
    /// credentials to be used.
    #[serde(default)]
    pub username: Option<String>,

    /// Optional broker password.
    #[serde(default)]
    pub password: Option<String>,

    /// Exchange requests are published to.
    #[serde(default = "default_exchange")]
    pub exchange: String,

    /// Routing key requests are published with.
    #[serde(default = "default_routing_key")]
    pub routing_key: String,

    /// AMQP heartbeat interval in seconds.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Startup connection attempts before giving up.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Delay between startup connection attempts in seconds.
    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,

    /// How long a call waits for its matching reply before failing
    /// with a request timeout.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            username: None,
            password: None,
            exchange: default_exchange(),
            routing_key: default_routing_key(),
            heartbeat_secs: default_heartbeat_secs(),
            connect_attempts: default_connect_attempts(),
            connect_retry_secs: default_connect_retry_secs(),
            reply_timeout_secs: default_reply_timeout_secs(),
        }
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5672
}

fn default_exchange() -> String {
    "messages".to_string()
}

fn default_routing_key() -> String {
    "message".to_string()
}

fn default_heartbeat_secs() -> u64 {
    30
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_connect_retry_secs() -> u64 {
    30
}

fn default_reply_timeout_secs() -> u64 {
    30
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to run the adapter.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Payload codec configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Wire encoding for request/reply bodies.
    #[serde(default)]
    pub encoding: Encoding,
}

/// The two interchangeable payload encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Tree-structured XML markup.
    #[default]
    Xml,
    /// Compact binary schema wrapped in a UUID + timestamp envelope.
    Binary,
}
