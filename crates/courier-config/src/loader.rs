// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./courier.toml` > `~/.config/courier/courier.toml`
//! > `/etc/courier/courier.toml` with environment variable overrides via the
//! `COURIER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CourierConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/courier/courier.toml` (system-wide)
/// 3. `~/.config/courier/courier.toml` (user XDG config)
/// 4. `./courier.toml` (local directory)
/// 5. `COURIER_*` environment variables
pub fn load_config() -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file("/etc/courier/courier.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("courier/courier.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("courier.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CourierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CourierConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `COURIER_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("COURIER_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: COURIER_BROKER_REPLY_TIMEOUT_SECS -> "broker_reply_timeout_secs"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("broker_", "broker.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("codec_", "codec.", 1);
        mapped.into()
    })
}
