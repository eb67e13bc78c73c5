// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty routing names and usable retry bounds.

use crate::diagnostic::ConfigError;
use crate::model::CourierConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.source.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.source must not be empty".to_string(),
        });
    }

    if config.broker.hostname.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "broker.hostname must not be empty".to_string(),
        });
    }

    if config.broker.port == 0 {
        errors.push(ConfigError::Validation {
            message: "broker.port must not be 0".to_string(),
        });
    }

    if config.broker.exchange.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "broker.exchange must not be empty".to_string(),
        });
    }

    if config.broker.routing_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "broker.routing_key must not be empty".to_string(),
        });
    }

    if config.broker.connect_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "broker.connect_attempts must be at least 1".to_string(),
        });
    }

    if config.broker.reply_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "broker.reply_timeout_secs must be at least 1".to_string(),
        });
    }

    // Credentials come as a pair; one without the other is a config mistake.
    if config.broker.username.is_some() != config.broker.password.is_some() {
        errors.push(ConfigError::Validation {
            message: "broker.username and broker.password must be set together".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = CourierConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_hostname_fails_validation() {
        let mut config = CourierConfig::default();
        config.broker.hostname = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("hostname"))));
    }

    #[test]
    fn zero_connect_attempts_fails_validation() {
        let mut config = CourierConfig::default();
        config.broker.connect_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("connect_attempts"))));
    }

    #[test]
    fn zero_reply_timeout_fails_validation() {
        let mut config = CourierConfig::default();
        config.broker.reply_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("reply_timeout_secs"))));
    }

    #[test]
    fn lone_username_fails_validation() {
        let mut config = CourierConfig::default();
        config.broker.username = Some("guest".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("set together"))));
    }

    #[test]
    fn credential_pair_passes_validation() {
        let mut config = CourierConfig::default();
        config.broker.username = Some("guest".to_string());
        config.broker.password = Some("guest".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
