// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: probability ranges,
//! non-zero timeouts, and well-formed provider URLs.

use crate::diagnostic::ConfigError;
use crate::model::HeraldConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HeraldConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.dispatch.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    let rate = config.simulation.success_rate;
    if !(0.0..=1.0).contains(&rate) {
        errors.push(ConfigError::Validation {
            message: format!("simulation.success_rate must be between 0.0 and 1.0, got {rate}"),
        });
    }

    if config.simulation.error_messages.is_empty() {
        errors.push(ConfigError::Validation {
            message: "simulation.error_messages must contain at least one message".to_string(),
        });
    }

    let urls = [
        ("providers.wbiztool.endpoint", &config.providers.wbiztool.endpoint),
        (
            "providers.whatsapp_business.api_base_url",
            &config.providers.whatsapp_business.api_base_url,
        ),
        ("providers.twilio.api_base_url", &config.providers.twilio.api_base_url),
        ("providers.telegram.api_base_url", &config.providers.telegram.api_base_url),
    ];
    for (key, url) in urls {
        if !is_http_url(url) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{url}` must be an http:// or https:// URL"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|host| !host.is_empty())
}
