// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./herald.toml` > `~/.config/herald/herald.toml` > `/etc/herald/herald.toml`
//! with environment variable overrides via `HERALD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HeraldConfig;

/// Provider bundle names, matched before the generic section split so that
/// `whatsapp_business_access_token` is not cut at the first underscore.
const PROVIDER_SECTIONS: &[&str] = &[
    "whatsapp_business",
    "wbiztool",
    "twilio",
    "telegram",
    "messenger",
];

const TOP_LEVEL_SECTIONS: &[&str] = &["dispatch", "simulation"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/herald/herald.toml` (system-wide)
/// 3. `~/.config/herald/herald.toml` (user XDG config)
/// 4. `./herald.toml` (local directory)
/// 5. `HERALD_*` environment variables
pub fn load_config() -> Result<HeraldConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<HeraldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HeraldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file("/etc/herald/herald.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("herald/herald.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("herald.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HERALD_PROVIDERS_TWILIO_AUTH_TOKEN` must map to
/// `providers.twilio.auth_token`, not `providers.twilio.auth.token`.
fn env_provider() -> Env {
    Env::prefixed("HERALD_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    if let Some(rest) = key.strip_prefix("providers_") {
        for section in PROVIDER_SECTIONS {
            if let Some(field) = rest
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("providers.{section}.{field}");
            }
        }
        return format!("providers.{rest}");
    }

    for section in TOP_LEVEL_SECTIONS {
        if let Some(field) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{field}");
        }
    }

    key.to_string()
}
