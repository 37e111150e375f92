// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Herald dispatch workspace.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions. The provider credential set handed to
//! the dispatch service lives in [`model::ProviderCredentials`].
//!
//! # Usage
//!
//! ```no_run
//! use herald_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("pacing: {}ms", config.dispatch.pacing_delay_ms);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{HeraldConfig, ProviderCredentials};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `HeraldConfig` or every diagnostic collected while
/// loading and validating.
pub fn load_and_validate() -> Result<HeraldConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<HeraldConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

/// Load configuration from a file path (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<HeraldConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

#[allow(clippy::result_large_err)]
fn finish(loaded: Result<HeraldConfig, figment::Error>) -> Result<HeraldConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            let incomplete = config.providers.incomplete_bundles();
            if !incomplete.is_empty() {
                tracing::warn!(
                    bundles = ?incomplete,
                    "some provider credential bundles are incomplete"
                );
            }
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
