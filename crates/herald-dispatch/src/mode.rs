// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch-level choice between simulated and real delivery.

use herald_config::ProviderCredentials;
use strum::Display;
use tracing::warn;

/// Whether a batch simulates outcomes or calls real providers.
///
/// Simulation is all-or-nothing: once any provider bundle is present, every
/// platform attempts real sends, and unconfigured ones fail with
/// "not configured" instead of being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DispatchMode {
    Demo,
    Production,
}

impl DispatchMode {
    /// Demo iff none of the WhatsApp gateway, WhatsApp Business, Twilio or
    /// Telegram bundles is present. Messenger never counts.
    pub fn resolve(credentials: &ProviderCredentials) -> Self {
        let incomplete = credentials.incomplete_bundles();
        if !incomplete.is_empty() {
            warn!(bundles = ?incomplete, "provider credential bundles are incomplete");
        }

        let any_present = credentials.wbiztool.is_configured()
            || credentials.whatsapp_business.is_configured()
            || credentials.twilio.is_configured()
            || credentials.telegram.is_configured();

        if any_present {
            Self::Production
        } else {
            Self::Demo
        }
    }

    pub fn is_demo(self) -> bool {
        self == Self::Demo
    }
}

/// Shorthand for `DispatchMode::resolve(credentials).is_demo()`.
pub fn is_demo_mode(credentials: &ProviderCredentials) -> bool {
    DispatchMode::resolve(credentials).is_demo()
}
