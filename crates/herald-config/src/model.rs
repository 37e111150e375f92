// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Herald dispatch workspace.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Herald configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeraldConfig {
    /// Batch pacing and HTTP settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Demo-mode simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Per-provider credential bundles.
    #[serde(default)]
    pub providers: ProviderCredentials,
}

/// Batch aggregator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Delay inserted before every per-contact attempt, in milliseconds.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Timeout applied to every provider HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: default_pacing_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_pacing_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Demo-mode simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Probability that a simulated send succeeds.
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,

    /// Fixed RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Reasons picked from on the simulated-failure branch.
    #[serde(default = "default_simulated_errors")]
    pub error_messages: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            success_rate: default_success_rate(),
            seed: None,
            error_messages: default_simulated_errors(),
        }
    }
}

fn default_success_rate() -> f64 {
    0.95
}

fn default_simulated_errors() -> Vec<String> {
    vec![
        "Simulated: Invalid contact info".to_string(),
        "Simulated: User not found".to_string(),
        "Simulated: Message blocked".to_string(),
    ]
}

/// Credential bundles for every provider.
///
/// Populated by an external setup flow and read-only at dispatch time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderCredentials {
    /// Primary WhatsApp gateway.
    #[serde(default)]
    pub wbiztool: WbizToolConfig,

    /// WhatsApp Business (Graph) API, used as the WhatsApp fallback.
    #[serde(default)]
    pub whatsapp_business: WhatsAppBusinessConfig,

    /// Twilio SMS gateway.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Telegram Bot API.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Facebook Messenger page.
    #[serde(default)]
    pub messenger: MessengerConfig,
}

impl ProviderCredentials {
    /// Names of bundles that have some but not all of their fields set.
    pub fn incomplete_bundles(&self) -> Vec<&'static str> {
        let mut incomplete = Vec::new();
        if self.wbiztool.is_partial() {
            incomplete.push("wbiztool");
        }
        if self.whatsapp_business.is_partial() {
            incomplete.push("whatsapp_business");
        }
        if self.twilio.is_partial() {
            incomplete.push("twilio");
        }
        incomplete
    }
}

/// Primary WhatsApp gateway credentials (client id, API key, WhatsApp client id).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WbizToolConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Sub-client identifying the sending WhatsApp number.
    #[serde(default)]
    pub whatsapp_client_id: Option<String>,

    /// Send endpoint of the gateway.
    #[serde(default = "default_wbiztool_endpoint")]
    pub endpoint: String,
}

impl Default for WbizToolConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            api_key: None,
            whatsapp_client_id: None,
            endpoint: default_wbiztool_endpoint(),
        }
    }
}

impl WbizToolConfig {
    /// All three identifiers are set.
    pub fn is_configured(&self) -> bool {
        is_set(&self.client_id) && is_set(&self.api_key) && is_set(&self.whatsapp_client_id)
    }

    fn is_partial(&self) -> bool {
        let any = is_set(&self.client_id) || is_set(&self.api_key) || is_set(&self.whatsapp_client_id);
        any && !self.is_configured()
    }
}

fn default_wbiztool_endpoint() -> String {
    "https://wbiztool.com/api/v1/send_msg/".to_string()
}

/// WhatsApp Business (Graph) API credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppBusinessConfig {
    /// Bearer access token.
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub phone_number_id: Option<String>,

    #[serde(default = "default_graph_base_url")]
    pub api_base_url: String,
}

impl Default for WhatsAppBusinessConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            api_base_url: default_graph_base_url(),
        }
    }
}

impl WhatsAppBusinessConfig {
    /// An access token is present. This is what counts toward production mode.
    pub fn is_configured(&self) -> bool {
        is_set(&self.access_token)
    }

    /// Token and phone number id are both present, so the fallback can send.
    pub fn can_send(&self) -> bool {
        is_set(&self.access_token) && is_set(&self.phone_number_id)
    }

    fn is_partial(&self) -> bool {
        (is_set(&self.access_token) || is_set(&self.phone_number_id)) && !self.can_send()
    }
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com/v17.0".to_string()
}

/// Twilio SMS credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,

    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender number in E.164 form.
    #[serde(default)]
    pub from_number: Option<String>,

    #[serde(default = "default_twilio_base_url")]
    pub api_base_url: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base_url: default_twilio_base_url(),
        }
    }
}

impl TwilioConfig {
    /// Account sid and auth token are present. This is what counts toward
    /// production mode; sending additionally needs `from_number`.
    pub fn is_configured(&self) -> bool {
        is_set(&self.account_sid) && is_set(&self.auth_token)
    }

    pub fn can_send(&self) -> bool {
        self.is_configured() && is_set(&self.from_number)
    }

    fn is_partial(&self) -> bool {
        let any = is_set(&self.account_sid) || is_set(&self.auth_token) || is_set(&self.from_number);
        any && !self.can_send()
    }
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com/2010-04-01".to_string()
}

/// Telegram Bot API credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat used for connection tests.
    #[serde(default)]
    pub default_chat_id: Option<String>,

    #[serde(default = "default_telegram_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            default_chat_id: None,
            api_base_url: default_telegram_base_url(),
        }
    }
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        is_set(&self.bot_token)
    }
}

fn default_telegram_base_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Facebook Messenger page credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessengerConfig {
    /// Page access token.
    #[serde(default)]
    pub page_token: Option<String>,
}

impl MessengerConfig {
    pub fn is_configured(&self) -> bool {
        is_set(&self.page_token)
    }
}

/// A credential counts as set only when it is present and non-blank.
pub fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
