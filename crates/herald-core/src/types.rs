// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by senders, the router, and the batch aggregator.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::HeraldError;

/// Opaque provider-assigned identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by sender health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Sender is fully operational.
    Healthy,
    /// Sender answers but cannot deliver everything it is asked to.
    Degraded(String),
    /// Sender is not operational.
    Unhealthy(String),
}

/// The closed set of platforms a campaign can target.
///
/// Parsing is case-insensitive, so `"WhatsApp"` and `"whatsapp"` both resolve
/// to [`Platform::WhatsApp`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    WhatsApp,
    Sms,
    Messenger,
    Telegram,
}

impl Platform {
    /// Parses a free-form platform name, rejecting anything outside the closed set.
    pub fn parse(name: &str) -> Result<Self, HeraldError> {
        name.trim()
            .parse()
            .map_err(|_| HeraldError::UnsupportedPlatform(name.to_string()))
    }
}

/// Delivery counters a caller keeps on its campaign record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub sent: usize,
    pub delivered: usize,
    pub opened: usize,
    /// Click-through rate, rendered as a percentage string (e.g. `"15%"`).
    pub ctr: String,
}

/// A configured message targeted at one platform.
///
/// Read-only to the dispatch core; `stats` is updated by the caller from a
/// [`BatchResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub platform: String,
    pub message: String,
    #[serde(default, alias = "mediaUrl")]
    pub media_url: Option<String>,
    #[serde(default, alias = "buttonText")]
    pub button_text: Option<String>,
    #[serde(default, alias = "buttonUrl")]
    pub button_url: Option<String>,
    #[serde(default)]
    pub stats: CampaignStats,
}

impl Campaign {
    /// Non-empty media reference, if any.
    pub fn media(&self) -> Option<&str> {
        non_empty(self.media_url.as_deref())
    }

    /// Button label and target, only when both are set.
    pub fn button(&self) -> Option<(&str, &str)> {
        match (
            non_empty(self.button_text.as_deref()),
            non_empty(self.button_url.as_deref()),
        ) {
            (Some(text), Some(url)) => Some((text, url)),
            _ => None,
        }
    }

    /// Message text with `"<label>: <url>"` appended on a new paragraph when a
    /// button is present.
    pub fn text_with_button_line(&self) -> String {
        match self.button() {
            Some((text, url)) => format!("{}\n\n{text}: {url}", self.message),
            None => self.message.clone(),
        }
    }
}

/// A message recipient with platform-dependent addressing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    /// Free-form phone number, not guaranteed to be E.164.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Telegram chat identifier, used instead of the phone when present.
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
}

impl Contact {
    /// Non-empty Telegram chat identifier, if any.
    pub fn chat_id(&self) -> Option<&str> {
        non_empty(self.telegram_chat_id.as_deref())
    }
}

/// Category of a failed dispatch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    InvalidContact,
    ProviderRejected,
    Network,
    UnsupportedPlatform,
    Simulated,
    Cancelled,
    Internal,
}

/// Per-contact send result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success { message_id: MessageId },
    Failure { kind: FailureKind, error: String },
}

impl DispatchOutcome {
    pub fn success(message_id: MessageId) -> Self {
        Self::Success { message_id }
    }

    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::Success { message_id } => Some(message_id),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<HeraldError> for DispatchOutcome {
    fn from(err: HeraldError) -> Self {
        Self::failure(err.failure_kind(), err.user_message())
    }
}

/// Aggregate of one dispatch call.
///
/// `successful + failed == total_sent == results.len()`, and `results[i]`
/// belongs to the i-th contact handed to the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_sent: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<DispatchOutcome>,
}

impl BatchResult {
    /// Builds a result whose counters are derived from the outcomes.
    pub fn from_outcomes(results: Vec<DispatchOutcome>) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            total_sent: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }

    /// Tri-state summary used to pick the caller's notice.
    pub fn summary(&self) -> SendSummary {
        if self.successful == 0 {
            SendSummary::FullyFailed
        } else if self.failed == 0 {
            SendSummary::FullySent
        } else {
            SendSummary::PartiallySent
        }
    }

    /// Campaign counters estimated from this batch: 70% open rate and 15%
    /// click-through on delivered messages.
    pub fn campaign_stats(&self) -> CampaignStats {
        CampaignStats {
            sent: self.total_sent,
            delivered: self.successful,
            opened: self.successful * 7 / 10,
            ctr: format!("{}%", self.successful * 15 / 100),
        }
    }
}

/// How a batch went, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SendSummary {
    FullySent,
    PartiallySent,
    FullyFailed,
}

impl SendSummary {
    /// Notice text for a finished batch.
    pub fn headline(result: &BatchResult) -> String {
        match result.summary() {
            SendSummary::FullySent => format!(
                "Campaign sent successfully! {}/{} messages delivered.",
                result.successful, result.total_sent
            ),
            SendSummary::PartiallySent => format!(
                "Campaign partially sent: {}/{} messages delivered, {} failed.",
                result.successful, result.total_sent, result.failed
            ),
            SendSummary::FullyFailed => format!(
                "Failed to send campaign. {}/{} messages failed.",
                result.failed, result.total_sent
            ),
        }
    }
}

/// Incremental "N of M" progress published after every contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
