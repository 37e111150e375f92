// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sender trait for provider integrations (WhatsApp, SMS, Telegram, etc.).

use async_trait::async_trait;

use crate::error::HeraldError;
use crate::types::{Campaign, Contact, HealthStatus, MessageId};

/// One way of delivering a campaign message to a single contact.
///
/// Implementations shape a provider-specific request from the generic
/// campaign and contact, call the provider, and interpret its response.
/// Expected failures (missing credentials, provider rejection, transport
/// errors) are returned as `Err`; the router decides whether to try the
/// next candidate.
#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    /// Returns the human-readable name of this sender.
    fn name(&self) -> &str;

    /// Sends the campaign message to one contact.
    async fn send(&self, campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError>;

    /// Checks that the provider is reachable with the configured credentials.
    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }
}
