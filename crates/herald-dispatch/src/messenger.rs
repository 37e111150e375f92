// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger placeholder. Contacts are addressed by email, but the Send API
//! needs a page-scoped id, so every send fails.

use async_trait::async_trait;
use herald_config::model::MessengerConfig;
use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};

pub struct MessengerSender {
    config: MessengerConfig,
}

impl MessengerSender {
    pub fn new(config: MessengerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MessageSender for MessengerSender {
    fn name(&self) -> &str {
        "messenger"
    }

    async fn send(&self, _campaign: &Campaign, _contact: &Contact) -> Result<MessageId, HeraldError> {
        if !self.config.is_configured() {
            return Err(HeraldError::Config(
                "Messenger API not configured. Add providers.messenger.page_token.".into(),
            ));
        }
        Err(HeraldError::rejected(
            "Messenger",
            "Messenger requires recipient-identifier (PSID) mapping, not implemented",
        ))
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Degraded(
            "Messenger delivery is not implemented".into(),
        ))
    }
}
