// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `DispatchService` facade callers construct from configuration.

use std::time::Duration;

use herald_config::model::{TelegramConfig, WbizToolConfig};
use herald_config::HeraldConfig;
use herald_core::{
    BatchProgress, BatchResult, Campaign, Contact, HealthStatus, HeraldError, MessageId,
};
use herald_telegram::TelegramSender;
use herald_whatsapp::WbizToolSender;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::batch::BatchAggregator;
use crate::mode::DispatchMode;
use crate::router::ProviderRouter;

/// Entry point for campaign dispatch.
///
/// Owns one shared HTTP client (with the configured request timeout), the
/// provider routes and the batch aggregator.
pub struct DispatchService {
    aggregator: BatchAggregator,
    client: reqwest::Client,
    telegram: TelegramConfig,
    wbiztool: WbizToolConfig,
}

impl DispatchService {
    /// Builds the service from a loaded and validated configuration.
    pub fn from_config(config: &HeraldConfig) -> Result<Self, HeraldError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.dispatch.request_timeout_secs))
            .build()
            .map_err(|e| HeraldError::Internal(format!("failed to build HTTP client: {e}")))?;

        let router = ProviderRouter::from_config(config, client.clone());
        info!(
            mode = %router.mode(),
            pacing_ms = config.dispatch.pacing_delay_ms,
            "dispatch service ready"
        );

        Ok(Self {
            aggregator: BatchAggregator::new(
                router,
                Duration::from_millis(config.dispatch.pacing_delay_ms),
            ),
            client,
            telegram: config.providers.telegram.clone(),
            wbiztool: config.providers.wbiztool.clone(),
        })
    }

    pub fn mode(&self) -> DispatchMode {
        self.aggregator.router().mode()
    }

    /// Sends `campaign` to every contact, in order. Never fails as a whole.
    pub async fn send_campaign_to_contacts(
        &self,
        campaign: &Campaign,
        contacts: &[Contact],
    ) -> BatchResult {
        self.aggregator
            .send_campaign_to_contacts(campaign, contacts)
            .await
    }

    /// Cancellable variant with progress reporting.
    pub async fn run_batch(
        &self,
        campaign: &Campaign,
        contacts: &[Contact],
        cancel: &CancellationToken,
        progress: Option<&watch::Sender<BatchProgress>>,
    ) -> BatchResult {
        self.aggregator
            .run_batch(campaign, contacts, cancel, progress)
            .await
    }

    /// Health of every registered sender, by sender name.
    pub async fn check_providers(&self) -> Vec<(String, HealthStatus)> {
        let mut report = Vec::new();
        for sender in self.aggregator.router().senders() {
            let status = sender
                .health_check()
                .await
                .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
            if !matches!(status, HealthStatus::Healthy) {
                warn!(sender = sender.name(), status = ?status, "provider not healthy");
            }
            report.push((sender.name().to_string(), status));
        }
        report
    }

    /// Sends the Telegram connection-test message to the default chat.
    pub async fn send_telegram_test_message(&self) -> Result<MessageId, HeraldError> {
        TelegramSender::new(self.telegram.clone(), self.client.clone())
            .send_test_message()
            .await
    }

    /// Sends the WhatsApp gateway connection-test message to `to`.
    pub async fn send_whatsapp_test_message(&self, to: &str) -> Result<MessageId, HeraldError> {
        WbizToolSender::new(self.wbiztool.clone(), self.client.clone())
            .send_test_message(to)
            .await
    }
}
