// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential batch dispatch.
//!
//! Contacts are sent one at a time in input order with a pacing delay before
//! every attempt. A failing or panicking send is recorded against its contact
//! and the batch moves on. Cancellation is observed only between contacts.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use herald_core::{
    BatchProgress, BatchResult, Campaign, Contact, DispatchOutcome, FailureKind, Platform,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::mode::DispatchMode;
use crate::recording::record_outcome;
use crate::router::{unsupported_platform, ProviderRouter};
use crate::validate::contact_address;

const CANCELLED: &str = "Batch cancelled before this contact was attempted";

/// Runs campaigns through a [`ProviderRouter`], one contact at a time.
pub struct BatchAggregator {
    router: ProviderRouter,
    pacing: Duration,
}

impl BatchAggregator {
    pub fn new(router: ProviderRouter, pacing: Duration) -> Self {
        Self { router, pacing }
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Sends `campaign` to every contact and aggregates the outcomes.
    pub async fn send_campaign_to_contacts(
        &self,
        campaign: &Campaign,
        contacts: &[Contact],
    ) -> BatchResult {
        self.run_batch(campaign, contacts, &CancellationToken::new(), None)
            .await
    }

    /// Like [`send_campaign_to_contacts`](Self::send_campaign_to_contacts),
    /// with cooperative cancellation and per-contact progress.
    ///
    /// Contacts not attempted because of cancellation are recorded as
    /// [`FailureKind::Cancelled`], so `results` still has one entry per contact.
    pub async fn run_batch(
        &self,
        campaign: &Campaign,
        contacts: &[Contact],
        cancel: &CancellationToken,
        progress: Option<&watch::Sender<BatchProgress>>,
    ) -> BatchResult {
        let total = contacts.len();
        let mut tally = BatchProgress {
            total,
            ..Default::default()
        };
        let mut results = Vec::with_capacity(total);

        let Ok(platform) = Platform::parse(&campaign.platform) else {
            warn!(
                campaign = %campaign.name,
                platform = %campaign.platform,
                contacts = total,
                "unsupported platform, rejecting every contact"
            );
            for _ in contacts {
                let outcome = unsupported_platform(&campaign.platform);
                record_outcome("unsupported", &outcome);
                push(&mut results, &mut tally, outcome, progress);
            }
            return BatchResult::from_outcomes(results);
        };

        let mode = self.router.mode();
        match mode {
            DispatchMode::Production => info!(
                campaign = %campaign.name,
                platform = %platform,
                contacts = total,
                "production mode: real messages will be sent"
            ),
            DispatchMode::Demo => warn!(
                campaign = %campaign.name,
                platform = %platform,
                contacts = total,
                "demo mode: no real messages will be sent"
            ),
        }

        for (i, contact) in contacts.iter().enumerate() {
            if !self.pace(cancel).await {
                info!(remaining = total - i, "batch cancelled, remaining contacts not attempted");
                for _ in &contacts[i..] {
                    let outcome = DispatchOutcome::failure(FailureKind::Cancelled, CANCELLED);
                    record_outcome(&platform.to_string(), &outcome);
                    push(&mut results, &mut tally, outcome, progress);
                }
                break;
            }

            debug!(
                n = i + 1,
                total,
                mode = %mode,
                contact = %contact.name,
                address = %contact_address(contact, &campaign.platform),
                "dispatching"
            );

            let outcome = AssertUnwindSafe(self.router.send_via(platform, campaign, contact))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    error!(contact = %contact.name, "sender panicked");
                    DispatchOutcome::failure(FailureKind::Network, "Network error")
                });

            match &outcome {
                DispatchOutcome::Success { message_id } => {
                    debug!(contact = %contact.name, message_id = %message_id, "delivered");
                }
                DispatchOutcome::Failure { kind, error } => {
                    info!(contact = %contact.name, kind = %kind, error = %error, "delivery failed");
                }
            }
            record_outcome(&platform.to_string(), &outcome);
            push(&mut results, &mut tally, outcome, progress);
        }

        let result = BatchResult::from_outcomes(results);
        info!(
            campaign = %campaign.name,
            total = result.total_sent,
            successful = result.successful,
            failed = result.failed,
            "campaign batch finished"
        );
        if mode.is_demo() {
            warn!("demo mode: configure provider credentials to send real messages");
        }
        result
    }

    /// Waits out the pacing delay. Returns `false` if cancelled first.
    async fn pace(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.pacing.is_zero() {
            return true;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.pacing) => true,
        }
    }
}

fn push(
    results: &mut Vec<DispatchOutcome>,
    tally: &mut BatchProgress,
    outcome: DispatchOutcome,
    progress: Option<&watch::Sender<BatchProgress>>,
) {
    tally.completed += 1;
    if outcome.is_success() {
        tally.successful += 1;
    } else {
        tally.failed += 1;
    }
    results.push(outcome);
    if let Some(tx) = progress {
        tx.send_replace(*tally);
    }
}
