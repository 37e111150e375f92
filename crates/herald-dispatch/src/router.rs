// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider routing.
//!
//! Each platform maps to an ordered list of candidate senders. The router
//! tries them in order and moves on only when a candidate returns `Err`, so
//! the WhatsApp gateway to Business API fallback is plain data rather than
//! control flow. In demo mode every platform routes to the simulated sender.

use std::collections::HashMap;
use std::sync::Arc;

use herald_config::HeraldConfig;
use herald_core::{
    Campaign, Contact, DispatchOutcome, FailureKind, HeraldError, MessageSender, Platform,
};
use herald_sms::TwilioSender;
use herald_telegram::TelegramSender;
use herald_whatsapp::{WbizToolSender, WhatsAppBusinessSender};
use tracing::{debug, warn};

use crate::messenger::MessengerSender;
use crate::mode::DispatchMode;
use crate::simulated::SimulatedSender;

#[derive(Default)]
struct Route {
    candidates: Vec<Arc<dyn MessageSender>>,
    /// Credential a single-candidate route is missing to have a fallback.
    missing_fallback: Option<&'static str>,
}

/// Maps platforms to candidate senders for one dispatch mode.
pub struct ProviderRouter {
    mode: DispatchMode,
    simulated: Option<Arc<dyn MessageSender>>,
    routes: HashMap<Platform, Route>,
}

impl ProviderRouter {
    /// An empty router. Senders are added with [`register`](Self::register).
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            simulated: None,
            routes: HashMap::new(),
        }
    }

    /// Builds the standard routes from configuration.
    ///
    /// The mode is resolved from the credential set; the WhatsApp Business
    /// sender is only registered as a fallback when it can actually send.
    pub fn from_config(config: &HeraldConfig, client: reqwest::Client) -> Self {
        let providers = &config.providers;
        let mut router = Self::new(DispatchMode::resolve(providers))
            .with_simulated(Arc::new(SimulatedSender::new(&config.simulation)));

        router.register(
            Platform::WhatsApp,
            Arc::new(WbizToolSender::new(providers.wbiztool.clone(), client.clone())),
        );
        if providers.whatsapp_business.can_send() {
            router.register(
                Platform::WhatsApp,
                Arc::new(WhatsAppBusinessSender::new(
                    providers.whatsapp_business.clone(),
                    client.clone(),
                )),
            );
        } else {
            router.set_missing_fallback(
                Platform::WhatsApp,
                "providers.whatsapp_business.access_token and phone_number_id",
            );
        }

        router.register(
            Platform::Sms,
            Arc::new(TwilioSender::new(providers.twilio.clone(), client.clone())),
        );
        router.register(
            Platform::Telegram,
            Arc::new(TelegramSender::new(providers.telegram.clone(), client)),
        );
        router.register(
            Platform::Messenger,
            Arc::new(MessengerSender::new(providers.messenger.clone())),
        );

        router
    }

    /// Sets the sender that answers every platform in demo mode.
    pub fn with_simulated(mut self, sender: Arc<dyn MessageSender>) -> Self {
        self.simulated = Some(sender);
        self
    }

    /// Appends `sender` to the candidate list for `platform`.
    pub fn register(&mut self, platform: Platform, sender: Arc<dyn MessageSender>) {
        self.routes.entry(platform).or_default().candidates.push(sender);
    }

    /// Records which credential would have provided a fallback for `platform`.
    pub fn set_missing_fallback(&mut self, platform: Platform, requirement: &'static str) {
        self.routes.entry(platform).or_default().missing_fallback = Some(requirement);
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Senders tried for `platform`, in order, under the current mode.
    pub fn candidates(&self, platform: Platform) -> Vec<Arc<dyn MessageSender>> {
        match self.mode {
            DispatchMode::Demo => self.simulated.iter().cloned().collect(),
            DispatchMode::Production => self
                .routes
                .get(&platform)
                .map(|r| r.candidates.clone())
                .unwrap_or_default(),
        }
    }

    /// Every distinct sender the router can reach, for health reporting.
    pub fn senders(&self) -> Vec<Arc<dyn MessageSender>> {
        let mut all: Vec<Arc<dyn MessageSender>> = Vec::new();
        let registered = self.routes.values().flat_map(|r| r.candidates.iter());
        for sender in self.simulated.iter().chain(registered) {
            if !all.iter().any(|s| Arc::ptr_eq(s, sender)) {
                all.push(Arc::clone(sender));
            }
        }
        all
    }

    /// Sends `campaign` to one contact, parsing the campaign's platform first.
    ///
    /// Never returns an error: every failure becomes a
    /// [`DispatchOutcome::Failure`].
    pub async fn send_message_to_contact(
        &self,
        campaign: &Campaign,
        contact: &Contact,
    ) -> DispatchOutcome {
        match Platform::parse(&campaign.platform) {
            Ok(platform) => self.send_via(platform, campaign, contact).await,
            Err(_) => unsupported_platform(&campaign.platform),
        }
    }

    /// Sends through the candidates registered for an already parsed platform.
    pub async fn send_via(
        &self,
        platform: Platform,
        campaign: &Campaign,
        contact: &Contact,
    ) -> DispatchOutcome {
        let candidates = self.candidates(platform);
        if candidates.is_empty() {
            return HeraldError::Config(format!("no sender registered for {platform}")).into();
        }

        let last = candidates.len() - 1;
        for (i, sender) in candidates.iter().enumerate() {
            match sender.send(campaign, contact).await {
                Ok(id) => {
                    debug!(sender = sender.name(), message_id = %id, "send accepted");
                    return DispatchOutcome::success(id);
                }
                Err(e) if i < last => {
                    warn!(
                        platform = %platform,
                        sender = sender.name(),
                        contact = %contact.name,
                        error = %e,
                        "sender failed, trying next candidate"
                    );
                }
                Err(e) => return self.final_failure(platform, candidates.len(), e),
            }
        }

        HeraldError::Internal("candidate list exhausted without an outcome".into()).into()
    }

    fn final_failure(&self, platform: Platform, tried: usize, err: HeraldError) -> DispatchOutcome {
        let missing = match self.mode {
            DispatchMode::Production if tried == 1 => self
                .routes
                .get(&platform)
                .and_then(|r| r.missing_fallback),
            _ => None,
        };

        match missing {
            Some(requirement) => DispatchOutcome::failure(
                FailureKind::Configuration,
                format!(
                    "{platform} primary sender failed ({}) and no fallback is configured: set {requirement}",
                    err.user_message()
                ),
            ),
            None => err.into(),
        }
    }
}

/// Failure recorded for every contact of a campaign naming an unknown platform.
pub fn unsupported_platform(name: &str) -> DispatchOutcome {
    DispatchOutcome::failure(
        FailureKind::UnsupportedPlatform,
        format!("Unsupported platform: {name}"),
    )
}
