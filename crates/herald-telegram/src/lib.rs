// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram sender for the Herald dispatch workspace.
//!
//! Implements [`MessageSender`] against the Telegram Bot API `sendMessage`
//! method. Buttons are rendered as a single-row inline keyboard and known
//! delivery errors are rewritten per contact by [`errors::remap_description`].

pub mod errors;

use async_trait::async_trait;
use herald_config::model::TelegramConfig;
use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PROVIDER: &str = "Telegram Bot API";

const TEST_MESSAGE: &str = "This is a test message from Herald. Your Telegram configuration is working correctly!";

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup<'a> {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton<'a>>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton<'a> {
    pub text: &'a str,
    pub url: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Option<SentMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram Bot API sender.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    pub fn new(config: TelegramConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn token(&self) -> Result<&str, HeraldError> {
        match self.config.bot_token.as_deref() {
            Some(token) if self.config.is_configured() => Ok(token),
            _ => Err(HeraldError::Config(
                "Telegram Bot Token not configured. Add providers.telegram.bot_token.".into(),
            )),
        }
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{token}/{method}", self.config.api_base_url)
    }

    async fn send_text(
        &self,
        request: &SendMessageRequest<'_>,
        contact_name: &str,
    ) -> Result<MessageId, HeraldError> {
        let token = self.token()?;
        let response = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .json(request)
            .send()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;
        let parsed: Option<BotResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(BotResponse {
                ok: true,
                result: Some(sent),
                ..
            }) => Ok(MessageId(sent.message_id.to_string())),
            Some(resp) => Err(HeraldError::rejected(
                PROVIDER,
                errors::remap_description(resp.description.as_deref(), contact_name),
            )),
            None => Err(HeraldError::rejected(
                PROVIDER,
                errors::remap_description(None, contact_name),
            )),
        }
    }

    /// Sends a fixed test message to `default_chat_id`.
    pub async fn send_test_message(&self) -> Result<MessageId, HeraldError> {
        let chat_id = self
            .config
            .default_chat_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                HeraldError::Config(
                    "providers.telegram.default_chat_id is required for a test message".into(),
                )
            })?;

        let request = SendMessageRequest {
            chat_id,
            text: TEST_MESSAGE,
            reply_markup: None,
        };
        let id = self.send_text(&request, chat_id).await?;
        info!(chat_id, message_id = %id, "Telegram test message delivered");
        Ok(id)
    }
}

/// Builds the `sendMessage` body for a campaign and a resolved chat id.
pub fn build_request<'a>(campaign: &'a Campaign, chat_id: &'a str) -> SendMessageRequest<'a> {
    SendMessageRequest {
        chat_id,
        text: &campaign.message,
        reply_markup: campaign.button().map(|(text, url)| InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton { text, url }]],
        }),
    }
}

/// The contact's chat id, falling back to the phone number.
pub fn resolve_chat_id(contact: &Contact) -> Result<&str, HeraldError> {
    contact
        .chat_id()
        .or_else(|| Some(contact.phone.as_str()).filter(|p| !p.is_empty()))
        .ok_or_else(|| {
            HeraldError::invalid_contact(
                "No Telegram chat ID available for this contact. Users must start a conversation with your bot first.",
            )
        })
}

#[async_trait]
impl MessageSender for TelegramSender {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        self.token()?;
        let chat_id = resolve_chat_id(contact)?;
        debug!(contact = %contact.name, chat_id, "sending via Telegram");
        self.send_text(&build_request(campaign, chat_id), &contact.name)
            .await
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        let token = match self.token() {
            Ok(token) => token,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.user_message())),
        };

        match self.client.get(self.method_url(token, "getMe")).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot rejected: {}",
                resp.status()
            ))),
            // The request URL embeds the bot token.
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {}",
                e.without_url()
            ))),
        }
    }
}
