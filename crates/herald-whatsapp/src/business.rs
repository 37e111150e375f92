// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback WhatsApp path: the Graph-style WhatsApp Business API.

use async_trait::async_trait;
use herald_config::model::WhatsAppBusinessConfig;
use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

const PROVIDER: &str = "WhatsApp Business API";

#[derive(Debug, Deserialize)]
struct GraphSendResponse {
    #[serde(default)]
    messages: Vec<GraphMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    #[serde(default)]
    message: Option<String>,
}

/// Sends WhatsApp messages through the WhatsApp Business (Graph) API.
pub struct WhatsAppBusinessSender {
    config: WhatsAppBusinessConfig,
    client: reqwest::Client,
}

impl WhatsAppBusinessSender {
    pub fn new(config: WhatsAppBusinessConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn credentials(&self) -> Result<(&str, &str), HeraldError> {
        match (
            self.config.access_token.as_deref(),
            self.config.phone_number_id.as_deref(),
        ) {
            (Some(token), Some(phone_number_id)) if self.config.can_send() => {
                Ok((token, phone_number_id))
            }
            _ => Err(HeraldError::Config(
                "WhatsApp Business API not configured: providers.whatsapp_business.access_token and phone_number_id are required".into(),
            )),
        }
    }
}

/// Builds the Graph message body.
///
/// A button turns the message into an `interactive` one; otherwise media is
/// sent as an `image` with the message as caption, and plain text as `text`.
pub fn build_message_body(campaign: &Campaign, to: &str) -> Value {
    let mut body = Map::new();
    body.insert("messaging_product".into(), json!("whatsapp"));
    body.insert("to".into(), json!(to));

    match campaign.media() {
        Some(link) => {
            body.insert("type".into(), json!("image"));
            body.insert(
                "image".into(),
                json!({ "link": link, "caption": campaign.message }),
            );
        }
        None => {
            body.insert("type".into(), json!("text"));
            body.insert("text".into(), json!({ "body": campaign.message }));
        }
    }

    if let Some((title, url)) = campaign.button() {
        body.insert("type".into(), json!("interactive"));
        body.insert(
            "interactive".into(),
            json!({
                "type": "button",
                "body": { "text": campaign.message },
                "action": {
                    "buttons": [{ "type": "web_url", "title": title, "url": url }]
                }
            }),
        );
    }

    Value::Object(body)
}

#[async_trait]
impl MessageSender for WhatsAppBusinessSender {
    fn name(&self) -> &str {
        "whatsapp_business"
    }

    async fn send(&self, campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        let (token, phone_number_id) = self.credentials()?;
        if contact.phone.is_empty() {
            return Err(HeraldError::invalid_contact(
                "Contact phone number is required for WhatsApp",
            ));
        }

        debug!(contact = %contact.name, "sending via WhatsApp Business API");

        let url = format!("{}/{phone_number_id}/messages", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&build_message_body(campaign, &contact.phone))
            .send()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        if status.is_success() {
            let parsed: GraphSendResponse = serde_json::from_str(&body).map_err(|e| {
                HeraldError::rejected(PROVIDER, format!("unreadable response: {e}"))
            })?;
            return parsed
                .messages
                .into_iter()
                .next()
                .map(|m| MessageId(m.id))
                .ok_or_else(|| {
                    HeraldError::rejected(PROVIDER, "response did not include a message id")
                });
        }

        let message = serde_json::from_str::<GraphErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or_else(|| "WhatsApp Business API error".to_string());
        Err(HeraldError::rejected(PROVIDER, message))
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        let (token, phone_number_id) = match self.credentials() {
            Ok(creds) => creds,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.user_message())),
        };

        let url = format!("{}/{phone_number_id}", self.config.api_base_url);
        match self.client.get(&url).bearer_auth(token).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Unhealthy(format!(
                "WhatsApp Business API returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "WhatsApp Business API unreachable: {}",
                e.without_url()
            ))),
        }
    }
}
