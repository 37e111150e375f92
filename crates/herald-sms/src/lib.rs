// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS sender for the Herald dispatch workspace.
//!
//! Implements [`MessageSender`] for the Twilio Messages API: form-encoded
//! `POST /Accounts/{sid}/Messages.json` with HTTP basic authentication.

use async_trait::async_trait;
use herald_config::model::TwilioConfig;
use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

const PROVIDER: &str = "Twilio API";

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    #[serde(default)]
    message: Option<String>,
}

struct Credentials<'a> {
    account_sid: &'a str,
    auth_token: &'a str,
    from_number: &'a str,
}

/// Twilio SMS sender.
pub struct TwilioSender {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioSender {
    pub fn new(config: TwilioConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn credentials(&self) -> Result<Credentials<'_>, HeraldError> {
        match (
            self.config.account_sid.as_deref(),
            self.config.auth_token.as_deref(),
            self.config.from_number.as_deref(),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) if self.config.can_send() => {
                Ok(Credentials {
                    account_sid,
                    auth_token,
                    from_number,
                })
            }
            _ => Err(HeraldError::Config(
                "Twilio API not configured. Add providers.twilio.account_sid, auth_token and from_number.".into(),
            )),
        }
    }
}

/// Form body for the Messages resource.
pub fn build_form(campaign: &Campaign, from: &str, to: &str) -> Result<String, HeraldError> {
    let body = campaign.text_with_button_line();
    serde_urlencoded::to_string([("From", from), ("To", to), ("Body", body.as_str())])
        .map_err(|e| HeraldError::Internal(format!("failed to encode SMS form: {e}")))
}

#[async_trait]
impl MessageSender for TwilioSender {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        let creds = self.credentials()?;
        if contact.phone.is_empty() {
            return Err(HeraldError::invalid_contact(
                "Contact phone number is required for SMS",
            ));
        }

        let form = build_form(campaign, creds.from_number, &contact.phone)?;
        debug!(contact = %contact.name, to = %contact.phone, "sending SMS via Twilio");

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_base_url, creds.account_sid
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(creds.account_sid, Some(creds.auth_token))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        if status.is_success() {
            let message: TwilioMessage = serde_json::from_str(&body).map_err(|e| {
                HeraldError::rejected(PROVIDER, format!("unreadable response: {e}"))
            })?;
            return Ok(MessageId(message.sid));
        }

        let message = serde_json::from_str::<TwilioError>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "Twilio API error".to_string());
        Err(HeraldError::rejected(PROVIDER, message))
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        let creds = match self.credentials() {
            Ok(creds) => creds,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.user_message())),
        };

        let url = format!(
            "{}/Accounts/{}.json",
            self.config.api_base_url, creds.account_sid
        );
        match self
            .client
            .get(&url)
            .basic_auth(creds.account_sid, Some(creds.auth_token))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Unhealthy(format!(
                "Twilio returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Twilio unreachable: {}",
                e.without_url()
            ))),
        }
    }
}
