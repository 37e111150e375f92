// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary WhatsApp path: the WbizTool send gateway.

use async_trait::async_trait;
use herald_config::model::WbizToolConfig;
use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::phone::normalize_phone;

const PROVIDER: &str = "WhatsApp gateway";

const TEST_MESSAGE: &str =
    "This is a test message from Herald via the WhatsApp gateway. Your configuration is working correctly!";

/// Request body accepted by the gateway.
#[derive(Debug, Serialize)]
pub struct GatewayRequest<'a> {
    pub client_id: &'a str,
    pub api_key: &'a str,
    pub whatsapp_client: &'a str,
    pub to: String,
    pub message: String,
    /// `media` when a media reference is attached, `text` otherwise.
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, alias = "messageId", alias = "msg_id")]
    message_id: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Sends WhatsApp messages through the WbizTool gateway.
pub struct WbizToolSender {
    config: WbizToolConfig,
    client: reqwest::Client,
}

impl WbizToolSender {
    pub fn new(config: WbizToolConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn credentials(&self) -> Result<(&str, &str, &str), HeraldError> {
        let (Some(client_id), Some(api_key), Some(whatsapp_client)) = (
            self.config.client_id.as_deref(),
            self.config.api_key.as_deref(),
            self.config.whatsapp_client_id.as_deref(),
        ) else {
            return Err(HeraldError::Config(
                "WhatsApp gateway not configured: providers.wbiztool.client_id, api_key and whatsapp_client_id are required".into(),
            ));
        };
        if !self.config.is_configured() {
            return Err(HeraldError::Config(
                "WhatsApp gateway not configured: providers.wbiztool credentials are blank".into(),
            ));
        }
        Ok((client_id, api_key, whatsapp_client))
    }

    /// Shapes the gateway request for one contact.
    ///
    /// A contact without a usable phone is rejected before credentials are
    /// looked at or anything is built.
    pub fn build_request<'a>(
        &'a self,
        campaign: &'a Campaign,
        contact: &Contact,
    ) -> Result<GatewayRequest<'a>, HeraldError> {
        let to = normalize_phone(&contact.phone)?;
        self.request(to, campaign.text_with_button_line(), campaign.media())
    }

    fn request<'a>(
        &'a self,
        to: String,
        message: String,
        media_url: Option<&'a str>,
    ) -> Result<GatewayRequest<'a>, HeraldError> {
        let (client_id, api_key, whatsapp_client) = self.credentials()?;
        Ok(GatewayRequest {
            client_id,
            api_key,
            whatsapp_client,
            to,
            message,
            kind: if media_url.is_some() { "media" } else { "text" },
            media_url,
        })
    }

    async fn deliver(&self, request: &GatewayRequest<'_>) -> Result<MessageId, HeraldError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::transport(PROVIDER, e.without_url()))?;

        if body.trim().is_empty() {
            return Err(HeraldError::rejected(
                PROVIDER,
                "No response from WhatsApp gateway",
            ));
        }

        let parsed: GatewayResponse = serde_json::from_str(&body).map_err(|_| {
            HeraldError::rejected(PROVIDER, format!("gateway returned {status}: {body}"))
        })?;

        if parsed.success {
            let id = parsed.message_id.map(value_to_string).unwrap_or_default();
            if id.is_empty() {
                warn!(to = %request.to, "gateway reported success without a message id");
            }
            return Ok(MessageId(id));
        }

        let message = parsed
            .error
            .map(value_to_string)
            .unwrap_or_else(|| "Unknown WhatsApp gateway error".to_string());
        Err(HeraldError::rejected(PROVIDER, message))
    }

    /// Sends a fixed text message to `to` to verify the gateway credentials.
    pub async fn send_test_message(&self, to: &str) -> Result<MessageId, HeraldError> {
        let to = normalize_phone(to)?;
        let request = self.request(to, TEST_MESSAGE.to_string(), None)?;
        let id = self.deliver(&request).await?;
        info!(to = %request.to, message_id = %id, "WhatsApp gateway test message delivered");
        Ok(id)
    }
}

#[async_trait]
impl MessageSender for WbizToolSender {
    fn name(&self) -> &str {
        "wbiztool"
    }

    async fn send(&self, campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        let request = self.build_request(campaign, contact)?;
        debug!(
            contact = %contact.name,
            to = %request.to,
            message_len = request.message.len(),
            kind = request.kind,
            "sending via WhatsApp gateway"
        );
        self.deliver(&request).await
    }

    /// Checks that the gateway answers at all. Credentials are only verified
    /// by an actual send, see [`WbizToolSender::send_test_message`].
    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        if let Err(e) = self.credentials() {
            return Ok(HealthStatus::Unhealthy(e.user_message()));
        }

        match self.client.get(&self.config.endpoint).send().await {
            Ok(resp) if resp.status().is_server_error() => Ok(HealthStatus::Unhealthy(format!(
                "WhatsApp gateway returned {}",
                resp.status()
            ))),
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "WhatsApp gateway unreachable: {}",
                e.without_url()
            ))),
        }
    }
}

/// Strings pass through; any other JSON value is rendered as JSON.
fn value_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender(endpoint: String) -> WbizToolSender {
        let config = WbizToolConfig {
            client_id: Some("1001".into()),
            api_key: Some("wbz-key".into()),
            whatsapp_client_id: Some("55".into()),
            endpoint,
        };
        WbizToolSender::new(config, reqwest::Client::new())
    }

    fn campaign() -> Campaign {
        Campaign {
            platform: "whatsapp".into(),
            message: "Spring sale".into(),
            button_text: Some("Shop".into()),
            button_url: Some("https://shop.example".into()),
            ..Default::default()
        }
    }

    fn contact(phone: &str) -> Contact {
        Contact {
            name: "Ada".into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    #[test]
    fn request_appends_button_and_normalizes_phone() {
        let s = sender("http://unused".into());
        let c = campaign();
        let req = s.build_request(&c, &contact("5551234567")).unwrap();
        assert_eq!(req.to, "+15551234567");
        assert_eq!(req.message, "Spring sale\n\nShop: https://shop.example");
        assert_eq!(req.kind, "text");
        assert!(req.media_url.is_none());
    }

    #[test]
    fn media_reference_switches_type() {
        let s = sender("http://unused".into());
        let mut c = campaign();
        c.media_url = Some("https://cdn.example/banner.png".into());
        let req = s.build_request(&c, &contact("+15551234567")).unwrap();
        assert_eq!(req.kind, "media");
        assert_eq!(req.media_url, Some("https://cdn.example/banner.png"));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "media");
        assert_eq!(json["whatsapp_client"], "55");
    }

    #[test]
    fn missing_phone_fails_before_request() {
        let s = sender("http://unused".into());
        let c = campaign();
        let err = s.build_request(&c, &contact("")).unwrap_err();
        assert!(matches!(err, HeraldError::InvalidContact { .. }));
    }

    #[test]
    fn missing_credentials_is_config_error() {
        let s = WbizToolSender::new(WbizToolConfig::default(), reqwest::Client::new());
        let c = campaign();
        let err = s.build_request(&c, &contact("5551234567")).unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }

    #[tokio::test]
    async fn send_success_returns_gateway_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_partial_json(serde_json::json!({
                "to": "+15551234567",
                "type": "text",
                "client_id": "1001"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "messageId": 98765})),
            )
            .mount(&server)
            .await;

        let s = sender(format!("{}/send", server.uri()));
        let id = s.send(&campaign(), &contact("5551234567")).await.unwrap();
        assert_eq!(id, MessageId("98765".into()));
    }

    #[tokio::test]
    async fn send_failure_surfaces_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": false, "error": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let s = sender(server.uri());
        let err = s.send(&campaign(), &contact("5551234567")).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[tokio::test]
    async fn structured_error_is_json_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"success": false, "error": {"code": 12}}),
            ))
            .mount(&server)
            .await;

        let s = sender(server.uri());
        let err = s.send(&campaign(), &contact("5551234567")).await.unwrap_err();
        assert_eq!(err.user_message(), r#"{"code":12}"#);
    }

    #[tokio::test]
    async fn empty_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let s = sender(server.uri());
        let err = s.send(&campaign(), &contact("5551234567")).await.unwrap_err();
        assert_eq!(err.user_message(), "No response from WhatsApp gateway");
    }

    #[test]
    fn missing_phone_wins_over_missing_credentials() {
        let s = WbizToolSender::new(WbizToolConfig::default(), reqwest::Client::new());
        let c = campaign();
        let err = s.build_request(&c, &contact("")).unwrap_err();
        assert!(matches!(err, HeraldError::InvalidContact { .. }));
    }

    #[tokio::test]
    async fn test_message_is_plain_text_to_given_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_partial_json(serde_json::json!({
                "to": "+15550009999",
                "type": "text",
                "message": TEST_MESSAGE,
                "api_key": "wbz-key"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "msg_id": "t-1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let s = sender(format!("{}/send", server.uri()));
        assert_eq!(s.send_test_message("5550009999").await.unwrap(), MessageId("t-1".into()));
    }

    #[tokio::test]
    async fn test_message_surfaces_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": false, "error": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let s = sender(server.uri());
        let err = s.send_test_message("+15550009999").await.unwrap_err();
        assert!(matches!(err, HeraldError::Provider { .. }));
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[tokio::test]
    async fn health_check_reaches_the_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/send"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;

        let s = sender(format!("{}/send", server.uri()));
        assert_eq!(s.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_flags_server_errors_and_unreachable_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        assert_eq!(
            sender(server.uri()).health_check().await.unwrap(),
            HealthStatus::Unhealthy("WhatsApp gateway returned 503 Service Unavailable".into())
        );

        let HealthStatus::Unhealthy(reason) = sender("http://127.0.0.1:1/send".into())
            .health_check()
            .await
            .unwrap()
        else {
            panic!("expected an unhealthy status");
        };
        assert!(reason.starts_with("WhatsApp gateway unreachable"), "{reason}");
    }

    #[tokio::test]
    async fn unconfigured_health_check_makes_no_request() {
        let s = WbizToolSender::new(WbizToolConfig::default(), reqwest::Client::new());
        assert!(matches!(
            s.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_transport_error() {
        let s = sender("http://127.0.0.1:1/send".into());
        let err = s.send(&campaign(), &contact("5551234567")).await.unwrap_err();
        assert!(matches!(err, HeraldError::Transport { .. }));
    }
}
