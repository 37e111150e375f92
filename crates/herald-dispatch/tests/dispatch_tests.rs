// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end batch behavior: real senders against a mock HTTP server,
//! scripted senders for containment, paused time for pacing and cancellation.

use std::sync::Arc;
use std::time::Duration;

use herald_core::{DispatchOutcome, FailureKind, HealthStatus, Platform, SendSummary};
use herald_dispatch::{BatchAggregator, DispatchMode, DispatchService, ProviderRouter};
use herald_test_utils::{fixtures, MockSender, Reply};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scripted_aggregator(
    platform: Platform,
    mock: Arc<MockSender>,
    pacing: Duration,
) -> BatchAggregator {
    let mut router = ProviderRouter::new(DispatchMode::Production);
    router.register(platform, mock);
    BatchAggregator::new(router, pacing)
}

#[tokio::test]
async fn results_follow_input_order() {
    let mock = Arc::new(MockSender::scripted(
        "sms",
        [
            Reply::SucceedWith("a".into()),
            Reply::Reject("second".into()),
            Reply::SucceedWith("c".into()),
            Reply::Transport,
        ],
    ));
    let agg = scripted_aggregator(Platform::Sms, mock.clone(), Duration::ZERO);
    let contacts = fixtures::contacts(4);

    let result = agg
        .send_campaign_to_contacts(&fixtures::campaign("sms"), &contacts)
        .await;

    assert_eq!(result.total_sent, 4);
    assert_eq!(result.successful + result.failed, result.total_sent);
    assert_eq!(result.results.len(), 4);
    assert_eq!(result.results[0].message_id().map(|m| m.0.as_str()), Some("a"));
    assert_eq!(result.results[1].error(), Some("second"));
    assert_eq!(result.results[2].message_id().map(|m| m.0.as_str()), Some("c"));
    assert_eq!(result.results[3].failure_kind(), Some(FailureKind::Network));
    assert_eq!(result.summary(), SendSummary::PartiallySent);

    let sent: Vec<String> = mock.sent_contacts().await.into_iter().map(|c| c.name).collect();
    let expected: Vec<String> = contacts.into_iter().map(|c| c.name).collect();
    assert_eq!(sent, expected);
}

#[tokio::test]
async fn panic_in_one_send_is_contained() {
    let mock = Arc::new(MockSender::scripted(
        "telegram",
        [Reply::Succeed, Reply::Panic, Reply::Succeed],
    ));
    let agg = scripted_aggregator(Platform::Telegram, mock, Duration::ZERO);

    let result = agg
        .send_campaign_to_contacts(&fixtures::campaign("telegram"), &fixtures::contacts(3))
        .await;

    assert_eq!(result.total_sent, 3);
    assert_eq!(result.successful, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(
        result.results[1],
        DispatchOutcome::failure(FailureKind::Network, "Network error")
    );
    assert!(result.results[2].is_success());
}

#[tokio::test]
async fn demo_batch_succeeds_at_configured_rate() {
    let service = DispatchService::from_config(&fixtures::demo_config(2024)).unwrap();
    assert_eq!(service.mode(), DispatchMode::Demo);

    let result = service
        .send_campaign_to_contacts(&fixtures::campaign("whatsapp"), &fixtures::contacts(1000))
        .await;

    assert_eq!(result.total_sent, 1000);
    assert_eq!(result.successful + result.failed, 1000);
    let rate = result.successful as f64 / 1000.0;
    assert!((rate - 0.95).abs() < 0.04, "rate was {rate}");
    for outcome in &result.results {
        match outcome {
            DispatchOutcome::Success { message_id } => assert!(message_id.0.starts_with("demo_")),
            DispatchOutcome::Failure { kind, error } => {
                assert_eq!(*kind, FailureKind::Simulated);
                assert!(error.starts_with("Simulated: "));
            }
        }
    }
}

#[tokio::test]
async fn unknown_platform_is_rejected_in_both_modes() {
    let mut production = fixtures::demo_config(1);
    production.providers.telegram.bot_token = Some("123:abc".into());

    for config in [fixtures::demo_config(1), production] {
        let service = DispatchService::from_config(&config).unwrap();
        let result = service
            .send_campaign_to_contacts(&fixtures::campaign("carrier-pigeon"), &fixtures::contacts(2))
            .await;
        assert_eq!(result.failed, 2);
        for outcome in &result.results {
            assert_eq!(outcome.failure_kind(), Some(FailureKind::UnsupportedPlatform));
            assert_eq!(outcome.error(), Some("Unsupported platform: carrier-pigeon"));
        }
    }
}

#[tokio::test]
async fn sms_without_twilio_fails_when_another_provider_is_configured() {
    let mut config = fixtures::demo_config(1);
    config.providers.telegram.bot_token = Some("123:abc".into());
    let service = DispatchService::from_config(&config).unwrap();
    assert_eq!(service.mode(), DispatchMode::Production);

    let result = service
        .send_campaign_to_contacts(&fixtures::campaign("sms"), &fixtures::contacts(3))
        .await;

    assert_eq!(result.successful, 0);
    assert_eq!(result.summary(), SendSummary::FullyFailed);
    for outcome in &result.results {
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
        assert!(outcome.error().unwrap_or_default().contains("not configured"));
    }
}

#[tokio::test]
async fn gateway_failure_without_fallback_names_missing_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wbiztool/send_msg/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": false, "error": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let mut config = fixtures::production_config(&server.uri());
    config.providers.whatsapp_business.access_token = None;
    config.providers.whatsapp_business.phone_number_id = None;
    let service = DispatchService::from_config(&config).unwrap();

    let result = service
        .send_campaign_to_contacts(&fixtures::campaign("whatsapp"), &fixtures::contacts(1))
        .await;

    let outcome = &result.results[0];
    assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
    let error = outcome.error().unwrap_or_default();
    assert!(error.contains("Invalid API key"), "{error}");
    assert!(error.contains("whatsapp_business.access_token"), "{error}");
}

#[tokio::test]
async fn gateway_failure_falls_back_to_business_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wbiztool/send_msg/"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graph/10987/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"messages": [{"id": "wamid.fallback"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = DispatchService::from_config(&fixtures::production_config(&server.uri())).unwrap();
    let result = service
        .send_campaign_to_contacts(&fixtures::campaign("whatsapp"), &fixtures::contacts(1))
        .await;

    assert_eq!(
        result.results[0].message_id().map(|m| m.0.as_str()),
        Some("wamid.fallback")
    );
}

#[tokio::test]
async fn sms_and_telegram_go_through_their_apis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/twilio/Accounts/AC123/Messages.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"sid": "SM1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/telegram/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"ok": true, "result": {"message_id": 55}}),
        ))
        .mount(&server)
        .await;

    let service = DispatchService::from_config(&fixtures::production_config(&server.uri())).unwrap();

    let sms = service
        .send_campaign_to_contacts(&fixtures::campaign("sms"), &fixtures::contacts(2))
        .await;
    assert_eq!(sms.summary(), SendSummary::FullySent);
    assert_eq!(sms.results[0].message_id().map(|m| m.0.as_str()), Some("SM1"));

    let telegram = service
        .send_campaign_to_contacts(&fixtures::campaign("Telegram"), &fixtures::contacts(1))
        .await;
    assert_eq!(telegram.results[0].message_id().map(|m| m.0.as_str()), Some("55"));
}

#[tokio::test(start_paused = true)]
async fn pacing_delay_precedes_every_contact() {
    let mock = Arc::new(MockSender::new("sms"));
    let agg = scripted_aggregator(Platform::Sms, mock, Duration::from_millis(1000));

    let started = tokio::time::Instant::now();
    let result = agg
        .send_campaign_to_contacts(&fixtures::campaign("sms"), &fixtures::contacts(3))
        .await;

    assert_eq!(result.successful, 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(3100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn cancellation_between_contacts_keeps_counts() {
    let mock = Arc::new(MockSender::new("sms"));
    let agg = scripted_aggregator(Platform::Sms, mock.clone(), Duration::from_millis(1000));
    let cancel = CancellationToken::new();
    let campaign = fixtures::campaign("sms");
    let contacts = fixtures::contacts(3);

    let (result, ()) = tokio::join!(agg.run_batch(&campaign, &contacts, &cancel, None), async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        cancel.cancel();
    });

    assert_eq!(result.total_sent, 3);
    assert_eq!(result.successful, 1);
    assert_eq!(result.failed, 2);
    assert!(result.results[0].is_success());
    assert_eq!(result.results[1].failure_kind(), Some(FailureKind::Cancelled));
    assert_eq!(result.results[2].failure_kind(), Some(FailureKind::Cancelled));
    assert_eq!(mock.sent_count().await, 1);
}

#[tokio::test]
async fn health_report_covers_every_sender() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/telegram/bot123:abc/getMe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/twilio/Accounts/AC123.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wbiztool/send_msg/"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/graph/10987"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "10987"})))
        .mount(&server)
        .await;

    let service = DispatchService::from_config(&fixtures::production_config(&server.uri())).unwrap();
    let report = service.check_providers().await;
    let status = |name: &str| {
        report
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
            .unwrap()
    };

    assert_eq!(report.len(), 6);
    assert_eq!(status("telegram"), HealthStatus::Healthy);
    assert_eq!(status("whatsapp_business"), HealthStatus::Healthy);
    assert_eq!(status("wbiztool"), HealthStatus::Healthy);
    assert_eq!(status("simulated"), HealthStatus::Healthy);
    assert!(matches!(status("twilio"), HealthStatus::Unhealthy(_)));
    assert!(matches!(status("messenger"), HealthStatus::Degraded(_)));
}

#[tokio::test]
async fn telegram_test_message_uses_default_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/telegram/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"ok": true, "result": {"message_id": 9}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let service = DispatchService::from_config(&fixtures::production_config(&server.uri())).unwrap();
    let id = service.send_telegram_test_message().await.unwrap();
    assert_eq!(id.0, "9");
}

#[tokio::test]
async fn whatsapp_test_message_reports_gateway_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wbiztool/send_msg/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true, "messageId": "wt-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = DispatchService::from_config(&fixtures::production_config(&server.uri())).unwrap();
    let id = service.send_whatsapp_test_message("+15550009999").await.unwrap();
    assert_eq!(id.0, "wt-1");

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/wbiztool/send_msg/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": false, "error": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let err = service.send_whatsapp_test_message("+15550009999").await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::ProviderRejected);
    assert_eq!(err.user_message(), "Invalid API key");
}

#[tokio::test]
async fn whatsapp_contact_without_phone_is_an_input_failure() {
    let mut config = fixtures::demo_config(1);
    config.providers.telegram.bot_token = Some("123:abc".into());
    let service = DispatchService::from_config(&config).unwrap();

    let mut contact = fixtures::contact(1);
    contact.phone.clear();
    let result = service
        .send_campaign_to_contacts(&fixtures::campaign("whatsapp"), &[contact])
        .await;

    let error = result.results[0].error().unwrap_or_default();
    assert!(error.contains("phone"), "{error}");
    assert!(!error.contains("WhatsApp gateway not configured"), "{error}");
}
