// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for campaigns, contacts and configurations used across tests.

use herald_config::HeraldConfig;
use herald_core::{Campaign, Contact};

/// A plain-text campaign targeting `platform`.
pub fn campaign(platform: &str) -> Campaign {
    Campaign {
        id: "cmp-1".into(),
        name: "Spring launch".into(),
        platform: platform.into(),
        message: "Hello from Herald".into(),
        ..Default::default()
    }
}

/// Contact `n` with a phone, an email and a Telegram chat id.
pub fn contact(n: usize) -> Contact {
    Contact {
        name: format!("Contact {n}"),
        phone: format!("555000{n:04}"),
        email: format!("contact{n}@example.com"),
        telegram_chat_id: Some(format!("{}", 100_000 + n)),
    }
}

/// `count` fully addressed contacts, numbered from 1.
pub fn contacts(count: usize) -> Vec<Contact> {
    (1..=count).map(contact).collect()
}

/// A configuration with no credentials and no pacing delay.
///
/// The seed makes simulated outcomes reproducible.
pub fn demo_config(seed: u64) -> HeraldConfig {
    let mut config = HeraldConfig::default();
    config.dispatch.pacing_delay_ms = 0;
    config.simulation.seed = Some(seed);
    config
}

/// A configuration where every provider bundle is complete.
///
/// All base URLs point at `base_url` so a single mock server can answer.
pub fn production_config(base_url: &str) -> HeraldConfig {
    let mut config = HeraldConfig::default();
    config.dispatch.pacing_delay_ms = 0;

    let p = &mut config.providers;
    p.wbiztool.client_id = Some("1001".into());
    p.wbiztool.api_key = Some("wbz-key".into());
    p.wbiztool.whatsapp_client_id = Some("55".into());
    p.wbiztool.endpoint = format!("{base_url}/wbiztool/send_msg/");

    p.whatsapp_business.access_token = Some("EAAB-token".into());
    p.whatsapp_business.phone_number_id = Some("10987".into());
    p.whatsapp_business.api_base_url = format!("{base_url}/graph");

    p.twilio.account_sid = Some("AC123".into());
    p.twilio.auth_token = Some("tw-secret".into());
    p.twilio.from_number = Some("+15550001111".into());
    p.twilio.api_base_url = format!("{base_url}/twilio");

    p.telegram.bot_token = Some("123:abc".into());
    p.telegram.default_chat_id = Some("999".into());
    p.telegram.api_base_url = format!("{base_url}/telegram");

    config
}
