// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-platform addressing rules applied before a batch starts.

use herald_core::{Contact, Platform};

/// Whether `contact` has the field `platform` needs to be addressed.
///
/// Platform names are matched case-insensitively; unknown names accept any
/// contact with a phone or an email.
pub fn validate_contact(contact: &Contact, platform: &str) -> bool {
    match Platform::parse(platform) {
        Ok(Platform::WhatsApp | Platform::Sms) => !contact.phone.is_empty(),
        Ok(Platform::Messenger) => contact.email.contains('@'),
        Ok(Platform::Telegram) => !contact.phone.is_empty() || contact.chat_id().is_some(),
        Err(_) => !contact.phone.is_empty() || !contact.email.is_empty(),
    }
}

/// The address a send to `contact` on `platform` would use, for display.
pub fn contact_address(contact: &Contact, platform: &str) -> String {
    let first = |candidates: &[&str], fallback: &str| {
        candidates
            .iter()
            .find(|c| !c.is_empty())
            .map_or_else(|| fallback.to_string(), |c| c.to_string())
    };

    match Platform::parse(platform) {
        Ok(Platform::WhatsApp | Platform::Sms) => first(&[contact.phone.as_str()], "No phone"),
        Ok(Platform::Messenger) => first(&[contact.email.as_str()], "No email"),
        Ok(Platform::Telegram) => first(
            &[
                contact.chat_id().unwrap_or_default(),
                contact.phone.as_str(),
                contact.name.as_str(),
            ],
            "No Telegram ID",
        ),
        Err(_) => first(
            &[contact.email.as_str(), contact.phone.as_str()],
            "No contact info",
        ),
    }
}

/// Contacts split into those that enter the batch and those that never do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPartition {
    pub valid: Vec<Contact>,
    pub skipped: Vec<Contact>,
}

impl ContactPartition {
    /// Warning shown when some contacts were dropped, `None` otherwise.
    pub fn skipped_notice(&self, platform: &str) -> Option<String> {
        if self.skipped.is_empty() {
            return None;
        }
        let missing = match Platform::parse(platform) {
            Ok(Platform::WhatsApp | Platform::Sms) => "phone numbers",
            _ => "email addresses",
        };
        Some(format!(
            "{} contacts skipped due to missing {missing}",
            self.skipped.len()
        ))
    }
}

/// Splits `contacts` by [`validate_contact`], keeping input order on both sides.
pub fn partition_contacts(contacts: &[Contact], platform: &str) -> ContactPartition {
    let (valid, skipped) = contacts
        .iter()
        .cloned()
        .partition(|c| validate_contact(c, platform));
    ContactPartition { valid, skipped }
}
