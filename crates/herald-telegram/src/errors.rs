// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps Bot API error descriptions to actionable contact-level messages.

/// Rewrites a Bot API `description` for the contact it concerns.
///
/// Unrecognized descriptions pass through unchanged; a missing one becomes
/// the generic "Telegram API error".
pub fn remap_description(description: Option<&str>, contact_name: &str) -> String {
    let Some(description) = description else {
        return "Telegram API error".to_string();
    };

    if description.contains("chat not found") {
        format!(
            "Contact \"{contact_name}\" has not started a conversation with your Telegram bot. They need to send a message to your bot first."
        )
    } else if description.contains("user not found") {
        format!(
            "Telegram user not found for \"{contact_name}\". Please verify the contact information."
        )
    } else if description.contains("blocked") {
        format!("Your bot has been blocked by \"{contact_name}\".")
    } else {
        description.to_string()
    }
}
