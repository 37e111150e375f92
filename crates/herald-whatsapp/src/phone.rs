// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destination phone formatting for the WhatsApp gateway.
//!
//! This is a North-American-biased heuristic, not an E.164 validator: any
//! number without a leading `+` that is not an 11-digit `1...` number gets a
//! `+1` prefix, so international numbers written without `+` come out wrong.

use herald_core::HeraldError;

/// Formats a free-form phone number for the gateway.
///
/// - empty input, or input with no digits, is an input error;
/// - input starting with `+` is returned unchanged;
/// - 10 digits become `+1` followed by the digits;
/// - 11 digits starting with `1` become `+` followed by the digits;
/// - anything else becomes `+1` followed by the digits.
pub fn normalize_phone(raw: &str) -> Result<String, HeraldError> {
    if raw.is_empty() {
        return Err(HeraldError::invalid_contact(
            "Contact phone number is required for WhatsApp",
        ));
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(HeraldError::invalid_contact("Contact phone number is invalid"));
    }

    if raw.starts_with('+') {
        return Ok(raw.to_string());
    }

    let formatted = match digits.len() {
        11 if digits.starts_with('1') => format!("+{digits}"),
        _ => format!("+1{digits}"),
    };
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_digits_get_country_code() {
        assert_eq!(normalize_phone("5551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn eleven_digits_with_leading_one_get_plus() {
        assert_eq!(normalize_phone("15551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalize_phone("(555) 123-4567").unwrap(), "+15551234567");
    }

    #[test]
    fn plus_prefixed_input_is_unchanged() {
        assert_eq!(normalize_phone("+44 20 7946 0958").unwrap(), "+44 20 7946 0958");
    }

    #[test]
    fn other_lengths_default_to_north_america() {
        // Known weakness: a UK number written without `+` is mis-normalized.
        assert_eq!(normalize_phone("442079460958").unwrap(), "+1442079460958");
    }

    #[test]
    fn empty_phone_is_an_input_error() {
        let err = normalize_phone("").unwrap_err();
        assert!(matches!(err, HeraldError::InvalidContact { .. }));
        assert!(err.user_message().contains("required"));
    }

    #[test]
    fn phone_without_digits_is_an_input_error() {
        let err = normalize_phone("n/a").unwrap_err();
        assert!(err.user_message().contains("invalid"));
    }
}
