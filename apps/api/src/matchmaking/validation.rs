//! Form validation — presence checks for the five input fields and the
//! WhatsApp number format. Pure functions, no IO; a rejected submission
//! must cause no outbound call.

use crate::matchmaking::generator::MatchRequest;

/// Validates a match request. Returns a user-facing warning message on the
/// first failed check.
pub fn validate_request(request: &MatchRequest) -> Result<(), String> {
    let all_present = [
        &request.name,
        &request.age,
        &request.gender,
        &request.whatsapp_number,
        &request.preferences,
    ]
    .iter()
    .all(|field| !field.trim().is_empty());

    if !all_present {
        return Err("All fields must be filled for matchmaking.".to_string());
    }

    if !is_valid_whatsapp_number(request.whatsapp_number.trim()) {
        return Err(
            "Invalid WhatsApp number. Include the country code (e.g. +923001234567)".to_string(),
        );
    }

    Ok(())
}

/// A valid number is '+' followed by one or more ASCII digits and nothing
/// else (the `^\+\d+$` shape).
pub fn is_valid_whatsapp_number(number: &str) -> bool {
    match number.strip_prefix('+') {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
