//! Input validation and sanitization for operator-entered client data.

use crate::error::RelanceError;

/// Maximum stored lengths, matching the remote table's column limits.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Normalize typographic apostrophes (Word, Google Docs, stray HTML
/// entities) into straight quotes, then trim.
pub fn normalize_apostrophes(input: &str) -> String {
    input
        .replace('\u{2019}', "'")
        .replace('\u{2018}', "'")
        .replace('\u{00B4}', "'")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// Clean a string for storage. Apostrophes themselves are kept (d'Angelo,
/// l'Église); only their typographic variants are normalized.
pub fn sanitize(input: &str) -> String {
    normalize_apostrophes(input)
}

/// Escape HTML metacharacters. Applied only when injecting values into an
/// HTML body (the email channel), never on storage.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Validate a first or last name: non-empty after trimming, bounded length,
/// no HTML-dangerous characters (apostrophes are allowed).
pub fn validate_name(name: &str) -> Result<(), RelanceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RelanceError::Validation("name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(RelanceError::Validation(format!(
            "name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    if trimmed.chars().any(|c| matches!(c, '<' | '>' | '"')) {
        return Err(RelanceError::Validation(
            "name contains invalid characters".into(),
        ));
    }
    Ok(())
}

/// Validate a phone number as typed by the operator.
///
/// Accepts French national formats (`06 12 34 56 78`), `+33`/`0033`
/// international forms and generic `+`-prefixed international numbers.
/// Dialing normalization happens later, at send time.
pub fn validate_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_PHONE_LEN {
        return false;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let (plus, digits) = match cleaned.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    if plus {
        // International: 7 to 15 digits, no leading zero after the +.
        return !digits.starts_with('0') && (7..=15).contains(&digits.len());
    }
    if let Some(rest) = digits.strip_prefix("00") {
        // Country code plus a full subscriber number; anything shorter is a
        // national number typed with a doubled zero.
        return !rest.starts_with('0') && (10..=15).contains(&rest.len());
    }
    // National: exactly 10 digits starting with 0.
    digits.len() == 10 && digits.starts_with('0')
}

/// Validate a follow-up message template (empty is allowed — the client
/// simply has nothing scheduled to say yet).
pub fn validate_message(message: &str) -> Result<(), RelanceError> {
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(RelanceError::Validation(format!(
            "message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}
