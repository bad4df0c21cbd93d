//! Phone-number normalization for the SMS dialing format.
//!
//! Operators type numbers in mixed formats ("06 12 34 56 78",
//! "+33 6 12 34 56 78", "0033612345678"); providers expect a bare
//! country-code-prefixed digit string ("33612345678").

use crate::error::ChannelError;

/// Minimum digits for a dialable number after normalization.
const MIN_DIGITS: usize = 8;
/// E.164 ceiling.
const MAX_DIGITS: usize = 15;

/// Strip formatting punctuation, rewrite national/international prefixes into
/// a single country-code-prefixed digit string, and reject anything that is
/// not dialable.
pub fn normalize(raw: &str) -> Result<String, ChannelError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let digits = if let Some(rest) = cleaned.strip_prefix("+33") {
        format!("33{rest}")
    } else if let Some(rest) = cleaned.strip_prefix('+') {
        rest.to_string()
    } else if let Some(rest) = cleaned.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        // National trunk prefix — assume a French number.
        format!("33{rest}")
    } else {
        cleaned
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChannelError::InvalidPhone(format!(
            "non-digit characters in {raw:?}"
        )));
    }
    if digits.len() < MIN_DIGITS {
        return Err(ChannelError::InvalidPhone(format!(
            "{raw:?} is too short ({} digits)",
            digits.len()
        )));
    }
    if digits.len() > MAX_DIGITS {
        return Err(ChannelError::InvalidPhone(format!(
            "{raw:?} is too long ({} digits)",
            digits.len()
        )));
    }
    Ok(digits)
}
