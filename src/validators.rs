// SPDX-License-Identifier: MIT

use crate::currencies::{is_supported, SUPPORTED_CURRENCIES};

/// Validate a base-currency request. Returns every violated rule's message;
/// an empty vec means the input is valid. Pure function, no I/O.
pub fn validate_base_currency(base: &str) -> Vec<String> {
    let mut errors = Vec::new();
    check_code(base, &mut errors, "Base currency is required", || {
        let supported: Vec<&str> = SUPPORTED_CURRENCIES.iter().map(|(c, _)| *c).collect();
        format!("Invalid currency code. Supported: {}", supported.join(", "))
    });
    errors
}

/// Validate a from/to pair request. Per-field rules match
/// [`validate_base_currency`]; additionally the two codes must differ under
/// case-insensitive comparison.
pub fn validate_pair(from: &str, to: &str) -> Vec<String> {
    let mut errors = Vec::new();
    check_code(from, &mut errors, "Source currency is required", || {
        "Invalid source currency code".to_string()
    });
    check_code(to, &mut errors, "Target currency is required", || {
        "Invalid target currency code".to_string()
    });
    if !from.trim().is_empty() && from.trim().eq_ignore_ascii_case(to.trim()) {
        errors.push("Source and target currencies must be different".to_string());
    }
    errors
}

// Each rule is checked independently so a caller sees every violation at once.
fn check_code(
    code: &str,
    errors: &mut Vec<String>,
    required_msg: &str,
    invalid_msg: impl FnOnce() -> String,
) {
    let code = code.trim();
    if code.is_empty() {
        errors.push(required_msg.to_string());
    }
    if code.chars().count() != 3 {
        errors.push("Currency code must be 3 characters".to_string());
    }
    if !is_supported(code) {
        errors.push(invalid_msg());
    }
}
