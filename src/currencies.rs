// SPDX-License-Identifier: MIT

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The fixed set of supported currencies, ordered by code.
///
/// This is process-wide read-only data; every currency code that enters the
/// service is normalized to uppercase before being compared against it.
pub const SUPPORTED_CURRENCIES: [(&str, &str); 8] = [
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("EUR", "Euro"),
    ("GBP", "British Pound Sterling"),
    ("JPY", "Japanese Yen"),
    ("NGN", "Nigerian Naira"),
    ("USD", "United States Dollar"),
];

/// Look up the display name for a currency code. The code must already be
/// uppercase; returns `None` for anything outside the supported set.
pub fn currency_name(code: &str) -> Option<&'static str> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Whether a code (any letter case) belongs to the supported set.
pub fn is_supported(code: &str) -> bool {
    let code = code.to_uppercase();
    SUPPORTED_CURRENCIES.iter().any(|(c, _)| *c == code)
}

/// Demo rate for one unit of USD, used when the external rate API is
/// unavailable or unconfigured. Rates for an arbitrary base B are derived as
/// `demo_usd_rate(C) / demo_usd_rate(B)`.
pub fn demo_usd_rate(code: &str) -> Option<Decimal> {
    let rate = match code {
        "NGN" => dec!(1600.00),
        "USD" => dec!(1.00),
        "EUR" => dec!(0.92),
        "GBP" => dec!(0.79),
        "JPY" => dec!(154.50),
        "CAD" => dec!(1.36),
        "AUD" => dec!(1.53),
        "CHF" => dec!(0.88),
        _ => return None,
    };
    Some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_by_code() {
        let codes: Vec<&str> = SUPPORTED_CURRENCIES.iter().map(|(c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn lookup_is_exact_on_uppercase() {
        assert_eq!(currency_name("NGN"), Some("Nigerian Naira"));
        assert_eq!(currency_name("ngn"), None);
        assert_eq!(currency_name("XXX"), None);
    }

    #[test]
    fn membership_ignores_case() {
        assert!(is_supported("usd"));
        assert!(is_supported("Eur"));
        assert!(!is_supported("SEK"));
    }

    #[test]
    fn every_supported_currency_has_a_demo_rate() {
        for (code, _) in SUPPORTED_CURRENCIES {
            assert!(demo_usd_rate(code).is_some(), "missing demo rate for {}", code);
        }
        assert!(demo_usd_rate("XXX").is_none());
    }
}
