// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A cached exchange rate row for one (base, target) pair.
///
/// Rows are superseded wholesale on re-fetch rather than updated in place;
/// a row is live only while `cache_expiry` lies in the future. Uniqueness of
/// (base, target) is not enforced by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRate {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
    pub cache_expiry: DateTime<Utc>,
}

/// One entry in a rate quote: target currency plus its rate against the base.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateEntry {
    pub currency_code: String,
    pub currency_name: String,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Full rate table for one base currency, sorted ascending by target code.
/// Derived view, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RateQuote {
    pub base_currency: String,
    pub rates: Vec<RateEntry>,
    pub last_updated: DateTime<Utc>,
    pub count: usize,
}

/// A single currency-pair rate with both display names.
#[derive(Debug, Clone, Serialize)]
pub struct PairRate {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

/// The supported-currency registry as a response shape.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedCurrencies {
    pub currencies: Vec<Currency>,
    pub count: usize,
}
