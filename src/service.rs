// SPDX-License-Identifier: MIT

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::currencies::{currency_name, demo_usd_rate, SUPPORTED_CURRENCIES};
use crate::error::ExchangeError;
use crate::models::{CachedRate, Currency, PairRate, RateEntry, RateQuote, SupportedCurrencies};
use crate::source::{FetchOutcome, RateSource};
use crate::store::RateStore;
use crate::validators::{validate_base_currency, validate_pair};

/// Central exchange rate service: validates requests, serves rates from the
/// cache when fresh, fetches from the external source on a miss, and falls
/// back to the in-process demo table when the source is unavailable.
///
/// Concurrent misses for the same base are not serialized: both callers may
/// fetch and both may write, last commit wins. Cache rows are re-derivations
/// of the same external truth, so the race is benign and left in place.
pub struct ExchangeRateService<S, R> {
    store: S,
    source: R,
    cache_minutes: i64,
}

impl<S: RateStore, R: RateSource> ExchangeRateService<S, R> {
    pub fn new(store: S, source: R, cache_minutes: i64) -> Self {
        Self {
            store,
            source,
            cache_minutes,
        }
    }

    /// Full rate table for one base currency.
    ///
    /// Cache hit: mapped straight to the response, no external call, no
    /// write. Cache miss: fetch from the source, replace the base's cached
    /// rows in one transaction, return the fresh set. Source unavailable:
    /// demo rates, returned as a success and never persisted.
    pub async fn get_exchange_rates(&self, base_currency: &str) -> Result<RateQuote, ExchangeError> {
        let errors = validate_base_currency(base_currency);
        if !errors.is_empty() {
            return Err(ExchangeError::Validation(errors));
        }

        let base = base_currency.trim().to_uppercase();

        let cached = self
            .store
            .get_valid_rates(&base)
            .await
            .map_err(|e| ExchangeError::Operational(format!("cache store error: {}", e)))?;
        if !cached.is_empty() {
            info!(base = %base, "returning cached exchange rates");
            return Ok(quote_from_cached(&base, cached));
        }

        let table = match self.source.fetch_rates(&base).await {
            FetchOutcome::Available(table) => table,
            FetchOutcome::Unavailable(reason) => {
                warn!(base = %base, ?reason, "rate source unavailable, serving demo rates");
                return Ok(demo_quote(&base));
            }
        };

        self.cache_and_map(&base, table).await
    }

    /// Rate for one currency pair, reusing [`Self::get_exchange_rates`] for
    /// the source currency.
    pub async fn get_currency_pair_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<PairRate, ExchangeError> {
        let errors = validate_pair(from_currency, to_currency);
        if !errors.is_empty() {
            return Err(ExchangeError::Validation(errors));
        }

        let from = from_currency.trim().to_uppercase();
        let to = to_currency.trim().to_uppercase();

        let quote = self.get_exchange_rates(&from).await?;

        let entry = quote
            .rates
            .into_iter()
            .find(|r| r.currency_code == to)
            .ok_or_else(|| {
                ExchangeError::Operational(format!("Rate for {} to {} not found", from, to))
            })?;

        // Both codes were validated against the registry above.
        Ok(PairRate {
            from_name: currency_name(&from).unwrap_or_default().to_string(),
            to_name: currency_name(&to).unwrap_or_default().to_string(),
            from,
            to,
            rate: entry.rate,
            last_updated: entry.last_updated,
        })
    }

    /// The supported-currency registry, sorted by code. No I/O, cannot fail.
    pub fn list_supported_currencies(&self) -> SupportedCurrencies {
        let currencies: Vec<Currency> = SUPPORTED_CURRENCIES
            .iter()
            .map(|(code, name)| Currency {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();
        let count = currencies.len();
        SupportedCurrencies { currencies, count }
    }

    async fn cache_and_map(
        &self,
        base: &str,
        table: std::collections::HashMap<String, Decimal>,
    ) -> Result<RateQuote, ExchangeError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.cache_minutes);

        let mut to_cache = Vec::new();
        let mut rates = Vec::new();
        for (code, name) in SUPPORTED_CURRENCIES {
            if code == base {
                continue;
            }
            // Supported currencies the provider did not quote are skipped.
            let Some(&rate) = table.get(code) else {
                continue;
            };
            to_cache.push(CachedRate {
                base_currency: base.to_string(),
                target_currency: code.to_string(),
                rate,
                last_updated: now,
                cache_expiry: expiry,
            });
            rates.push(RateEntry {
                currency_code: code.to_string(),
                currency_name: name.to_string(),
                rate,
                last_updated: now,
            });
        }

        let affected = self
            .store
            .replace_rates(base, &to_cache)
            .await
            .map_err(|e| ExchangeError::Operational(format!("cache store error: {}", e)))?;
        info!(base = %base, count = rates.len(), affected, "cached exchange rates");

        rates.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));
        let count = rates.len();
        Ok(RateQuote {
            base_currency: base.to_string(),
            rates,
            last_updated: now,
            count,
        })
    }
}

fn quote_from_cached(base: &str, cached: Vec<CachedRate>) -> RateQuote {
    let mut rates: Vec<RateEntry> = cached
        .into_iter()
        .filter_map(|r| {
            // Rows whose target has left the registry are dropped silently.
            let name = currency_name(&r.target_currency)?;
            Some(RateEntry {
                currency_code: r.target_currency,
                currency_name: name.to_string(),
                rate: r.rate,
                last_updated: r.last_updated,
            })
        })
        .collect();
    rates.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));

    let last_updated = rates
        .first()
        .map(|r| r.last_updated)
        .unwrap_or_else(Utc::now);
    let count = rates.len();
    RateQuote {
        base_currency: base.to_string(),
        rates,
        last_updated,
        count,
    }
}

/// Derive a full quote from the fixed demo table: rate(B -> C) =
/// demo[C] / demo[B], banker's-rounded to 6 decimal places. Shares one
/// timestamp across all entries and is never written to the cache.
fn demo_quote(base: &str) -> RateQuote {
    let now = Utc::now();
    // The base was validated against the registry, which the demo table
    // covers in full.
    let base_rate = demo_usd_rate(base).unwrap_or(Decimal::ONE);

    let mut rates = Vec::new();
    for (code, name) in SUPPORTED_CURRENCIES {
        if code == base {
            continue;
        }
        let Some(rate) = demo_usd_rate(code) else {
            continue;
        };
        rates.push(RateEntry {
            currency_code: code.to_string(),
            currency_name: name.to_string(),
            rate: (rate / base_rate).round_dp(6),
            last_updated: now,
        });
    }

    let count = rates.len();
    RateQuote {
        base_currency: base.to_string(),
        rates,
        last_updated: now,
        count,
    }
}
