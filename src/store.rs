// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePool;

use crate::models::CachedRate;

/// Persistence seam for cached exchange rates.
///
/// Freshness is the store's concern: `get_valid_rates` only returns rows whose
/// expiry lies in the future. `replace_rates` must delete every row for the
/// base (expired or not) and insert the fresh set in a single transaction.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn get_valid_rates(&self, base_currency: &str) -> Result<Vec<CachedRate>>;

    /// Replace all cached rows for `base_currency` with `rates`, atomically.
    /// Returns the number of affected rows (deletes plus inserts).
    async fn replace_rates(&self, base_currency: &str, rates: &[CachedRate]) -> Result<u64>;
}

/// SQLite-backed store. Rates are stored as text to keep their decimal
/// precision; timestamps as unix seconds.
#[derive(Clone)]
pub struct SqliteRateStore {
    pool: SqlitePool,
}

impl SqliteRateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateStore for SqliteRateStore {
    async fn get_valid_rates(&self, base_currency: &str) -> Result<Vec<CachedRate>> {
        let now = Utc::now().timestamp();
        let rows = sqlx::query_as::<_, (String, String, String, i64, i64)>(
            r#"
            SELECT base_currency, target_currency, rate, last_updated, cache_expiry
            FROM cached_exchange_rates
            WHERE base_currency = ?
            AND cache_expiry > ?
            ORDER BY target_currency
            "#,
        )
        .bind(base_currency)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_rate).collect()
    }

    async fn replace_rates(&self, base_currency: &str, rates: &[CachedRate]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM cached_exchange_rates
            WHERE base_currency = ?
            "#,
        )
        .bind(base_currency)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let mut inserted = 0u64;
        for rate in rates {
            inserted += sqlx::query(
                r#"
                INSERT INTO cached_exchange_rates
                    (base_currency, target_currency, rate, last_updated, cache_expiry)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&rate.base_currency)
            .bind(&rate.target_currency)
            .bind(rate.rate.to_string())
            .bind(rate.last_updated.timestamp())
            .bind(rate.cache_expiry.timestamp())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(deleted + inserted)
    }
}

fn row_to_rate(
    (base_currency, target_currency, rate, last_updated, cache_expiry): (
        String,
        String,
        String,
        i64,
        i64,
    ),
) -> Result<CachedRate> {
    let rate: Decimal = rate
        .parse()
        .with_context(|| format!("bad rate value for {}/{}", base_currency, target_currency))?;
    Ok(CachedRate {
        base_currency,
        target_currency,
        rate,
        last_updated: timestamp_to_datetime(last_updated),
        cache_expiry: timestamp_to_datetime(cache_expiry),
    })
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn rate(base: &str, target: &str, value: Decimal, expires_in_secs: i64) -> CachedRate {
        let now = Utc::now();
        CachedRate {
            base_currency: base.to_string(),
            target_currency: target.to_string(),
            rate: value,
            last_updated: now,
            cache_expiry: now + Duration::seconds(expires_in_secs),
        }
    }

    #[tokio::test]
    async fn replace_then_read_back() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        let rates = vec![
            rate("NGN", "USD", dec!(0.000630), 1800),
            rate("NGN", "EUR", dec!(0.000580), 1800),
        ];
        let affected = store.replace_rates("NGN", &rates).await?;
        assert_eq!(affected, 2);

        let cached = store.get_valid_rates("NGN").await?;
        assert_eq!(cached.len(), 2);
        // ORDER BY target_currency
        assert_eq!(cached[0].target_currency, "EUR");
        assert_eq!(cached[1].target_currency, "USD");
        assert_eq!(cached[1].rate, dec!(0.000630));
        Ok(())
    }

    #[tokio::test]
    async fn expired_rows_are_not_returned() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        store
            .replace_rates(
                "USD",
                &[
                    rate("USD", "EUR", dec!(0.92), 1800),
                    rate("USD", "GBP", dec!(0.79), -60),
                ],
            )
            .await?;

        let cached = store.get_valid_rates("USD").await?;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].target_currency, "EUR");
        Ok(())
    }

    #[tokio::test]
    async fn replace_deletes_expired_and_valid_rows_for_the_base() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        store
            .replace_rates(
                "USD",
                &[
                    rate("USD", "EUR", dec!(0.92), 1800),
                    rate("USD", "GBP", dec!(0.79), -60),
                ],
            )
            .await?;
        // 2 deletes + 1 insert
        let affected = store
            .replace_rates("USD", &[rate("USD", "JPY", dec!(154.50), 1800)])
            .await?;
        assert_eq!(affected, 3);

        let cached = store.get_valid_rates("USD").await?;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].target_currency, "JPY");
        Ok(())
    }

    #[tokio::test]
    async fn base_match_is_exact_and_case_sensitive() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        store
            .replace_rates("USD", &[rate("USD", "EUR", dec!(0.92), 1800)])
            .await?;

        assert!(store.get_valid_rates("usd").await?.is_empty());
        assert!(store.get_valid_rates("EUR").await?.is_empty());
        // Replacing another base leaves USD rows alone
        store
            .replace_rates("NGN", &[rate("NGN", "USD", dec!(0.000630), 1800)])
            .await?;
        assert_eq!(store.get_valid_rates("USD").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_pairs_are_allowed() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        store
            .replace_rates(
                "USD",
                &[
                    rate("USD", "EUR", dec!(0.92), 1800),
                    rate("USD", "EUR", dec!(0.93), 1800),
                ],
            )
            .await?;
        assert_eq!(store.get_valid_rates("USD").await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn rate_precision_survives_storage() -> Result<()> {
        let store = SqliteRateStore::new(create_test_pool().await?);

        store
            .replace_rates("NGN", &[rate("NGN", "USD", dec!(0.000625), 1800)])
            .await?;
        let cached = store.get_valid_rates("NGN").await?;
        assert_eq!(cached[0].rate, dec!(0.000625));
        Ok(())
    }

    #[tokio::test]
    async fn rows_persist_across_pools_on_the_same_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db_url = format!("sqlite://{}/rates.db", dir.path().display());

        {
            let store = SqliteRateStore::new(crate::db::create_db_pool(&db_url).await?);
            store
                .replace_rates("USD", &[rate("USD", "EUR", dec!(0.92), 1800)])
                .await?;
        }

        let store = SqliteRateStore::new(crate::db::create_db_pool(&db_url).await?);
        assert_eq!(store.get_valid_rates("USD").await?.len(), 1);
        Ok(())
    }
}
