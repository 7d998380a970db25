// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Why the external source could not produce a rate table. All three collapse
/// to the same demo-rate fallback in the orchestrator; the split exists for
/// logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No API key configured (or the placeholder value is still in place).
    NotConfigured,
    /// The request could not be completed (connect, timeout, non-2xx status).
    Transport(String),
    /// The provider answered but the body was malformed or unsuccessful.
    BadResponse(String),
}

/// Outcome of one external fetch: either a full rate table keyed by target
/// currency code, or an explicit unavailability signal.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Available(HashMap<String, Decimal>),
    Unavailable(UnavailableReason),
}

/// Seam over the remote rate provider.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base_currency: &str) -> FetchOutcome;
}

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Client for the exchangerate-api.com v6 "latest" endpoint.
pub struct HttpRateSource {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base_currency: &str) -> FetchOutcome {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => key,
            _ => {
                warn!("exchange rate API key not configured");
                return FetchOutcome::Unavailable(UnavailableReason::NotConfigured);
            }
        };

        let url = format!("{}/{}/latest/{}", self.base_url, api_key, base_currency);
        info!(base = base_currency, "fetching exchange rates from API");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return FetchOutcome::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };

        outcome_from_body(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: Option<String>,
    conversion_rates: Option<HashMap<String, Decimal>>,
}

fn outcome_from_body(body: &str) -> FetchOutcome {
    let parsed: ApiResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return FetchOutcome::Unavailable(UnavailableReason::BadResponse(e.to_string()));
        }
    };

    match (parsed.result.as_deref(), parsed.conversion_rates) {
        (Some("success"), Some(rates)) => FetchOutcome::Available(rates),
        _ => FetchOutcome::Unavailable(UnavailableReason::BadResponse(
            "provider reported an unsuccessful result".to_string(),
        )),
    }
}
