// SPDX-License-Identifier: MIT

//! # fx-rates
//!
//! Currency exchange rates for a fixed set of supported currencies, backed by
//! a SQLite cache with a configurable TTL, the exchangerate-api.com provider,
//! and a static demo-rate table used whenever the provider is unavailable or
//! unconfigured.
//!
//! The pipeline for a rate request: validate, check the cache, on a miss
//! fetch from the provider and replace the base's cached rows in one
//! transaction, and absorb provider outages into demo rates rather than
//! surfacing them as errors.

pub mod config;
pub mod currencies;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod source;
pub mod store;
pub mod validators;

pub use error::ExchangeError;
pub use service::ExchangeRateService;
pub use source::{FetchOutcome, HttpRateSource, RateSource};
pub use store::{RateStore, SqliteRateStore};
