//! Client for the currency-exchange `/latest` endpoint.

pub mod api;
pub mod client;
pub mod types;

pub use api::ExchangeRateApi;
pub use client::ExchangeRateClient;
pub use types::{format_rates, parse_rate, CurrencyCode, RateQuoteSet};
