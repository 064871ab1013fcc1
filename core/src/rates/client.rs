//! Exchange-rate queries over a `Transport`.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ExchangeRateConfig;
use crate::error::{ApiError, Error};
use crate::rates::api::ExchangeRateApi;
use crate::rates::types::{format_rates, CurrencyCode, RateQuoteSet};
use crate::transport::Transport;

/// Fetches quotes from the `/latest` endpoint. Every call is a fresh round
/// trip; failures carry the base currency that was queried.
///
/// Rates are exact `Decimal` values of up to 28 significant digits. A
/// literal longer than that fails the call as a malformed response instead
/// of being rounded.
pub struct ExchangeRateClient<T> {
    api: ExchangeRateApi,
    transport: T,
}

impl<T: Transport> ExchangeRateClient<T> {
    pub fn new(config: &ExchangeRateConfig, transport: T) -> Self {
        Self {
            api: ExchangeRateApi::new(&config.base_url).with_access_key(config.access_key.clone()),
            transport,
        }
    }

    /// Rates from `base` to each of `targets`, or to every known currency
    /// when `targets` is empty.
    pub fn get_rates(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<RateQuoteSet, Error> {
        let request = self.api.build_latest(base, targets);
        let quotes = self
            .transport
            .execute(request)
            .map_err(ApiError::from)
            .and_then(|response| self.api.parse_latest(response, base, targets))
            .map_err(|cause| Error::remote_for("get_rates", base.as_str(), cause))?;
        debug!(%base, count = quotes.len(), "fetched rates");
        Ok(quotes)
    }

    /// The single rate from `base` to `target`.
    pub fn get_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, Error> {
        let quotes = self.get_rates(base, std::slice::from_ref(target))?;
        quotes.get(target.as_str()).ok_or_else(|| {
            Error::remote_for("get_rates", base.as_str(), ApiError::UnknownCurrency(target.to_string()))
        })
    }

    /// `get_rates` rendered as `1 <BASE> = <rate> <CODE>, ...`.
    pub fn quote(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> Result<String, Error> {
        let quotes = self.get_rates(base, targets)?;
        Ok(format_rates(base.as_str(), &quotes))
    }
}
