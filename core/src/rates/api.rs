//! Stateless request builder and response parser for the `/latest` rates
//! endpoint.
//!
//! # Design
//! Rate values are read from the raw JSON text of each number rather than
//! through `f64`, so a literal such as `6.578600` reaches the caller as the
//! exact decimal `6.5786`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::value::RawValue;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{check_status, decode_json, HttpMethod, HttpRequest, HttpResponse};
use crate::rates::types::{parse_rate, CurrencyCode, RateQuoteSet};

#[derive(Deserialize)]
struct LatestEnvelope {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: Option<BTreeMap<String, Box<RawValue>>>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    base_url: String,
    access_key: Option<String>,
}

impl ExchangeRateApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: None,
        }
    }

    pub fn with_access_key(mut self, access_key: Option<String>) -> Self {
        self.access_key = access_key;
        self
    }

    /// `GET <base-url>/latest?base=<CODE>[&symbols=<CODE>,...]`. An empty
    /// `targets` asks for every currency the service knows. Duplicate
    /// targets are sent once.
    pub fn build_latest(&self, base: &CurrencyCode, targets: &[CurrencyCode]) -> HttpRequest {
        let mut path = format!("{}/latest?base={}", self.base_url, encode(base.as_str()));
        let symbols = distinct(targets);
        if !symbols.is_empty() {
            let joined: Vec<String> = symbols.iter().map(|code| encode(code.as_str())).collect();
            path.push_str("&symbols=");
            path.push_str(&joined.join(","));
        }
        if let Some(key) = &self.access_key {
            path.push_str("&access_key=");
            path.push_str(&encode(key));
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// Decode a `/latest` response into a quote set.
    ///
    /// Every requested target must be present in the response, and every
    /// rate must be a positive number. With non-empty `targets` the set
    /// holds exactly the distinct requested codes; anything else the service
    /// sends back is dropped unread.
    pub fn parse_latest(
        &self,
        response: HttpResponse,
        base: &CurrencyCode,
        targets: &[CurrencyCode],
    ) -> Result<RateQuoteSet, ApiError> {
        if response.status != 200 {
            if let Some(message) = service_error(&response.body) {
                return Err(ApiError::ServiceError(message));
            }
            check_status(&response, 200)?;
        }
        let envelope: LatestEnvelope = decode_json(&response.body)?;
        if let Some(error) = &envelope.error {
            return Err(ApiError::ServiceError(describe_error(error)));
        }
        if envelope.success == Some(false) {
            return Err(ApiError::ServiceError("request was not successful".into()));
        }
        let raw_rates = envelope
            .rates
            .ok_or_else(|| ApiError::DeserializationError("response has no rates object".into()))?;

        let mut quotes = RateQuoteSet::new(envelope.base.map(CurrencyCode::from).unwrap_or_else(|| base.clone()));
        quotes.date = envelope.date;
        for (code, raw) in raw_rates {
            if !targets.is_empty() && !targets.iter().any(|target| target.as_str() == code) {
                continue;
            }
            let literal = raw.get();
            let rate = parse_rate(literal.trim_matches('"')).ok_or_else(|| {
                ApiError::DeserializationError(format!("rate for {code} is not a number: {literal}"))
            })?;
            if rate.is_sign_negative() || rate.is_zero() {
                return Err(ApiError::DeserializationError(format!(
                    "rate for {code} is not positive: {literal}"
                )));
            }
            quotes.rates.insert(CurrencyCode::from(code), rate);
        }

        if let Some(missing) = targets.iter().find(|code| !quotes.rates.contains_key(code.as_str())) {
            return Err(ApiError::UnknownCurrency(missing.to_string()));
        }
        Ok(quotes)
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn distinct(codes: &[CurrencyCode]) -> Vec<&CurrencyCode> {
    let mut seen = Vec::with_capacity(codes.len());
    for code in codes {
        if !seen.contains(&code) {
            seen.push(code);
        }
    }
    seen
}

/// Pull a human-readable message out of an error body, if it has one.
fn service_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").map(describe_error)
}

/// Errors come either as a bare string (`{"error":"Invalid base"}`) or as an
/// object with `info`/`type` fields.
fn describe_error(error: &serde_json::Value) -> String {
    if let Some(text) = error.as_str() {
        return text.to_string();
    }
    ["info", "type"]
        .iter()
        .find_map(|field| error.get(*field).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
