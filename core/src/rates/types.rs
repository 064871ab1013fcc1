//! Currency codes, rate quotes and their display form.

use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A three-letter currency code. Any string is accepted; the constants cover
/// the commonly used ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(Cow<'static, str>);

impl CurrencyCode {
    pub const CAD: CurrencyCode = CurrencyCode(Cow::Borrowed("CAD"));
    pub const CNY: CurrencyCode = CurrencyCode(Cow::Borrowed("CNY"));
    pub const GBP: CurrencyCode = CurrencyCode(Cow::Borrowed("GBP"));
    pub const EUR: CurrencyCode = CurrencyCode(Cow::Borrowed("EUR"));
    pub const JPY: CurrencyCode = CurrencyCode(Cow::Borrowed("JPY"));
    pub const KRW: CurrencyCode = CurrencyCode(Cow::Borrowed("KRW"));
    pub const USD: CurrencyCode = CurrencyCode(Cow::Borrowed("USD"));

    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CurrencyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Rates quoted against one base currency.
///
/// Entries are kept sorted by currency code. That order is an artifact of
/// storage: it is neither the service's order nor the order targets were
/// requested in, and callers should only rely on the set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuoteSet {
    pub base: CurrencyCode,
    /// Publication date reported by the service, if any.
    pub date: Option<String>,
    pub rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateQuoteSet {
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            date: None,
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, code: impl Into<CurrencyCode>, rate: Decimal) -> Self {
        self.rates.insert(code.into(), rate);
        self
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl fmt::Display for RateQuoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rates(self.base.as_str(), self))
    }
}

/// Parse a JSON numeric literal into an exact decimal, trailing zeros
/// stripped. Accepts plain (`6.578600`) and exponent (`1.5e-3`) forms.
///
/// Precision is bounded by `Decimal`: a value needing more than 28
/// significant digits (after trailing fractional zeros are dropped) is
/// rejected, never rounded. Callers see such a rate as a malformed
/// response.
pub fn parse_rate(literal: &str) -> Option<Decimal> {
    let literal = literal.trim();
    let value = if literal.contains(['e', 'E']) {
        Decimal::from_scientific(literal).ok()?
    } else {
        Decimal::from_str_exact(trim_fraction_zeros(literal)).ok()?
    };
    Some(value.normalize())
}

fn trim_fraction_zeros(literal: &str) -> &str {
    if literal.contains('.') {
        literal.trim_end_matches('0').trim_end_matches('.')
    } else {
        literal
    }
}

/// Render `1 <BASE> = <rate> <CODE>, <rate> <CODE>, ...`.
///
/// Entries appear in the quote set's iteration order, which callers must
/// treat as unspecified.
pub fn format_rates(base: &str, quotes: &RateQuoteSet) -> String {
    let entries: Vec<String> = quotes
        .rates
        .iter()
        .map(|(code, rate)| format!("{} {code}", rate.normalize()))
        .collect();
    format!("1 {base} = {}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(literal: &str) -> Decimal {
        parse_rate(literal).unwrap()
    }

    #[test]
    fn single_rate_formats_plainly() {
        let quotes = RateQuoteSet::new(CurrencyCode::USD).with_rate(CurrencyCode::JPY, rate("117.89"));
        assert_eq!(format_rates("USD", &quotes), "1 USD = 117.89 JPY");
    }

    #[test]
    fn multiple_rates_are_comma_separated() {
        let quotes = RateQuoteSet::new(CurrencyCode::USD)
            .with_rate("CNY", rate("6.5786"))
            .with_rate("GBP", rate("0.70365"));
        let text = format_rates("USD", &quotes);
        assert!(text.starts_with("1 USD = "));
        let entries: Vec<&str> = text["1 USD = ".len()..].split(", ").collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&"6.5786 CNY"));
        assert!(entries.contains(&"0.70365 GBP"));
    }

    #[test]
    fn trailing_zeros_are_stripped_without_float_artifacts() {
        assert_eq!(rate("6.578600").to_string(), "6.5786");
        assert_eq!(rate("1.10").to_string(), "1.1");
        assert_eq!(rate("1300.00").to_string(), "1300");
        assert_eq!(rate("0.0000123400").to_string(), "0.00001234");
    }

    #[test]
    fn exponent_literals_are_expanded() {
        assert_eq!(rate("1.5e-3").to_string(), "0.0015");
        assert_eq!(rate("2.5e2").to_string(), "250");
    }

    #[test]
    fn long_trailing_zero_runs_do_not_count_against_precision() {
        assert_eq!(rate("6.578600000000000000000000000000000000").to_string(), "6.5786");
        assert_eq!(rate("100").to_string(), "100");
        assert_eq!(rate("0.000").to_string(), "0");
    }

    #[test]
    fn literals_beyond_28_significant_digits_are_rejected_not_rounded() {
        assert_eq!(parse_rate("1.000000000000000000000000000001"), None);
        assert_eq!(
            rate("1.000000000000000000000000001").to_string(),
            "1.000000000000000000000000001"
        );
    }

    #[test]
    fn non_numeric_literals_are_rejected() {
        assert!(parse_rate("abc").is_none());
        assert!(parse_rate("").is_none());
        assert!(parse_rate("1.2.3").is_none());
    }

    #[test]
    fn lookup_by_plain_str() {
        let quotes = RateQuoteSet::new(CurrencyCode::EUR).with_rate(CurrencyCode::KRW, rate("1270.5"));
        assert_eq!(quotes.get("KRW"), Some(rate("1270.5")));
        assert_eq!(quotes.get("USD"), None);
        assert_eq!(quotes.to_string(), "1 EUR = 1270.5 KRW");
    }

    #[test]
    fn constants_equal_runtime_codes() {
        assert_eq!(CurrencyCode::USD, CurrencyCode::from("USD"));
        assert_eq!(CurrencyCode::new("XYZ").as_str(), "XYZ");
    }
}
