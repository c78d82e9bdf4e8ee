//! Currencies and price display.
//!
//! Prices are stored as integer minor units (cents, grosze), which is also
//! what Stripe expects for `unit_amount`.

use serde::{Deserialize, Serialize};

pub const CURRENCY_USD: &str = "usd";
pub const CURRENCY_PLN: &str = "pln";

pub const VALID_CURRENCIES: &[&str] = &[CURRENCY_USD, CURRENCY_PLN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Pln,
}

/// A price in both supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DualPrice {
    pub usd: i64,
    pub pln: i64,
}

impl DualPrice {
    pub fn new(usd: i64, pln: i64) -> Self {
        Self { usd, pln }
    }

    /// Pick the amount for `currency`.
    pub fn amount(&self, currency: Currency) -> i64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Pln => self.pln,
        }
    }
}

impl Currency {
    /// Parse a (case-insensitive) ISO code.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            CURRENCY_USD => Ok(Self::Usd),
            CURRENCY_PLN => Ok(Self::Pln),
            _ => Err(format!(
                "Invalid currency '{s}'. Must be one of: {}",
                VALID_CURRENCIES.join(", ")
            )),
        }
    }

    /// Lower-case ISO code, as used by Stripe.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => CURRENCY_USD,
            Self::Pln => CURRENCY_PLN,
        }
    }

    /// Render `minor` units for display, e.g. `$49.99` or `199.00 zł`.
    pub fn format(&self, minor: i64) -> String {
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        let (major, cents) = (abs / 100, abs % 100);
        match self {
            Self::Usd => format!("{sign}${major}.{cents:02}"),
            Self::Pln => format!("{sign}{major}.{cents:02} zł"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::from_str_value("PLN").unwrap(), Currency::Pln);
        assert_eq!(Currency::from_str_value("usd").unwrap(), Currency::Usd);
        assert!(Currency::from_str_value("eur").is_err());
    }

    #[test]
    fn formats_minor_units() {
        assert_eq!(Currency::Usd.format(4999), "$49.99");
        assert_eq!(Currency::Pln.format(19900), "199.00 zł");
        assert_eq!(Currency::Usd.format(5), "$0.05");
    }

    #[test]
    fn dual_price_projects_by_currency() {
        let price = DualPrice::new(1999, 7900);
        assert_eq!(price.amount(Currency::Usd), 1999);
        assert_eq!(price.amount(Currency::Pln), 7900);
    }
}
