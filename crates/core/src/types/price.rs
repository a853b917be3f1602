//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are kept in the currency's standard unit (e.g. dollars, not
/// cents) as an exact decimal, so sale percentages and totals never pick up
/// floating-point noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Whole-number percentage saved relative to `original`.
    ///
    /// Returns `None` when the currencies differ, the original is not
    /// positive, or this price is not actually lower.
    #[must_use]
    pub fn percent_off(&self, original: &Self) -> Option<u32> {
        if self.currency_code != original.currency_code
            || original.amount <= Decimal::ZERO
            || self.amount >= original.amount
        {
            return None;
        }

        let saved = (original.amount - self.amount) / original.amount * Decimal::ONE_HUNDRED;
        saved
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes the storefront lists prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    EGP,
    SAR,
    AED,
}

impl CurrencyCode {
    /// Display symbol used in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::EGP => "E£",
            Self::SAR => "SAR ",
            Self::AED => "AED ",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::EGP => "EGP",
            Self::SAR => "SAR",
            Self::AED => "AED",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "EGP" => Ok(Self::EGP),
            "SAR" => Ok(Self::SAR),
            "AED" => Ok(Self::AED),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Price {
        Price::new(amount.parse().unwrap(), CurrencyCode::USD)
    }

    #[test]
    fn test_display() {
        assert_eq!(usd("19.5").to_string(), "$19.50");
        assert_eq!(
            Price::new(Decimal::new(1000, 2), CurrencyCode::EUR).to_string(),
            "€10.00"
        );
    }

    #[test]
    fn test_percent_off() {
        assert_eq!(usd("75").percent_off(&usd("100")), Some(25));
        assert_eq!(usd("66.5").percent_off(&usd("100")), Some(34));
    }

    #[test]
    fn test_percent_off_requires_real_discount() {
        assert_eq!(usd("100").percent_off(&usd("100")), None);
        assert_eq!(usd("120").percent_off(&usd("100")), None);
        assert_eq!(usd("1").percent_off(&usd("0")), None);
        let eur = Price::new(Decimal::ONE, CurrencyCode::EUR);
        assert_eq!(eur.percent_off(&usd("100")), None);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("egp".parse::<CurrencyCode>().unwrap(), CurrencyCode::EGP);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
