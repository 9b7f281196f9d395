//! Currency helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary amounts are `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
///
/// Retail contracts are denominated in UZS (no subunits in practice),
/// so amounts are rounded to whole currency units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Uzbek Som
    #[default]
    Uzs,
    /// US Dollar
    Usd,
}

/// Rounds an amount to whole currency units using half-up rounding.
///
/// Half-up ("midpoint away from zero") matches how installment amounts
/// were historically computed; changing the strategy would shift the
/// monthly payment on existing contracts.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uzs => write!(f, "UZS"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UZS" => Ok(Self::Uzs),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(100000.5)), dec!(100001));
        assert_eq!(round_currency(dec!(100000.4)), dec!(100000));
        assert_eq!(round_currency(dec!(99999.99)), dec!(100000));
    }

    #[test]
    fn test_round_currency_exact_amount_unchanged() {
        assert_eq!(round_currency(dec!(100000)), dec!(100000));
        assert_eq!(round_currency(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_currency_display_and_parse() {
        assert_eq!(Currency::Uzs.to_string(), "UZS");
        assert_eq!(Currency::from_str("uzs").unwrap(), Currency::Uzs);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert!(Currency::from_str("XXX").is_err());
    }

    #[test]
    fn test_default_currency_is_uzs() {
        assert_eq!(Currency::default(), Currency::Uzs);
    }
}
