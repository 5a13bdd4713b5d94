//! Type-safe price representation using decimal arithmetic.
//!
//! Product prices are persisted as `DECIMAL` in the currency's standard unit
//! (dollars, not cents). Payment processors want integer minor units, so the
//! conversion lives here rather than at each call site.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
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

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount in the smallest currency unit (cents for USD).
    ///
    /// Fractions of a cent are rounded half away from zero. Returns `None`
    /// if the amount does not fit in an `i64`.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use shopdeck_core::Price;
    ///
    /// let price = Price::usd(Decimal::new(1999, 2));
    /// assert_eq!(price.minor_units(), Some(1999));
    /// ```
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        self.amount
            .checked_mul(Decimal::from(self.currency_code.minor_unit_factor()))?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
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

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Three-letter code as sent to payment processors.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Number of minor units per standard unit.
    #[must_use]
    pub const fn minor_unit_factor(&self) -> i64 {
        100
    }
}
