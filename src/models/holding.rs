use std::fmt;

use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::GainTier;

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HoldingId(String);

impl HoldingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HoldingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HoldingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for HoldingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Realized gain if the tier were sold now, and the quantity held in it.
#[derive(Clone, Copy, Debug, Eq, Getters, PartialEq, new)]
pub struct TierGain {
    gain: Decimal,
    balance: Decimal,
}

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Holding {
    id: HoldingId,
    ticker: String,
    name: String,
    logo_url: Option<String>,
    total_quantity: Decimal,
    average_cost: Decimal,
    current_price: Decimal,
    short_term: Option<TierGain>,
    long_term: Option<TierGain>,
}

impl Holding {
    pub fn tier(&self, tier: GainTier) -> Option<&TierGain> {
        match tier {
            GainTier::ShortTerm => self.short_term.as_ref(),
            GainTier::LongTerm => self.long_term.as_ref(),
        }
    }

    pub fn market_value(&self) -> Decimal {
        self.total_quantity.saturating_mul(self.current_price)
    }
}
