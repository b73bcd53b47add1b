use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
pub enum GainTier {
    #[strum(serialize = "Short-term")]
    ShortTerm,
    #[strum(serialize = "Long-term")]
    LongTerm,
}

/// Profits and losses realized in one tax tier. Both sides are kept as
/// non-negative magnitudes; sums saturate at `Decimal::MAX`.
#[derive(Clone, Copy, Debug, Default, Eq, Getters, PartialEq, Serialize, new)]
pub struct GainBucket {
    profits: Decimal,
    losses: Decimal,
}

impl GainBucket {
    pub fn net(&self) -> Decimal {
        self.profits.saturating_sub(self.losses)
    }

    /// Books a realized gain: positive into profits, negative into losses.
    pub fn realize(&mut self, gain: Decimal) {
        if gain > Decimal::ZERO {
            self.profits = self.profits.saturating_add(gain);
        } else if gain < Decimal::ZERO {
            self.losses = self.losses.saturating_add(gain.abs());
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Getters, PartialEq, Serialize, new)]
pub struct CapitalGainsSnapshot {
    short_term: GainBucket,
    long_term: GainBucket,
}

impl CapitalGainsSnapshot {
    pub fn bucket(&self, tier: GainTier) -> &GainBucket {
        match tier {
            GainTier::ShortTerm => &self.short_term,
            GainTier::LongTerm => &self.long_term,
        }
    }

    pub fn bucket_mut(&mut self, tier: GainTier) -> &mut GainBucket {
        match tier {
            GainTier::ShortTerm => &mut self.short_term,
            GainTier::LongTerm => &mut self.long_term,
        }
    }

    pub fn net(&self) -> Decimal {
        self.short_term.net().saturating_add(self.long_term.net())
    }
}
