use derive_getters::Getters;
use rust_decimal::Decimal;
use strum_macros::{Display, EnumIter};

use crate::models::{GainTier, Holding};

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, PartialEq)]
pub enum SortKey {
    #[strum(serialize = "Holdings")]
    Holdings,
    #[strum(serialize = "Current Price")]
    CurrentPrice,
    #[strum(serialize = "Short-term")]
    ShortTerm,
    #[strum(serialize = "Long-term")]
    LongTerm,
}

impl SortKey {
    pub fn value(&self, holding: &Holding) -> Decimal {
        match self {
            SortKey::Holdings => *holding.total_quantity(),
            SortKey::CurrentPrice => *holding.current_price(),
            SortKey::ShortTerm => tier_balance(holding, GainTier::ShortTerm),
            SortKey::LongTerm => tier_balance(holding, GainTier::LongTerm),
        }
    }
}

fn tier_balance(holding: &Holding, tier: GainTier) -> Decimal {
    holding
        .tier(tier)
        .map_or(Decimal::ZERO, |tier_gain| *tier_gain.balance())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort and expansion state of the holdings table.
#[derive(Clone, Debug, Default, Getters)]
pub struct HoldingsView {
    sort: Option<(SortKey, SortDirection)>,
    show_all: bool,
}

impl HoldingsView {
    pub const COLLAPSED_ROWS: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    /// Re-selecting the active key flips direction; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((current, SortDirection::Asc)) if current == key => {
                Some((key, SortDirection::Desc))
            }
            Some((current, SortDirection::Desc)) if current == key => {
                Some((key, SortDirection::Asc))
            }
            _ => Some((key, SortDirection::Asc)),
        };
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    pub fn is_expandable(&self, total: usize) -> bool {
        total > Self::COLLAPSED_ROWS
    }

    pub fn sort_arrow(&self, key: SortKey) -> &'static str {
        match self.sort {
            Some((current, SortDirection::Asc)) if current == key => "↑",
            Some((current, SortDirection::Desc)) if current == key => "↓",
            _ => "",
        }
    }

    pub fn sorted<'a>(&self, holdings: &'a [Holding]) -> Vec<&'a Holding> {
        let mut rows: Vec<&Holding> = holdings.iter().collect();

        if let Some((key, direction)) = self.sort {
            // `sort_by` is stable, ties keep their load order
            rows.sort_by(|a, b| {
                let ordering = key.value(a).cmp(&key.value(b));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn visible<'a>(&self, holdings: &'a [Holding]) -> Vec<&'a Holding> {
        let mut rows = self.sorted(holdings);
        if !self.show_all {
            rows.truncate(Self::COLLAPSED_ROWS);
        }
        rows
    }
}
