use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::models::{CapitalGainsSnapshot, GainTier, Holding, HoldingId};

/// Capital gains after selling every selected holding on top of `baseline`.
///
/// Each sold holding realizes its per-tier gain: positive gains land in
/// `profits`, negative ones in `losses`. Ids without a matching holding are
/// ignored, and an empty selection yields `baseline` unchanged.
pub fn project(
    baseline: &CapitalGainsSnapshot,
    holdings: &[Holding],
    selection: &BTreeSet<HoldingId>,
) -> CapitalGainsSnapshot {
    let mut projected = *baseline;

    if selection.is_empty() {
        return projected;
    }

    for holding in holdings.iter().filter(|h| selection.contains(h.id())) {
        for tier in GainTier::iter() {
            if let Some(tier_gain) = holding.tier(tier) {
                projected.bucket_mut(tier).realize(*tier_gain.gain());
            }
        }
    }

    projected
}
