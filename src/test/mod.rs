mod app;
mod ui;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use crate::{
    api::{CapitalGainsDto, HoldingDto},
    models::{CapitalGainsSnapshot, GainBucket, Holding, HoldingId, TierGain},
};

pub(crate) fn holding(
    id: &str,
    short_term: Option<Decimal>,
    long_term: Option<Decimal>,
) -> Holding {
    Holding::new(
        HoldingId::from(id),
        id.to_string(),
        id.to_string(),
        None,
        dec!(1),
        dec!(1),
        dec!(1),
        short_term.map(|gain| TierGain::new(gain, dec!(1))),
        long_term.map(|gain| TierGain::new(gain, dec!(1))),
    )
}

pub(crate) fn snapshot(st: (Decimal, Decimal), lt: (Decimal, Decimal)) -> CapitalGainsSnapshot {
    CapitalGainsSnapshot::new(GainBucket::new(st.0, st.1), GainBucket::new(lt.0, lt.1))
}

pub(crate) fn holdings_from(value: Value) -> Vec<HoldingDto> {
    serde_json::from_value(value).unwrap()
}

pub(crate) fn gains_from(value: Value) -> CapitalGainsDto {
    serde_json::from_value(value).unwrap()
}

/// Baseline and holdings used by the end-to-end harvesting scenario.
pub(crate) fn scenario() -> (CapitalGainsDto, Vec<HoldingDto>) {
    (
        gains_from(json!({
            "stcg": { "profits": 100, "losses": 20 },
            "ltcg": { "profits": 50, "losses": 10 }
        })),
        holdings_from(json!([
            { "id": "A", "coin": "AAA", "stcg": { "gain": -30 } },
            { "id": "B", "coin": "BBB", "ltcg": { "gain": 15 } }
        ])),
    )
}
