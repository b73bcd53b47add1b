use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::utils::{lenient_decimal, lenient_string};
use crate::models::{CapitalGainsSnapshot, GainBucket, Holding, HoldingId, TierGain};

#[derive(Clone, Copy, Debug, Default, Deserialize, Getters, new)]
pub struct TierGainDto {
    #[serde(default, deserialize_with = "lenient_decimal")]
    gain: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    balance: Option<Decimal>,
}

impl TierGainDto {
    /// A tier without a usable gain is treated as no position in that tier.
    pub fn to_tier_gain(&self) -> Option<TierGain> {
        self.gain
            .map(|gain| TierGain::new(gain, self.balance.unwrap_or(Decimal::ZERO)))
    }
}

#[derive(Clone, Debug, Default, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct HoldingDto {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    coin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    coin_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    total_holding: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    average_buy_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    current_price: Option<Decimal>,
    #[serde(default)]
    stcg: Option<TierGainDto>,
    #[serde(default)]
    ltcg: Option<TierGainDto>,
}

impl HoldingDto {
    /// Key used to identify the holding when the source supplies one.
    pub fn natural_key(&self) -> Option<&str> {
        self.id.as_deref().or(self.coin.as_deref())
    }

    pub fn to_holding(&self, id: HoldingId) -> Holding {
        let ticker = self
            .coin
            .clone()
            .unwrap_or_else(|| id.as_str().to_string());
        let name = self.coin_name.clone().unwrap_or_else(|| ticker.clone());

        Holding::new(
            id,
            ticker,
            name,
            self.logo.clone(),
            self.total_holding.unwrap_or(Decimal::ZERO),
            self.average_buy_price.unwrap_or(Decimal::ZERO),
            self.current_price.unwrap_or(Decimal::ZERO),
            self.stcg.as_ref().and_then(TierGainDto::to_tier_gain),
            self.ltcg.as_ref().and_then(TierGainDto::to_tier_gain),
        )
    }
}

/// One tier of the capital gains payload. Older payloads call the fields
/// `short` and `shortLoss`; `profits` and `losses` win when both exist.
#[derive(Clone, Copy, Debug, Default, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GainBucketDto {
    #[serde(default, deserialize_with = "lenient_decimal")]
    profits: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    losses: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    short: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    short_loss: Option<Decimal>,
}

impl GainBucketDto {
    pub fn to_bucket(&self) -> GainBucket {
        GainBucket::new(
            magnitude(self.profits.or(self.short), "profits"),
            magnitude(self.losses.or(self.short_loss), "losses"),
        )
    }
}

fn magnitude(value: Option<Decimal>, field: &str) -> Decimal {
    let value = value.unwrap_or(Decimal::ZERO);
    if value.is_sign_negative() && !value.is_zero() {
        warn!(%value, field, "negative capital gains figure, using its magnitude");
    }
    value.abs()
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Getters, new)]
pub struct CapitalGainsDto {
    #[serde(default)]
    stcg: Option<GainBucketDto>,
    #[serde(default)]
    ltcg: Option<GainBucketDto>,
}

impl CapitalGainsDto {
    pub fn to_snapshot(&self) -> CapitalGainsSnapshot {
        CapitalGainsSnapshot::new(
            self.stcg.unwrap_or_default().to_bucket(),
            self.ltcg.unwrap_or_default().to_bucket(),
        )
    }
}
