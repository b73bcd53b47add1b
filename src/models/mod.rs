pub mod gains;
pub mod holding;

pub use gains::{CapitalGainsSnapshot, GainBucket, GainTier};
pub use holding::{Holding, HoldingId, TierGain};
