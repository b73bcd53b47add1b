pub mod dto;
pub mod source;
pub mod utils;

pub use dto::{CapitalGainsDto, GainBucketDto, HoldingDto, TierGainDto};
pub use source::{DataSource, HarvestPayload};
