use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use derive_getters::Getters;
use derive_new::new;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::{
    dto::{CapitalGainsDto, HoldingDto},
    utils::{make_request, parse_response_array, parse_response_object, unwrap_envelope},
};

const BUNDLED_CAPITAL_GAINS: &str = include_str!("../../data/capital_gains.json");
const BUNDLED_HOLDINGS: &str = include_str!("../../data/holdings.json");

const CAPITAL_GAINS_ENVELOPE: &str = "capitalGains";

/// Everything one load delivers to the store.
#[derive(Clone, Debug, Getters, new)]
pub struct HarvestPayload {
    capital_gains: CapitalGainsDto,
    holdings: Vec<HoldingDto>,
}

impl HarvestPayload {
    pub fn into_parts(self) -> (CapitalGainsDto, Vec<HoldingDto>) {
        (self.capital_gains, self.holdings)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataSource {
    Bundled,
    Files {
        capital_gains: PathBuf,
        holdings: PathBuf,
    },
    Http {
        base_url: String,
    },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Bundled => write!(f, "bundled sample"),
            DataSource::Files {
                capital_gains,
                holdings,
            } => write!(f, "{} + {}", capital_gains.display(), holdings.display()),
            DataSource::Http { base_url } => write!(f, "{}", base_url),
        }
    }
}

impl DataSource {
    pub async fn fetch(&self, client: &Client) -> Result<HarvestPayload> {
        let (capital_gains, holdings) = match self {
            DataSource::Bundled => (
                serde_json::from_str::<Value>(BUNDLED_CAPITAL_GAINS)
                    .context("Bundled capital gains are not valid JSON")?,
                serde_json::from_str::<Value>(BUNDLED_HOLDINGS)
                    .context("Bundled holdings are not valid JSON")?,
            ),
            DataSource::Files {
                capital_gains,
                holdings,
            } => (
                read_json_file(capital_gains).await?,
                read_json_file(holdings).await?,
            ),
            DataSource::Http { base_url } => (
                make_request(client, base_url, "capital-gains").await?,
                make_request(client, base_url, "holdings").await?,
            ),
        };

        let payload = parse_payload(capital_gains, holdings)?;
        info!(
            source = %self,
            holdings = payload.holdings().len(),
            "fetched harvest data"
        );
        Ok(payload)
    }
}

pub fn parse_payload(capital_gains: Value, holdings: Value) -> Result<HarvestPayload> {
    let capital_gains = parse_response_object::<CapitalGainsDto>(
        unwrap_envelope(capital_gains, CAPITAL_GAINS_ENVELOPE),
        "capital gains",
    )?;
    let holdings = parse_response_array::<HoldingDto>(holdings, "holding")?;

    Ok(HarvestPayload::new(capital_gains, holdings))
}

async fn read_json_file(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str::<Value>(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}
