use std::path::PathBuf;

use clap::Parser;

use crate::api::DataSource;

#[derive(Debug, Parser)]
#[command(
    name = "tax-harvest",
    version,
    about = "Simulate tax-loss harvesting on your crypto holdings"
)]
pub struct Cli {
    /// JSON file with realized capital gains (requires --holdings)
    #[arg(long, env = "TLH_CAPITAL_GAINS_PATH", requires = "holdings")]
    pub capital_gains: Option<String>,

    /// JSON file with holdings (requires --capital-gains)
    #[arg(long, env = "TLH_HOLDINGS_PATH", requires = "capital_gains")]
    pub holdings: Option<String>,

    /// Base URL serving `/capital-gains` and `/holdings`
    #[arg(long, env = "TLH_API_URL", conflicts_with_all = ["capital_gains", "holdings"])]
    pub api_url: Option<String>,

    /// Where to write logs while the terminal UI is running
    #[arg(long, env = "TLH_LOG_FILE", default_value = "tax-harvest.log")]
    pub log_file: String,
}

impl Cli {
    pub fn data_source(&self) -> DataSource {
        match (&self.api_url, &self.capital_gains, &self.holdings) {
            (Some(base_url), _, _) => DataSource::Http {
                base_url: base_url.clone(),
            },
            (None, Some(capital_gains), Some(holdings)) => DataSource::Files {
                capital_gains: expand_path(capital_gains),
                holdings: expand_path(holdings),
            },
            _ => DataSource::Bundled,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        expand_path(&self.log_file)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
