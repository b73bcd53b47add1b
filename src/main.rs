use clap::Parser;
use tax_harvest_tui::{app::App, config::Cli, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_path())?;

    let source = cli.data_source();
    info!(%source, "starting tax harvesting dashboard");

    let mut app = App::new(source);
    app.run().await?;

    Ok(())
}
