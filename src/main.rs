mod config;
mod error;
mod fetcher;
mod pipeline;
mod sheets;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::fetch_event_pages;
use crate::pipeline::run_pipeline;
use crate::sheets::{table_tsv, SheetsPublisher};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let (pages, stats) = fetch_event_pages(&cfg).await?;
    info!(
        pages = stats.pages,
        events = stats.api_events,
        markets = stats.api_markets,
        "Fetch complete: {} pages, {} events, {} markets",
        stats.pages,
        stats.api_events,
        stats.api_markets,
    );

    let annotated = run_pipeline(&pages)?;

    if cfg.dry_run {
        println!("{}", table_tsv(&annotated));
        info!("Dry run: skipped Sheets publish");
        return Ok(());
    }

    let publisher = SheetsPublisher::new(&cfg)?;
    publisher.publish(&annotated).await?;

    Ok(())
}
