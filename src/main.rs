use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use listing_harvester::infrastructure::config::{AppConfig, defaults};
use listing_harvester::infrastructure::logging::{init_logging, log_run_info};
use listing_harvester::infrastructure::{CsvSink, HttpClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| defaults::CONFIG_PATH.to_string());

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Could not read config file '{config_path}'"))?;

    // Keeps the file writer alive until main returns
    let _log_guard = init_logging(&config.logging)?;
    log_run_info();
    info!("Config used: {:?}", config.query);

    let fetcher = Arc::new(HttpClient::new(config.http.clone())?);
    let sink = CsvSink::new(&config.output.directory);

    let summary = listing_harvester::harvest(&config, fetcher, &sink).await?;

    info!(
        "Finished: {} unique record(s) ({} duplicate(s), {} failed page(s)) written to {}",
        summary.report.records.len(),
        summary.report.duplicates(),
        summary.report.failed,
        summary.output_path.display()
    );
    Ok(())
}
