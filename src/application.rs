//! Application layer
//!
//! Wires configuration, sites, the orchestrator and the sink into one crawl
//! run. The binary is a thin wrapper around `harvest`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::crawling::{CrawlOrchestrator, CrawlReport, CrawlSource};
use crate::domain::QueryError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv_sink::RecordSink;
use crate::infrastructure::http_client::PageFetcher;
use crate::sites::build_sites;

/// Outcome of a finished run
#[derive(Debug)]
pub struct HarvestSummary {
    pub report: CrawlReport,
    pub output_path: PathBuf,
}

/// Query URL for every enabled site. An unknown district fails the whole
/// run, since no query can be built without it.
pub fn build_sources(config: &AppConfig) -> Result<Vec<CrawlSource>, QueryError> {
    build_sites(&config.sites)
        .into_iter()
        .map(|site| {
            let source = CrawlSource::for_query(site, &config.query)?;
            info!(site = source.site.name(), url = %source.query_url, "Query URL");
            Ok(source)
        })
        .collect()
}

/// Crawl all enabled sites and write the deduplicated records to `sink`.
pub async fn harvest(
    config: &AppConfig,
    fetcher: Arc<dyn PageFetcher>,
    sink: &dyn RecordSink,
) -> anyhow::Result<HarvestSummary> {
    let sources = build_sources(config).context("Could not build query URLs")?;

    let report = CrawlOrchestrator::new(fetcher).run(&sources).await;

    let file_name = config.query.output_file_name(&config.output.file_prefix);
    info!("Collection finished, writing data to '{}'", file_name);
    let output_path = sink
        .write_records(&file_name, &report.records)
        .with_context(|| format!("Failed to write {file_name}"))?;

    Ok(HarvestSummary {
        report,
        output_path,
    })
}
