//! Crawl orchestrator
//!
//! For every source the record links are collected first; each link then
//! becomes its own tokio task that fetches the page, runs the site's extractor
//! set and sends the record into one unbounded channel. A single consumer task
//! owns the deduplicated output list. There is no admission control and no
//! retry: a unit that fails is logged and sends nothing.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{debug, error, info};

use super::aggregator::RecordAggregator;
use super::link_collection::collect_record_links;
use super::{parse_page, usable_page};
use crate::domain::{QueryError, QueryParameters, Record};
use crate::infrastructure::http_client::{FetchedPage, PageFetcher};
use crate::sites::ListingSite;

/// A site together with the query URL to crawl on it
#[derive(Clone)]
pub struct CrawlSource {
    pub site: Arc<dyn ListingSite>,
    pub query_url: String,
}

impl CrawlSource {
    pub fn new(site: Arc<dyn ListingSite>, query_url: impl Into<String>) -> Self {
        Self {
            site,
            query_url: query_url.into(),
        }
    }

    /// Build the query URL for `query` on `site`.
    pub fn for_query(site: Arc<dyn ListingSite>, query: &QueryParameters) -> Result<Self, QueryError> {
        let query_url = site.query_url(query)?;
        Ok(Self { site, query_url })
    }
}

impl std::fmt::Debug for CrawlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlSource")
            .field("site", &self.site.name())
            .field("query_url", &self.query_url)
            .finish()
    }
}

/// Terminal state of one record URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Fetched, extracted and sent to the aggregator
    Emitted,
    /// Fetch failed or the page was unusable; nothing was sent
    Failed,
}

/// Result of a crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Record links found across all sources
    pub discovered_links: usize,
    pub emitted: usize,
    pub failed: usize,
    /// Deduplicated records in arrival order
    pub records: Vec<Record>,
    duplicates: usize,
}

impl CrawlReport {
    /// Emitted records dropped as duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

pub struct CrawlOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
}

impl CrawlOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Crawl every source and return the deduplicated records.
    pub async fn run(&self, sources: &[CrawlSource]) -> CrawlReport {
        let (tx, mut rx) = unbounded_channel::<Record>();

        let consumer = tokio::spawn(async move {
            let mut aggregator = RecordAggregator::new();
            while let Some(record) = rx.recv().await {
                aggregator.offer(record);
            }
            aggregator
        });

        let mut units = Vec::new();
        let mut discovered_links = 0;

        for source in sources {
            let links = collect_record_links(&*self.fetcher, &*source.site, &source.query_url).await;
            discovered_links += links.len();
            info!(
                site = source.site.name(),
                "Launching {} record task(s)",
                links.len()
            );

            for link in links {
                let fetcher = Arc::clone(&self.fetcher);
                let site = Arc::clone(&source.site);
                let tx = tx.clone();
                units.push(tokio::spawn(async move {
                    harvest_record(&*fetcher, &*site, &link, &tx).await
                }));
            }
        }

        // The channel closes once the last unit drops its sender
        drop(tx);

        let mut report = CrawlReport {
            discovered_links,
            ..CrawlReport::default()
        };
        for outcome in join_all(units).await {
            match outcome {
                Ok(UnitOutcome::Emitted) => report.emitted += 1,
                Ok(UnitOutcome::Failed) => report.failed += 1,
                Err(e) => {
                    error!("Record task did not complete: {}", e);
                    report.failed += 1;
                }
            }
        }

        match consumer.await {
            Ok(aggregator) => {
                report.duplicates = aggregator.duplicates();
                report.records = aggregator.into_records();
            }
            Err(e) => error!("Aggregation task did not complete: {}", e),
        }

        info!(
            "Crawl finished: {} link(s), {} emitted, {} failed, {} unique record(s)",
            report.discovered_links,
            report.emitted,
            report.failed,
            report.records.len()
        );
        report
    }
}

/// Fetch one record page, extract it and hand the record to the aggregator.
pub async fn harvest_record(
    fetcher: &dyn PageFetcher,
    site: &dyn ListingSite,
    url: &str,
    tx: &UnboundedSender<Record>,
) -> UnitOutcome {
    let Some(page) = usable_page(fetcher.fetch(url).await) else {
        return UnitOutcome::Failed;
    };

    let record = extract_record(site, &page);
    if tx.send(record).is_err() {
        error!(url, "Aggregation channel closed before the record was sent");
        return UnitOutcome::Failed;
    }

    debug!(url, "Record emitted");
    UnitOutcome::Emitted
}

/// Run the site's extractor set over a fetched record page.
pub fn extract_record(site: &dyn ListingSite, page: &FetchedPage) -> Record {
    let document = parse_page(page);
    site.extractor_set().extract(document.root_element(), &page.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SiteConfig;
    use crate::sites::DunaHouse;

    fn site() -> DunaHouse {
        DunaHouse::from_config(&SiteConfig::with_base_url("https://dh.hu/"))
    }

    #[test]
    fn test_extract_record_binds_link() {
        let page = FetchedPage {
            url: "https://dh.hu/ingatlan/42".into(),
            status: 200,
            body: r#"<ul><li><span>Ár</span><div class="value"><b>50 M Ft</b></div></li>
                     <li><span>Méret</span><div class="value">100m2</div></li></ul>"#
                .into(),
        };
        let record = extract_record(&site(), &page);
        assert_eq!(record.link, "https://dh.hu/ingatlan/42");
        assert_eq!(record.price_per_area, 500_000.0);
    }

    #[tokio::test]
    async fn test_closed_channel_is_failure() {
        struct Ok200;

        #[async_trait::async_trait]
        impl PageFetcher for Ok200 {
            async fn fetch(
                &self,
                url: &str,
            ) -> Result<FetchedPage, crate::infrastructure::http_client::FetchError> {
                Ok(FetchedPage {
                    url: url.to_string(),
                    status: 200,
                    body: "<html></html>".into(),
                })
            }
        }

        let (tx, rx) = unbounded_channel();
        drop(rx);
        let outcome = harvest_record(&Ok200, &site(), "https://dh.hu/1", &tx).await;
        assert_eq!(outcome, UnitOutcome::Failed);
    }
}
