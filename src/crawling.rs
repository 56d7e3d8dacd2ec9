//! Crawl pipeline
//!
//! - `link_collection`: pagination discovery, then record links from every
//!   listing page of a query
//! - `orchestrator`: one task per record link, fan-in through a single
//!   aggregation channel
//! - `aggregator`: identity based deduplication of the incoming records

pub mod aggregator;
pub mod link_collection;
pub mod orchestrator;

pub use aggregator::RecordAggregator;
pub use link_collection::collect_record_links;
pub use orchestrator::{CrawlOrchestrator, CrawlReport, CrawlSource, UnitOutcome};

use scraper::Html;
use tracing::{debug, warn};

use crate::infrastructure::http_client::{FetchError, FetchedPage};

/// Keep a fetch result only if it produced a 2xx page; everything else is
/// logged and dropped.
pub(crate) fn usable_page(result: Result<FetchedPage, FetchError>) -> Option<FetchedPage> {
    match result {
        Ok(page) if page.is_not_found() => {
            warn!(url = %page.url, "Page not found");
            None
        }
        Ok(page) => match page.error_for_status() {
            Ok(()) => Some(page),
            Err(e) => {
                warn!("Page rejected: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Parse a fetched body. Markup errors are recovered by the parser and only
/// counted here.
pub(crate) fn parse_page(page: &FetchedPage) -> Html {
    let document = Html::parse_document(&page.body);
    if !document.errors.is_empty() {
        debug!(
            url = %page.url,
            errors = document.errors.len(),
            "Document parsed with recoverable errors"
        );
    }
    document
}
