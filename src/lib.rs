//! Listing Harvester - concurrent crawler for paginated property listing sites
//!
//! A run discovers how many listing pages a query has, collects every record
//! link from them, fetches all record pages concurrently, extracts one
//! `Record` per page and writes the deduplicated result as CSV.

// Module declarations
pub mod application;
pub mod crawling;
pub mod domain;
pub mod infrastructure;
pub mod sites;

pub use application::{HarvestSummary, build_sources, harvest};
pub use crawling::{CrawlOrchestrator, CrawlReport, CrawlSource, UnitOutcome};
pub use domain::{PropertyType, QueryParameters, Record};
