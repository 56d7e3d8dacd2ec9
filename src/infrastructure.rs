//! Infrastructure layer: configuration, logging, HTTP, export and HTML parsing

pub mod config;
pub mod csv_sink;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod url_utils;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, OutputConfig, SiteConfig, SitesConfig};
pub use csv_sink::{COLUMNS, CsvSink, RecordSink, SinkError, read_records};
pub use http_client::{FetchError, FetchedPage, HttpClient, HttpClientConfig, PageFetcher};
pub use parsing::{
    ExtractorSet, LinkCollector, NodeProcessor, PaginationDiscoverer, ParsingError, ParsingResult,
    RecordExtractor,
};
pub use url_utils::{PageUrlTemplate, join_uri, resolve_record_link};
