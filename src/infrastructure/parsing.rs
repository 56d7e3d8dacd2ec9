//! Node processor parsing infrastructure
//!
//! Extraction is split into small stateful processors that are walked over a
//! parsed document. A processor only ever sees the document it was built
//! for: the crawler asks a `ListingSite` for fresh instances per page.
//!
//! - `NodeProcessor`: predicate + visitor, the atomic unit
//! - `PaginationDiscoverer`: how many listing pages exist and how to address them
//! - `LinkCollector`: record URLs found on one listing page
//! - `RecordExtractor`: contributes fields into the shared `Record`

pub mod field_table;
pub mod node;
pub mod numbers;
pub mod traversal;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use field_table::{FieldCollector, FieldTable, FieldValues, convert_field};
pub use traversal::traverse;

use scraper::ElementRef;

use crate::domain::Record;
use crate::infrastructure::url_utils::PageUrlTemplate;

/// Predicate over an element plus a visitor that accumulates private state.
///
/// `visit` is only called for elements where `matches` returned true.
pub trait NodeProcessor {
    fn matches(&self, node: ElementRef<'_>) -> bool;

    fn visit(&mut self, node: ElementRef<'_>);
}

/// Reads the pagination control of the first listing page
pub trait PaginationDiscoverer: NodeProcessor + Send {
    /// Highest page number seen; 1 when the page has no pagination control
    fn max_page(&self) -> u32;

    fn page_url_format(&self) -> PageUrlTemplate;
}

/// Collects outbound record links from one listing page.
///
/// Links are kept in document order and are not deduplicated.
pub trait LinkCollector: NodeProcessor + Send {
    fn links(&self) -> &[String];

    fn into_links(self: Box<Self>) -> Vec<String>;
}

/// One member of a site's extractor set
pub trait RecordExtractor: NodeProcessor + Send {
    /// Write the fields this extractor understands into `record`.
    fn contribute(&self, record: &mut Record);
}

/// Ordered extractors run over the same record page
pub struct ExtractorSet {
    extractors: Vec<Box<dyn RecordExtractor>>,
}

impl ExtractorSet {
    pub fn new(extractors: Vec<Box<dyn RecordExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Run every extractor over the document, then merge their contributions
    /// in configured order into a record for `link`.
    pub fn extract(mut self, root: ElementRef<'_>, link: &str) -> Record {
        for extractor in &mut self.extractors {
            traverse(root, extractor.as_mut());
        }

        let mut record = Record::for_link(link);
        for extractor in &self.extractors {
            extractor.contribute(&mut record);
        }
        record
    }
}
