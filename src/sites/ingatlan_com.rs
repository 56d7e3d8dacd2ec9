//! ingatlan.com
//!
//! The listing pages show a `"1 / 12 oldal"` counter and are addressed with a
//! `?page=N` query. Record pages split their data into a `div.parameters`
//! headline block, `dl` property rows and an `h1` address.

use std::sync::Arc;

use scraper::ElementRef;
use tracing::{debug, warn};

use super::{ListingSite, split_tables};
use crate::domain::{QueryError, QueryParameters, Record, RecordField};
use crate::infrastructure::config::SiteConfig;
use crate::infrastructure::parsing::node::{
    child_by_tag, child_elements, class_contains, class_equals, first_child_element, href, is_anchor,
    is_tag, next_sibling_with_class, own_text, text_of,
};
use crate::infrastructure::parsing::numbers::parse_page_fraction;
use crate::infrastructure::parsing::{
    ExtractorSet, FieldCollector, FieldTable, LinkCollector, NodeProcessor, PaginationDiscoverer,
    ParsingError, RecordExtractor,
};
use crate::infrastructure::url_utils::{PageUrlTemplate, join_uri};

pub const SITE_NAME: &str = "ingatlan.com";

const PAGE_SUFFIX: &str = "?page={page}";

/// Header of the price row; the price itself sits in the sibling values cell
pub const PRICE_HEADER: &str = "Hitelre van szükséged? Kalkulálj!";

pub const MAIN_LABELS: [(&str, RecordField); 4] = [
    (PRICE_HEADER, RecordField::Price),
    ("Alapterület", RecordField::HouseArea),
    ("Telekterület", RecordField::LotArea),
    ("Szobák", RecordField::RoomCount),
];

pub const PROPERTY_LABELS: [(&str, RecordField); 7] = [
    ("Ingatlan állapota", RecordField::Condition),
    ("Építés éve", RecordField::BuiltIn),
    ("Épület szintjei", RecordField::FloorCount),
    ("Parkolás", RecordField::Parking),
    ("Fűtés", RecordField::Heating),
    ("Légkondicionáló", RecordField::AirConditioning),
    ("Fürdő és WC", RecordField::Bathroom),
];

const MAIN_FIELDS: [RecordField; 4] = [
    RecordField::Price,
    RecordField::HouseArea,
    RecordField::LotArea,
    RecordField::RoomCount,
];

pub struct IngatlanCom {
    base_url: String,
    main_table: Arc<FieldTable>,
    property_table: Arc<FieldTable>,
}

impl IngatlanCom {
    pub fn from_config(config: &SiteConfig) -> Self {
        let (main_table, property_table) =
            split_tables(&MAIN_LABELS, &PROPERTY_LABELS, &MAIN_FIELDS, &config.label_overrides());
        Self {
            base_url: config.base_url.clone(),
            main_table,
            property_table,
        }
    }
}

impl ListingSite for IngatlanCom {
    fn name(&self) -> &str {
        SITE_NAME
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self, query: &QueryParameters) -> Result<String, QueryError> {
        // Numerals are validated even though the site takes them verbatim
        query.district_numbers()?;

        let mut url = join_uri(&self.base_url, "lista/elado");
        url.push_str(&format!(
            "+{}+{}-{}-m2+{}-{}-mFt",
            query.property_type.as_segment(),
            query.min_size,
            query.max_size,
            query.min_price,
            query.max_price
        ));
        for district in &query.districts {
            url.push_str(&format!("+{}-ker", district.trim()));
        }
        Ok(url)
    }

    fn pagination_discoverer(&self) -> Box<dyn PaginationDiscoverer> {
        Box::new(PageCounterPagination::default())
    }

    fn link_collector(&self) -> Box<dyn LinkCollector> {
        Box::new(ListingLinkCollector::default())
    }

    fn extractor_set(&self) -> ExtractorSet {
        ExtractorSet::new(vec![
            Box::new(MainInfoExtractor::new(Arc::clone(&self.main_table))),
            Box::new(PropertyInfoExtractor::new(Arc::clone(&self.property_table))),
            Box::new(AddressExtractor::default()),
        ])
    }
}

/// Reads `"N / M oldal"`; the last counter parsed wins
#[derive(Debug)]
pub struct PageCounterPagination {
    max_page: u32,
}

impl Default for PageCounterPagination {
    fn default() -> Self {
        Self { max_page: 1 }
    }
}

impl NodeProcessor for PageCounterPagination {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "div") && class_contains(node, "pagination__page-number")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        let counter = text_of(node);
        if counter.is_empty() {
            return;
        }

        match parse_page_fraction(&counter) {
            Ok(pages) => self.max_page = pages,
            Err(e) => warn!(site = SITE_NAME, "{}", e),
        }
    }
}

impl PaginationDiscoverer for PageCounterPagination {
    fn max_page(&self) -> u32 {
        self.max_page
    }

    fn page_url_format(&self) -> PageUrlTemplate {
        PageUrlTemplate::new(PAGE_SUFFIX)
    }
}

#[derive(Debug, Default)]
pub struct ListingLinkCollector {
    links: Vec<String>,
}

impl NodeProcessor for ListingLinkCollector {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_anchor(node) && class_contains(node, "listing__link")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        if let Some(link) = href(node) {
            self.links.push(link.to_string());
        }
    }
}

impl LinkCollector for ListingLinkCollector {
    fn links(&self) -> &[String] {
        &self.links
    }

    fn into_links(self: Box<Self>) -> Vec<String> {
        self.links
    }
}

/// `div.parameters` rows: a title (or the price header anchor) followed by a
/// `parameterValues` sibling holding the value in a `span`
pub struct MainInfoExtractor {
    fields: FieldCollector,
}

impl MainInfoExtractor {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            fields: FieldCollector::new(table).deriving_price_per_area(),
        }
    }

    fn row_label(head: ElementRef<'_>) -> Option<String> {
        if is_anchor(head) || (is_tag(head, "div") && class_contains(head, "parameterTitle")) {
            Some(text_of(head))
        } else {
            None
        }
    }
}

impl NodeProcessor for MainInfoExtractor {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "div") && class_equals(node, "parameters")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        for row in child_elements(node) {
            let Some(head) = first_child_element(row) else {
                continue;
            };
            let Some(label) = Self::row_label(head) else {
                continue;
            };

            let value = next_sibling_with_class(head, "parameterValues")
                .and_then(|cell| child_by_tag(cell, "span"))
                .map(text_of);

            match value {
                Some(value) => {
                    self.fields.capture(&label, &value);
                }
                None => debug!(
                    site = SITE_NAME,
                    "{}",
                    ParsingError::missing_value(&format!("value of '{label}'"))
                ),
            }
        }
    }
}

impl RecordExtractor for MainInfoExtractor {
    fn contribute(&self, record: &mut Record) {
        self.fields.contribute(record);
    }
}

/// `dl` rows with `parameterName` / `parameterValue` children
pub struct PropertyInfoExtractor {
    fields: FieldCollector,
}

impl PropertyInfoExtractor {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            fields: FieldCollector::new(table),
        }
    }
}

impl NodeProcessor for PropertyInfoExtractor {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "dl")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        for row in child_elements(node) {
            let mut name = None;
            let mut value = None;

            for cell in child_elements(row) {
                if class_contains(cell, "parameterName") {
                    name = Some(text_of(cell));
                } else if class_contains(cell, "parameterValue") {
                    value = Some(text_of(cell));
                }
            }

            if let (Some(name), Some(value)) = (name, value) {
                self.fields.capture(&name, &value);
            }
        }
    }
}

impl RecordExtractor for PropertyInfoExtractor {
    fn contribute(&self, record: &mut Record) {
        self.fields.contribute(record);
    }
}

#[derive(Debug, Default)]
pub struct AddressExtractor {
    address: Option<String>,
}

impl NodeProcessor for AddressExtractor {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "h1") && class_contains(node, "address")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        if let Some(address) = own_text(node) {
            self.address = Some(address);
        }
    }
}

impl RecordExtractor for AddressExtractor {
    fn contribute(&self, record: &mut Record) {
        if let Some(address) = &self.address {
            record.address.clone_from(address);
        }
    }
}
