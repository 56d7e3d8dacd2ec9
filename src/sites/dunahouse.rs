//! dh.hu (Duna House)
//!
//! Listing pages link to further pages with `oldal-N` anchors. Record pages
//! carry the price/area/room block as `li` items and the remaining details as
//! a two-column `table-list-style` grid.

use std::sync::Arc;

use scraper::ElementRef;
use tracing::{debug, warn};

use super::{ListingSite, split_tables};
use crate::domain::{QueryError, QueryParameters, Record, RecordField};
use crate::infrastructure::config::SiteConfig;
use crate::infrastructure::parsing::node::{
    child_by_tag, child_elements, class_contains, href, is_anchor, is_tag, text_of,
};
use crate::infrastructure::parsing::numbers::parse_page_number;
use crate::infrastructure::parsing::{
    ExtractorSet, FieldCollector, FieldTable, LinkCollector, NodeProcessor, PaginationDiscoverer,
    RecordExtractor,
};
use crate::infrastructure::url_utils::{PageUrlTemplate, join_uri};

pub const SITE_NAME: &str = "dunahouse";

const PAGE_SUFFIX: &str = "/oldal-{page}";

const RECORD_LINK_CLASSES: [&str; 2] = ["listEstateWithoutPicOnPicture", "listEstateWithPicOnPicture"];

/// Labels of the `li` price/area/room block
pub const MAIN_LABELS: [(&str, RecordField); 3] = [
    ("Ár", RecordField::Price),
    ("Méret", RecordField::HouseArea),
    ("Szoba", RecordField::RoomCount),
];

/// Labels of the two-column details grid
pub const GENERAL_LABELS: [(&str, RecordField); 6] = [
    ("Épület állapota belül:", RecordField::Condition),
    ("Belsö szintek száma:", RecordField::FloorCount),
    ("Fűtés:", RecordField::Heating),
    ("Épült:", RecordField::BuiltIn),
    ("Cím:", RecordField::Address),
    ("Telek mérete:", RecordField::LotArea),
];

const MAIN_FIELDS: [RecordField; 3] = [RecordField::Price, RecordField::HouseArea, RecordField::RoomCount];

pub struct DunaHouse {
    base_url: String,
    main_table: Arc<FieldTable>,
    general_table: Arc<FieldTable>,
}

impl DunaHouse {
    pub fn from_config(config: &SiteConfig) -> Self {
        let (main_table, general_table) =
            split_tables(&MAIN_LABELS, &GENERAL_LABELS, &MAIN_FIELDS, &config.label_overrides());
        Self {
            base_url: config.base_url.clone(),
            main_table,
            general_table,
        }
    }
}

impl ListingSite for DunaHouse {
    fn name(&self) -> &str {
        SITE_NAME
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self, query: &QueryParameters) -> Result<String, QueryError> {
        let districts = query
            .district_numbers()?
            .into_iter()
            .map(|n| format!("budapest-{n}.-kerulet"))
            .collect::<Vec<_>>()
            .join("+");

        let mut url = join_uri(&self.base_url, "elado-ingatlan");
        url = join_uri(&url, query.property_type.as_segment());
        url = join_uri(&url, &districts);
        url = join_uri(&url, "-");
        url = join_uri(&url, &format!("{}-{}-mFt", query.min_price, query.max_price));
        url = join_uri(&url, &format!("{}-{}-m2", query.min_size, query.max_size));
        Ok(url)
    }

    fn pagination_discoverer(&self) -> Box<dyn PaginationDiscoverer> {
        Box::new(PageLinkPagination::default())
    }

    fn link_collector(&self) -> Box<dyn LinkCollector> {
        Box::new(EstateLinkCollector::default())
    }

    fn extractor_set(&self) -> ExtractorSet {
        ExtractorSet::new(vec![
            Box::new(MainInfoExtractor::new(Arc::clone(&self.main_table))),
            Box::new(GeneralInfoExtractor::new(Arc::clone(&self.general_table))),
        ])
    }
}

/// Highest number among `oldal-N` anchors
#[derive(Debug)]
pub struct PageLinkPagination {
    max_page: u32,
}

impl Default for PageLinkPagination {
    fn default() -> Self {
        Self { max_page: 1 }
    }
}

impl NodeProcessor for PageLinkPagination {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_anchor(node) && href(node).is_some_and(|h| h.contains("oldal-"))
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        match parse_page_number(&text_of(node)) {
            Ok(page) => self.max_page = self.max_page.max(page),
            Err(e) => warn!(site = SITE_NAME, "{}", e),
        }
    }
}

impl PaginationDiscoverer for PageLinkPagination {
    fn max_page(&self) -> u32 {
        self.max_page
    }

    fn page_url_format(&self) -> PageUrlTemplate {
        PageUrlTemplate::new(PAGE_SUFFIX)
    }
}

#[derive(Debug, Default)]
pub struct EstateLinkCollector {
    links: Vec<String>,
}

impl NodeProcessor for EstateLinkCollector {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_anchor(node) && RECORD_LINK_CLASSES.iter().any(|c| class_contains(node, c))
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        if let Some(link) = href(node) {
            self.links.push(link.to_string());
        }
    }
}

impl LinkCollector for EstateLinkCollector {
    fn links(&self) -> &[String] {
        &self.links
    }

    fn into_links(self: Box<Self>) -> Vec<String> {
        self.links
    }
}

/// `<li><span>Ár</span><div class="value"><b>64,9 M Ft</b></div></li>`
pub struct MainInfoExtractor {
    fields: FieldCollector,
}

impl MainInfoExtractor {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            fields: FieldCollector::new(table).deriving_price_per_area(),
        }
    }
}

impl NodeProcessor for MainInfoExtractor {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "li") && child_by_tag(node, "span").is_some() && child_by_tag(node, "div").is_some()
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        let Some(label) = child_by_tag(node, "span").map(text_of) else {
            return;
        };

        let value_cell = child_elements(node).find(|c| is_tag(*c, "div") && class_contains(*c, "value"));
        let Some(value_cell) = value_cell else {
            debug!(site = SITE_NAME, "No value cell for '{}'", label);
            return;
        };

        let value = child_by_tag(value_cell, "b").map_or_else(|| text_of(value_cell), text_of);
        self.fields.capture(&label, &value);
    }
}

impl RecordExtractor for MainInfoExtractor {
    fn contribute(&self, record: &mut Record) {
        self.fields.contribute(record);
    }
}

/// Alternating label/value `col-xs-6` cells inside `div.row.table-list-style`
pub struct GeneralInfoExtractor {
    fields: FieldCollector,
}

impl GeneralInfoExtractor {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            fields: FieldCollector::new(table),
        }
    }
}

impl NodeProcessor for GeneralInfoExtractor {
    fn matches(&self, node: ElementRef<'_>) -> bool {
        is_tag(node, "div") && class_contains(node, "row table-list-style")
    }

    fn visit(&mut self, node: ElementRef<'_>) {
        let mut pending_label: Option<String> = None;

        for cell in child_elements(node).filter(|c| class_contains(*c, "col-xs-6")) {
            if cell.children().next().is_none() {
                continue;
            }

            let text = text_of(cell);
            match pending_label.take() {
                // a blank cell cannot start a pair
                None if text.is_empty() => {}
                None => pending_label = Some(text),
                Some(label) => {
                    self.fields.capture(&label, &text);
                }
            }
        }
    }
}

impl RecordExtractor for GeneralInfoExtractor {
    fn contribute(&self, record: &mut Record) {
        self.fields.contribute(record);
    }
}
