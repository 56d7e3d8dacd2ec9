//! Listing sites
//!
//! A `ListingSite` knows how to build its query URL and hands out fresh node
//! processors for every document it is asked to read. The crawler never sees
//! the concrete site types.

pub mod dunahouse;
pub mod ingatlan_com;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::{QueryError, QueryParameters, RecordField};
use crate::infrastructure::config::SitesConfig;
use crate::infrastructure::parsing::{ExtractorSet, FieldTable, LinkCollector, PaginationDiscoverer};

pub use dunahouse::DunaHouse;
pub use ingatlan_com::IngatlanCom;

/// Capabilities the crawler needs from one listing site
pub trait ListingSite: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Base that relative record links are joined onto
    fn base_url(&self) -> &str;

    /// First listing page for `query`.
    fn query_url(&self, query: &QueryParameters) -> Result<String, QueryError>;

    fn pagination_discoverer(&self) -> Box<dyn PaginationDiscoverer>;

    fn link_collector(&self) -> Box<dyn LinkCollector>;

    /// Extractors for one record page, in contribution order
    fn extractor_set(&self) -> ExtractorSet;
}

/// Enabled sites from configuration, in a fixed order.
pub fn build_sites(config: &SitesConfig) -> Vec<Arc<dyn ListingSite>> {
    let mut sites: Vec<Arc<dyn ListingSite>> = Vec::new();

    if config.dunahouse.enabled {
        sites.push(Arc::new(DunaHouse::from_config(&config.dunahouse)));
    }
    if config.ingatlan_com.enabled {
        sites.push(Arc::new(IngatlanCom::from_config(&config.ingatlan_com)));
    }

    info!(
        "Enabled sites: {}",
        sites.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
    );
    sites
}

/// Build the two tables of a site whose main numeric block and secondary
/// block are read by different extractors. An override lands in the table
/// whose extractor owns the field.
pub(crate) fn split_tables(
    main_defaults: &[(&str, RecordField)],
    other_defaults: &[(&str, RecordField)],
    main_fields: &[RecordField],
    overrides: &HashMap<String, RecordField>,
) -> (Arc<FieldTable>, Arc<FieldTable>) {
    let (main_overrides, other_overrides): (HashMap<_, _>, HashMap<_, _>) = overrides
        .iter()
        .map(|(label, field)| (label.clone(), *field))
        .partition(|(_, field)| main_fields.contains(field));

    let main = FieldTable::from_pairs(main_defaults.iter().copied()).with_overrides(&main_overrides);
    let other = FieldTable::from_pairs(other_defaults.iter().copied()).with_overrides(&other_overrides);
    (Arc::new(main), Arc::new(other))
}
