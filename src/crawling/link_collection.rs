//! Pagination-then-link protocol
//!
//! Page 1 of a query is read once by the site's pagination discoverer. Every
//! page from 1 to the discovered maximum is then fetched in order and read by
//! a fresh link collector. A page that cannot be fetched contributes no links
//! and the loop moves on.

use tracing::{debug, info, warn};

use super::{parse_page, usable_page};
use crate::infrastructure::http_client::{FetchedPage, PageFetcher};
use crate::infrastructure::parsing::traverse;
use crate::infrastructure::url_utils::{PageUrlTemplate, resolve_record_link};
use crate::sites::ListingSite;

/// Absolute record URLs for `query_url`, in page order then document order.
/// No deduplication is done here.
pub async fn collect_record_links(
    fetcher: &dyn PageFetcher,
    site: &dyn ListingSite,
    query_url: &str,
) -> Vec<String> {
    let Some(first_page) = usable_page(fetcher.fetch(query_url).await) else {
        warn!(site = site.name(), url = query_url, "Pagination discovery failed, no links collected");
        return Vec::new();
    };

    let (max_page, template) = discover_pagination(site, &first_page);
    info!(site = site.name(), "Found {} page(s) of listings", max_page);

    let mut links = Vec::new();
    for page_number in 1..=max_page {
        let page_url = template.url_for(query_url, page_number);
        debug!(site = site.name(), url = %page_url, "Reading listing page");

        let Some(page) = usable_page(fetcher.fetch(&page_url).await) else {
            continue;
        };

        let page_links = links_on_page(site, &page);
        debug!(site = site.name(), page = page_number, count = page_links.len(), "Collected links");
        links.extend(page_links);
    }

    info!(site = site.name(), "Collected {} record link(s)", links.len());
    links
}

fn discover_pagination(site: &dyn ListingSite, page: &FetchedPage) -> (u32, PageUrlTemplate) {
    let document = parse_page(page);
    let mut discoverer = site.pagination_discoverer();
    traverse(document.root_element(), discoverer.as_mut());
    (discoverer.max_page(), discoverer.page_url_format())
}

fn links_on_page(site: &dyn ListingSite, page: &FetchedPage) -> Vec<String> {
    let document = parse_page(page);
    let mut collector = site.link_collector();
    traverse(document.root_element(), collector.as_mut());

    collector
        .into_links()
        .into_iter()
        .map(|link| resolve_record_link(site.base_url(), &link))
        .collect()
}
