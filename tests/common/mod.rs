//! Shared fixtures for integration tests: an in-memory fetcher and small
//! HTML builders for both sites.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use listing_harvester::crawling::CrawlSource;
use listing_harvester::domain::{PropertyType, QueryParameters};
use listing_harvester::infrastructure::config::SiteConfig;
use listing_harvester::infrastructure::http_client::{FetchError, FetchedPage, PageFetcher};
use listing_harvester::sites::{DunaHouse, IngatlanCom, ListingSite};

pub const INGATLAN_BASE: &str = "https://ingatlan.test/";
pub const DUNAHOUSE_BASE: &str = "https://dh.test/";

/// Serves registered bodies; unregistered URLs answer 404
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, (u16, String)>,
    failing: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), (200, body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), (status, String::new()));
        self
    }

    /// Requests to `url` fail as if they timed out
    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.failing.contains(url) {
            return Err(FetchError::transport(url, "operation timed out"));
        }

        let (status, body) = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

pub fn query() -> QueryParameters {
    QueryParameters {
        districts: vec!["XI".into()],
        min_price: 30,
        max_price: 60,
        min_size: 40,
        max_size: 90,
        property_type: PropertyType::Flat,
    }
}

pub fn ingatlan() -> Arc<dyn ListingSite> {
    Arc::new(IngatlanCom::from_config(&SiteConfig::with_base_url(INGATLAN_BASE)))
}

pub fn dunahouse() -> Arc<dyn ListingSite> {
    Arc::new(DunaHouse::from_config(&SiteConfig::with_base_url(DUNAHOUSE_BASE)))
}

pub fn source(site: Arc<dyn ListingSite>) -> CrawlSource {
    CrawlSource::for_query(site, &query()).unwrap()
}

pub fn ingatlan_listing(total_pages: u32, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<div class="listing"><a class="listing__link" href="{l}">Megnézem</a></div>"#))
        .collect();
    format!(
        r#"<html><body>{anchors}
            <div class="pagination"><div class="pagination__page-number">1 / {total_pages} oldal</div></div>
        </body></html>"#
    )
}

pub fn ingatlan_record(address: &str, price: &str, house_area: &str, lot_area: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="address">{address}</h1>
            <div class="parameters">
                <div><a href="/hitel">Hitelre van szükséged? Kalkulálj!</a>
                     <div class="parameterValues"><span>{price}</span></div></div>
                <div><div class="parameterTitle">Alapterület</div>
                     <div class="parameterValues"><span>{house_area}</span></div></div>
                <div><div class="parameterTitle">Telekterület</div>
                     <div class="parameterValues"><span>{lot_area}</span></div></div>
                <div><div class="parameterTitle">Szobák</div>
                     <div class="parameterValues"><span>3</span></div></div>
            </div>
            <dl>
                <div><dt class="parameterName">Ingatlan állapota</dt><dd class="parameterValue">jó állapotú</dd></div>
                <div><dt class="parameterName">Fűtés</dt><dd class="parameterValue">távfűtés</dd></div>
            </dl>
        </body></html>"#
    )
}

pub fn dunahouse_listing(max_page: u32, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a class="listEstateWithPicOnPicture" href="{l}">kép</a>"#))
        .collect();
    let pager: String = (1..=max_page)
        .map(|p| format!(r#"<li><a href="/elado-ingatlan/lakas/-/oldal-{p}">{p}</a></li>"#))
        .collect();
    format!(r#"<html><body>{anchors}<ul class="pagination">{pager}</ul></body></html>"#)
}

pub fn dunahouse_record(address: &str, price: &str, house_area: &str, lot_area: &str) -> String {
    format!(
        r#"<html><body>
            <ul>
                <li><span>Ár</span><div class="value"><b>{price}</b></div></li>
                <li><span>Méret</span><div class="value">{house_area}</div></li>
                <li><span>Szoba</span><div class="value">2 szoba</div></li>
            </ul>
            <div class="row table-list-style">
                <div class="col-xs-6">Cím:</div><div class="col-xs-6">{address}</div>
                <div class="col-xs-6">Telek mérete:</div><div class="col-xs-6">{lot_area}</div>
            </div>
        </body></html>"#
    )
}
