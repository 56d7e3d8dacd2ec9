//! Full harvest runs written through the CSV sink and read back
mod common;

use common::*;
use listing_harvester::infrastructure::config::{AppConfig, SiteConfig, SitesConfig};
use listing_harvester::infrastructure::csv_sink::{COLUMNS, CsvSink, read_records};
use tempfile::TempDir;

fn config(output: &TempDir) -> AppConfig {
    let mut config = AppConfig::for_query(query());
    config.sites = SitesConfig {
        dunahouse: SiteConfig::with_base_url(DUNAHOUSE_BASE),
        ingatlan_com: SiteConfig::with_base_url(INGATLAN_BASE),
    };
    config.sites.dunahouse.enabled = false;
    config.output.directory = output.path().to_path_buf();
    config.output.file_prefix = "test".into();
    config
}

fn fetcher() -> FakeFetcher {
    let query_url = source(ingatlan()).query_url;
    FakeFetcher::new()
        .with_page(&query_url, ingatlan_listing(1, &[]))
        .with_page(format!("{query_url}?page=1"), ingatlan_listing(1, &["/1", "/2", "/3"]))
        .with_page("https://ingatlan.test/1", ingatlan_record("Budapest, \"Gellérthegy\", Ménesi út 5.", "89,5 M Ft", "85 m²", "0"))
        .with_page("https://ingatlan.test/2", ingatlan_record("Budapest, Szentimrevárros", "54 M Ft", "nincs adat", "0"))
        .with_page("https://ingatlan.test/3", ingatlan_record("Budapest, Kelenföld", "49,9 M Ft", "48 m²", "1 200 m²"))
}

#[test]
fn harvest_writes_named_csv_that_roundtrips() {
    let output = TempDir::new().unwrap();
    let config = config(&output);
    let sink = CsvSink::new(&config.output.directory);

    let summary = tokio_test::block_on(listing_harvester::harvest(
        &config,
        fetcher().into_shared(),
        &sink,
    ))
    .unwrap();

    assert_eq!(
        summary.output_path,
        output.path().join("test_ar_30_60_meret_40_90_kerulet_XI_lakas.csv")
    );

    let content = std::fs::read_to_string(&summary.output_path).unwrap();
    assert_eq!(content.lines().next().unwrap(), COLUMNS.join(","));

    let mut written = summary.report.records.clone();
    let mut read = read_records(&summary.output_path).unwrap();
    assert_eq!(read.len(), 3);

    written.sort_by(|a, b| a.link.cmp(&b.link));
    read.sort_by(|a, b| a.link.cmp(&b.link));
    assert_eq!(read, written);

    // unparsable area is exported as the sentinel, not dropped
    let broken = read.iter().find(|r| r.link.ends_with("/2")).unwrap();
    assert_eq!(broken.house_area, -1);
    assert_eq!(broken.price_per_area, -1.0);

    let large_lot = read.iter().find(|r| r.link.ends_with("/3")).unwrap();
    assert_eq!(large_lot.lot_area, 1200);
}

#[tokio::test]
async fn empty_crawl_still_writes_header() {
    let output = TempDir::new().unwrap();
    let config = config(&output);
    let sink = CsvSink::new(&config.output.directory);

    let summary = listing_harvester::harvest(&config, FakeFetcher::new().into_shared(), &sink)
        .await
        .unwrap();

    assert!(summary.report.records.is_empty());
    assert!(read_records(&summary.output_path).unwrap().is_empty());
}

#[tokio::test]
async fn unknown_district_aborts_before_fetching() {
    let output = TempDir::new().unwrap();
    let mut config = config(&output);
    config.query.districts.push("XXV".into());

    let fetcher = FakeFetcher::new().into_shared();
    let sink = CsvSink::new(&config.output.directory);
    let result = listing_harvester::harvest(&config, fetcher.clone(), &sink).await;

    assert!(result.is_err());
    assert!(fetcher.requested().is_empty());
}
