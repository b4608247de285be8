// src/sitemap/aggregate.rs
// =============================================================================
// This module assembles the full sitemap.
//
// How it works:
// 1. Build entries for the fixed pages (routes.rs)
// 2. Fetch products and categories from the listing service at the same time
// 3. Turn every usable record into an entry under /products or /categories
// 4. Concatenate static + products + categories and drop duplicate URLs
//
// Failure policy:
// The sitemap must always come out. If a collection cannot be fetched
// (network error, bad status, bad body, timeout) that collection contributes
// zero entries and everything else is unaffected. Nothing is retried.
// =============================================================================

use super::entry::{ChangeFrequency, SitemapEntry};
use super::routes::static_entries;
use crate::config::{join_segments, SitemapConfig};
use crate::error::ListingError;
use crate::listing::{Collection, ListingClient, RemoteListing};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// The sitemap protocol allows at most this many URLs in one file
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

/// Change frequency and priority for pages generated from a collection
///
/// Products change often (price, availability) so they are hinted daily;
/// category pages mostly change when products move in or out.
pub fn collection_policy(collection: Collection) -> (ChangeFrequency, f32) {
    match collection {
        Collection::Products => (ChangeFrequency::Daily, 0.8),
        Collection::Categories => (ChangeFrequency::Weekly, 0.7),
    }
}

/// Builds the complete sitemap for one run.
///
/// Never fails: listing-service problems shrink the output, they don't abort it.
/// `generated_at` is the lastModified stamp of the static pages.
pub async fn generate_sitemap(
    config: &SitemapConfig,
    generated_at: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let mut entries = static_entries(&config.base_url, generated_at);
    let static_count = entries.len();

    // A client that cannot even be built (TLS backend init) is treated like
    // both fetches failing: static pages only
    let client = ListingClient::new(config.api_url.clone(), config.fetch_timeout);
    let (products, categories) = match client {
        Ok(client) => {
            // Fan out to both collections, wait for both
            futures::join!(
                fetch_or_empty(&client, Collection::Products, config),
                fetch_or_empty(&client, Collection::Categories, config),
            )
        }
        Err(e) => {
            report_failure(config, "listing client", &e);
            (Vec::new(), Vec::new())
        }
    };

    // Each collection is converted on its own, so a bad record in one
    // cannot affect the other
    let product_entries = listing_entries(&config.base_url, Collection::Products, &products);
    let category_entries =
        listing_entries(&config.base_url, Collection::Categories, &categories);

    info!(
        static_pages = static_count,
        products = product_entries.len(),
        categories = category_entries.len(),
        "sitemap assembled"
    );

    entries.extend(product_entries);
    entries.extend(category_entries);

    let entries = dedupe_by_url(entries);

    if entries.len() > MAX_URLS_PER_SITEMAP {
        warn!(
            urls = entries.len(),
            limit = MAX_URLS_PER_SITEMAP,
            "sitemap exceeds the protocol limit; crawlers may ignore the tail"
        );
    }

    entries
}

// Fetches one collection; any failure becomes an empty list
//
// This is the one place where a ListingError is swallowed. The match keeps
// the substitution visible: Ok passes the records through, Err is reported
// and replaced by an empty Vec so the caller never sees an error.
async fn fetch_or_empty(
    client: &ListingClient,
    collection: Collection,
    config: &SitemapConfig,
) -> Vec<RemoteListing> {
    match client.fetch(collection).await {
        Ok(listings) => listings,
        Err(e) => {
            report_failure(config, collection.path(), &e);
            Vec::new()
        }
    }
}

// Outside production a failed fetch is worth a warning;
// in production it is expected noise and only shows up at debug level
fn report_failure(config: &SitemapConfig, what: &str, error: &ListingError) {
    if config.production {
        debug!(error = %error, "sitemap: {} unavailable, skipping", what);
    } else {
        warn!(error = %error, "sitemap: {} unavailable, skipping", what);
    }
}

/// Entries for the records of one collection, in the order they were received.
///
/// Records without an identifier or without a usable timestamp are skipped
/// instead of producing broken URLs.
pub fn listing_entries(
    base: &Url,
    collection: Collection,
    listings: &[RemoteListing],
) -> Vec<SitemapEntry> {
    let (change_frequency, priority) = collection_policy(collection);
    let mut entries = Vec::with_capacity(listings.len());

    for (index, listing) in listings.iter().enumerate() {
        // "." and ".." would be swallowed as path segments and point the
        // entry at the collection page itself
        let Some(identifier) = collection
            .page_identifier(listing)
            .filter(|id| id != "." && id != "..")
        else {
            warn!(%collection, index, "skipping record without a usable identifier");
            continue;
        };

        let Some(last_modified) = listing.last_modified() else {
            warn!(
                %collection,
                %identifier,
                "skipping record without a valid createdAt/updatedAt"
            );
            continue;
        };

        let Some(url) = join_segments(base, &[collection.path(), identifier.as_str()]) else {
            warn!(%collection, %identifier, %base, "cannot build page URL");
            continue;
        };

        entries.push(SitemapEntry {
            url: url.to_string(),
            last_modified,
            change_frequency,
            priority,
        });
    }

    entries
}

/// Keeps the first entry for every URL, preserving order
///
/// Static pages come first, so a listing that happens to collide with a
/// fixed route never replaces the fixed route's crawl hints.
pub fn dedupe_by_url(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::new();
    let before = entries.len();

    let unique: Vec<SitemapEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.url.clone()))
        .collect();

    if unique.len() < before {
        debug!(dropped = before - unique.len(), "removed duplicate sitemap URLs");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const BASE_URL: &str = "https://shop.test";

    fn config_for(api_url: &str, timeout: Duration) -> SitemapConfig {
        SitemapConfig::new(BASE_URL, api_url, timeout, false).unwrap()
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    async fn mount_json(server: &MockServer, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_one_product_no_categories() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/api/products",
            json!({"data": {"products": [{"id": "p1", "createdAt": "2024-01-01"}]}}),
        )
        .await;
        mount_json(&server, "/api/categories", json!({"data": {"categories": []}})).await;

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_secs(2));
        let entries = generate_sitemap(&config, generated_at()).await;

        assert_eq!(entries.len(), 12);
        let product = &entries[11];
        assert_eq!(product.url, "https://shop.test/products/p1");
        assert_eq!(product.priority, 0.8);
        assert_eq!(product.change_frequency, ChangeFrequency::Daily);
        assert_eq!(
            product.last_modified,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_both_fetches_fail_gives_static_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_secs(2));
        let entries = generate_sitemap(&config, generated_at()).await;

        assert_eq!(entries.len(), 11);
        assert!(entries.iter().all(|e| e.last_modified == generated_at()));
    }

    #[tokio::test]
    async fn test_unreachable_service_gives_static_only() {
        let config = config_for("http://127.0.0.1:9/api", Duration::from_secs(2));
        let entries = generate_sitemap(&config, generated_at()).await;
        assert_eq!(entries.len(), 11);
    }

    #[tokio::test]
    async fn test_product_timeout_keeps_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "data": {"products": [{"id": "p1", "createdAt": "2024-01-01"}]}
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        mount_json(
            &server,
            "/api/categories",
            json!({
                "data": {"categories": [{"id": "c1", "slug": "books", "createdAt": "2024-01-01"}]}
            }),
        )
        .await;

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_millis(300));
        let entries = generate_sitemap(&config, generated_at()).await;

        assert_eq!(entries.len(), 12);
        assert!(!entries.iter().any(|e| e.url.contains("/products/")));
        let category = &entries[11];
        assert_eq!(category.url, "https://shop.test/categories/books");
        assert_eq!(category.change_frequency, ChangeFrequency::Weekly);
        assert_eq!(category.priority, 0.7);
    }

    #[tokio::test]
    async fn test_odd_records_do_not_drop_their_collection() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/api/products",
            json!({"data": {"products": [
                {"id": "p1", "createdAt": "2024-01-01"},
                {"id": "p2", "createdAt": 1704067200000_i64},
                {"id": "p3", "createdAt": true},
                null
            ]}}),
        )
        .await;
        mount_json(
            &server,
            "/api/categories",
            json!({"data": {"categories": [
                {"id": "c1", "slug": 7, "createdAt": "2024-01-01"},
                "not-a-record",
                {"id": "c2", "createdAt": "2024-01-01"}
            ]}}),
        )
        .await;

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_secs(2));
        let entries = generate_sitemap(&config, generated_at()).await;

        let tail: Vec<&str> = entries[11..].iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            tail,
            vec![
                "https://shop.test/products/p1",
                "https://shop.test/products/p2",
                "https://shop.test/categories/7",
                "https://shop.test/categories/c2",
            ]
        );
        assert_eq!(
            entries[12].last_modified,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_ordering_static_products_categories() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/api/products",
            json!({"data": {"products": [
                {"id": "p1", "createdAt": "2024-01-01"},
                {"id": "p2", "createdAt": "2024-01-02"}
            ]}}),
        )
        .await;
        mount_json(
            &server,
            "/api/categories",
            json!({"data": {"categories": [
                {"id": "c1", "createdAt": "2024-01-01"},
                {"id": "c2", "createdAt": "2024-01-01"}
            ]}}),
        )
        .await;

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_secs(2));
        let entries = generate_sitemap(&config, generated_at()).await;

        let tail: Vec<&str> = entries[11..].iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            tail,
            vec![
                "https://shop.test/products/p1",
                "https://shop.test/products/p2",
                "https://shop.test/categories/c1",
                "https://shop.test/categories/c2",
            ]
        );

        // Same input, same output
        let again = generate_sitemap(&config, generated_at()).await;
        assert_eq!(entries, again);
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let server = MockServer::start().await;
        for (route, key) in [("/api/products", "products"), ("/api/categories", "categories")] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"data": {key: []}}))
                        .set_delay(Duration::from_millis(700)),
                )
                .mount(&server)
                .await;
        }

        let config = config_for(&format!("{}/api", server.uri()), Duration::from_secs(5));
        let started = Instant::now();
        let entries = generate_sitemap(&config, generated_at()).await;

        assert_eq!(entries.len(), 11);
        assert!(started.elapsed() < Duration::from_millis(1300));
    }

    #[test]
    fn test_last_modified_prefers_updated_at() {
        let base = Url::parse(BASE_URL).unwrap();
        let listings: Vec<RemoteListing> = serde_json::from_value(json!([
            {"id": "p1", "createdAt": "2024-01-01", "updatedAt": "2024-03-01"},
            {"id": "p2", "createdAt": "2024-01-01"}
        ]))
        .unwrap();

        let entries = listing_entries(&base, Collection::Products, &listings);
        let march = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let january = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(entries[0].last_modified, march);
        assert_eq!(entries[1].last_modified, january);
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let base = Url::parse(BASE_URL).unwrap();
        let listings: Vec<RemoteListing> = serde_json::from_value(json!([
            {"createdAt": "2024-01-01"},
            {"id": "", "createdAt": "2024-01-01"},
            {"id": "..", "createdAt": "2024-01-01"},
            {"id": "p3"},
            {"id": "p4", "createdAt": "not a date"},
            {"id": "p5", "createdAt": "2024-01-01"}
        ]))
        .unwrap();

        let entries = listing_entries(&base, Collection::Products, &listings);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://shop.test/products/p5");
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let base = Url::parse(BASE_URL).unwrap();
        let listings: Vec<RemoteListing> = serde_json::from_value(json!([
            {"id": "p1", "createdAt": "2024-01-01"},
            {"id": "p1", "createdAt": "2024-05-05"}
        ]))
        .unwrap();

        let entries = dedupe_by_url(listing_entries(&base, Collection::Products, &listings));
        assert_eq!(entries.len(), 1);
        let first_seen = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(entries[0].last_modified, first_seen);
    }
}
