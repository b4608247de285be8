// src/listing/model.rs
// =============================================================================
// The shapes we read from the listing service.
//
// The service answers `GET /products` with { data: { products: [...] } } and
// `GET /categories` with { data: { categories: [...] } }. We only care about
// four fields per record: an identifier, an optional slug, createdAt and an
// optional updatedAt. Everything else in the record is ignored by serde.
//
// Records are not trusted: ids can arrive as strings or numbers (or under the
// Mongo-style `_id` key), timestamps can be full date-times, bare dates or
// epoch milliseconds, and any of them can be missing or of the wrong type.
// Every field is therefore decoded as a raw serde_json::Value, so one odd
// record never makes the whole response undecodable. The helpers here return
// Option so the caller decides what to do with a record that does not have
// what it needs.
// =============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Which collection of the listing service we are reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Categories,
}

impl Collection {
    /// Path segment used both on the listing service and on the public site
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Categories => "categories",
        }
    }

    /// Identifier used in the public page URL for a record.
    ///
    /// Category pages are addressed by slug when the record has one;
    /// product pages always use the id.
    pub fn page_identifier(&self, listing: &RemoteListing) -> Option<String> {
        match self {
            Collection::Products => listing.identifier(),
            Collection::Categories => listing
                .slug
                .as_ref()
                .and_then(value_to_identifier)
                .or_else(|| listing.identifier()),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// One product or category record, as much of it as the sitemap needs
///
/// Fields stay untyped JSON until they are read through the helpers below.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteListing {
    /// Primary identifier (string or number)
    #[serde(default)]
    pub id: Option<Value>,
    /// Mongo-style `_id`, used when `id` is missing
    #[serde(default, rename = "_id")]
    pub object_id: Option<Value>,
    /// Human-readable URL key, preferred for category pages
    #[serde(default)]
    pub slug: Option<Value>,
    /// When the record was listed
    #[serde(default)]
    pub created_at: Option<Value>,
    /// When the record last changed, if ever
    #[serde(default)]
    pub updated_at: Option<Value>,
}

impl RemoteListing {
    /// The record's id as a string, from `id` or else `_id`.
    ///
    /// Numbers are accepted; empty strings, null, objects and arrays are not.
    pub fn identifier(&self) -> Option<String> {
        self.id
            .as_ref()
            .and_then(value_to_identifier)
            .or_else(|| self.object_id.as_ref().and_then(value_to_identifier))
    }

    /// updatedAt when it parses, otherwise createdAt
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .as_ref()
            .and_then(value_to_timestamp)
            .or_else(|| self.created_at.as_ref().and_then(value_to_timestamp))
    }
}

// Strings (trimmed, non-empty) and numbers make usable identifiers
fn value_to_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Strings go through parse_timestamp; integers are epoch milliseconds,
// which is what a JavaScript Date serializes to with getTime()
fn value_to_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Parses the timestamp formats the listing service is known to send.
///
/// Accepted, in order:
/// - RFC 3339 (`2024-03-05T10:15:00Z`, `2024-03-05T10:15:00.123+02:00`)
/// - date-time without offset (`2024-03-05T10:15:00`), taken as UTC
/// - bare date (`2024-03-05`), taken as midnight UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Top-level response body: { data: { products | categories: [...] } }
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingResponse {
    #[serde(default)]
    data: Option<ListingData>,
}

// Elements stay raw so a single non-object element can be skipped on its own
#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    products: Option<Vec<Value>>,
    #[serde(default)]
    categories: Option<Vec<Value>>,
}

impl ListingResponse {
    /// Pulls out the list for one collection; a missing list is an empty list.
    ///
    /// Elements that are not JSON objects (null, strings, numbers) are
    /// skipped with a warning; the rest of the list is kept.
    pub(crate) fn into_listings(self, collection: Collection) -> Vec<RemoteListing> {
        let Some(data) = self.data else {
            return Vec::new();
        };

        let raw = match collection {
            Collection::Products => data.products,
            Collection::Categories => data.categories,
        };

        raw.unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!(%collection, index, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect()
    }
}
