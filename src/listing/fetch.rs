// src/listing/fetch.rs
// =============================================================================
// This module reads products and categories from the listing service.
//
// Key functionality:
// - One GET per collection (no retries, one attempt per run)
// - Every request is bounded by a timeout; running out of time is an error
//   like any other, reported as ListingError::Timeout
// - Non-2xx responses and bodies that are not the expected JSON are errors too
//
// The client does not decide what a failure means for the sitemap. It hands
// back a Result and the aggregator chooses to degrade to an empty list.
// =============================================================================

use super::model::{Collection, ListingResponse, RemoteListing};
use crate::config::join_segments;
use crate::error::ListingError;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("campus-sitemap/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the listing service
#[derive(Debug, Clone)]
pub struct ListingClient {
    /// Shared reqwest client (connection pool reused by both fetches)
    client: Client,
    /// Listing service root, e.g. `http://localhost:5000/api`
    api_url: Url,
    /// Upper bound for one collection fetch, body included
    timeout: Duration,
}

impl ListingClient {
    /// Creates a client rooted at `api_url`; each fetch may take up to `timeout`
    pub fn new(api_url: Url, timeout: Duration) -> Result<Self, ListingError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            api_url,
            timeout,
        })
    }

    /// URL of a collection endpoint, e.g. `{api_url}/products`
    pub fn collection_url(&self, collection: Collection) -> Result<Url, ListingError> {
        join_segments(&self.api_url, &[collection.path()])
            .ok_or_else(|| ListingError::InvalidUrl(self.api_url.to_string()))
    }

    /// Fetches every record of one collection.
    ///
    /// The timeout covers the whole exchange (connect, headers and body).
    /// When it fires the in-flight request future is dropped, which cancels it.
    pub async fn fetch(&self, collection: Collection) -> Result<Vec<RemoteListing>, ListingError> {
        match tokio::time::timeout(self.timeout, self.fetch_once(collection)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ListingError::Timeout(self.timeout)),
        }
    }

    // One GET, no retries. Errors map onto ListingError variants:
    // - transport problems (DNS, refused, reset) -> Http
    // - non-2xx responses                        -> Status
    // - a body that is not the expected JSON     -> Decode
    // Malformed individual records are not errors here; into_listings skips them.
    async fn fetch_once(&self, collection: Collection) -> Result<Vec<RemoteListing>, ListingError> {
        let url = self.collection_url(collection)?;
        debug!(%url, "fetching {}", collection);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Read the body as text first so a bad payload shows up as a
        // Decode error with the serde message, not a generic HTTP error
        let body = response.text().await?;
        let parsed: ListingResponse =
            serde_json::from_str(&body).map_err(|e| ListingError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let listings = parsed.into_listings(collection);
        debug!(count = listings.len(), "received {}", collection);
        Ok(listings)
    }
}
