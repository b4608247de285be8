// src/error.rs
// =============================================================================
// Typed errors for the parts of the tool that can fail.
//
// - ListingError: anything that goes wrong while reading the listing service.
//   The aggregator never lets these escape; it turns them into empty lists.
// - ConfigError: invalid configuration values (bad URLs, bad timeouts).
// - RenderError: the XML writer failed.
//
// main.rs wraps all of these in anyhow::Error with extra context.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    /// Connection, DNS or body read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered, but not with 2xx
    #[error("listing service returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body was not `{ data: { ... } }` JSON
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// No complete answer within the configured fetch timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid listing URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name} '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid fetch timeout '{0}': expected a positive number of milliseconds")]
    InvalidTimeout(String),
}

#[derive(Error, Debug)]
#[error("failed to write sitemap XML: {0}")]
pub struct RenderError(pub String);
