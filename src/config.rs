// src/config.rs
// =============================================================================
// Configuration for a sitemap run.
//
// Everything the generator needs from the outside world lives in one struct,
// SitemapConfig, which is built once in main.rs and passed down by reference.
// Nothing below main.rs reads environment variables directly, so tests can
// build a config pointing at a fake listing service.
//
// Sources, highest priority first:
// 1. Command-line flags (main.rs feeds them in through the lookup closure)
// 2. Environment variables (SITE_URL, API_URL, SITEMAP_FETCH_TIMEOUT_MS, APP_ENV)
// 3. The defaults below
// =============================================================================

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const SITE_URL_VAR: &str = "SITE_URL";
pub const API_URL_VAR: &str = "API_URL";
pub const FETCH_TIMEOUT_VAR: &str = "SITEMAP_FETCH_TIMEOUT_MS";
pub const APP_ENV_VAR: &str = "APP_ENV";

pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Public site root every sitemap URL is built from
    pub base_url: Url,
    /// Root of the listing service (products and categories live under it)
    pub api_url: Url,
    /// How long each collection fetch may take before it counts as failed
    pub fetch_timeout: Duration,
    /// In production, fetch failures are only logged at debug level
    pub production: bool,
}

impl SitemapConfig {
    /// Builds a config from explicit values.
    pub fn new(
        base_url: &str,
        api_url: &str,
        fetch_timeout: Duration,
        production: bool,
    ) -> Result<Self, ConfigError> {
        if fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        Ok(Self {
            base_url: parse_http_url("site URL", base_url)?,
            api_url: parse_http_url("API URL", api_url)?,
            fetch_timeout,
            production,
        })
    }

    /// Reads the config through any key -> value lookup.
    ///
    /// main.rs passes a `layered_lookup` of command-line flags over the process
    /// environment; tests pass a plain map.
    ///
    /// Empty values count as unset, so `SITE_URL=` falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get(SITE_URL_VAR).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let api_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let fetch_timeout = match get(FETCH_TIMEOUT_VAR) {
            Some(raw) => parse_timeout_ms(&raw)?,
            None => Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        };

        let production = get(APP_ENV_VAR)
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Self::new(base_url.trim(), api_url.trim(), fetch_timeout, production)
    }
}

/// Combines two lookups: `flags` first, `env` for anything a flag left unset.
///
/// A flag given as an empty string counts as unset. main.rs passes the
/// command-line values as `flags` and the process environment as `env`.
pub fn layered_lookup<F, E>(flags: F, env: E) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
    E: Fn(&str) -> Option<String>,
{
    move |key: &str| {
        flags(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| env(key))
    }
}

// Parses a millisecond count like "2500" into a Duration
fn parse_timeout_ms(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

// Only absolute http(s) URLs with a host make sense as a site or API root
fn parse_http_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// Appends path segments to a base URL, percent-encoding each one.
///
/// A trailing slash on the base is ignored, so both `https://shop.test` and
/// `https://shop.test/` give `https://shop.test/products/p1`.
/// With no segments the base path is returned as configured, trailing slash
/// included. Returns None for URLs that cannot carry a path (e.g. `mailto:`).
pub fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if segments.is_empty() {
        return Some(url);
    }
    {
        let mut path = url.path_segments_mut().ok()?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Some(url)
}
