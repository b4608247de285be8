// src/sitemap/routes.rs
// =============================================================================
// The fixed pages of the marketplace.
//
// This is a policy table: frequencies and priorities are chosen, not computed.
// The home page is the most important page (1.0), the legal pages the least
// (0.3). These routes are always in the sitemap, whatever happens to the
// listing service.
// =============================================================================

use super::entry::{ChangeFrequency, SitemapEntry};
use crate::config::join_segments;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use url::Url;

/// A page that exists independently of any listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticRoute {
    /// Site-relative path, "/" for the home page
    pub path: &'static str,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

const fn route(
    path: &'static str,
    change_frequency: ChangeFrequency,
    priority: f32,
) -> StaticRoute {
    StaticRoute {
        path,
        change_frequency,
        priority,
    }
}

pub const STATIC_ROUTES: [StaticRoute; 11] = [
    route("/", ChangeFrequency::Daily, 1.0),
    route("/products", ChangeFrequency::Daily, 0.9),
    route("/categories", ChangeFrequency::Weekly, 0.8),
    route("/sell", ChangeFrequency::Weekly, 0.7),
    route("/how-it-works", ChangeFrequency::Monthly, 0.6),
    route("/about", ChangeFrequency::Monthly, 0.5),
    route("/faq", ChangeFrequency::Monthly, 0.5),
    route("/help", ChangeFrequency::Monthly, 0.5),
    route("/contact", ChangeFrequency::Yearly, 0.4),
    route("/privacy", ChangeFrequency::Yearly, 0.3),
    route("/terms", ChangeFrequency::Yearly, 0.3),
];

impl StaticRoute {
    /// Absolute URL of this route under `base`
    ///
    /// The home route is the base URL exactly as configured.
    pub fn url(&self, base: &Url) -> Option<Url> {
        let segments: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        join_segments(base, &segments)
    }
}

/// Sitemap entries for every static route, stamped with `generated_at`
pub fn static_entries(base: &Url, generated_at: DateTime<Utc>) -> Vec<SitemapEntry> {
    STATIC_ROUTES
        .iter()
        .filter_map(|route| {
            let Some(url) = route.url(base) else {
                warn!(path = route.path, %base, "cannot build static route URL");
                return None;
            };

            Some(SitemapEntry {
                url: url.to_string(),
                last_modified: generated_at,
                change_frequency: route.change_frequency,
                priority: route.priority,
            })
        })
        .collect()
}
