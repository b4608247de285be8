// src/sitemap/entry.rs
// =============================================================================
// The records a sitemap is made of.
//
// A SitemapEntry is one URL plus the hints crawlers use to schedule it:
// when it last changed, how often it is expected to change and how important
// it is compared to the rest of the site.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a page is expected to change (a crawler hint, not a promise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// Changes on every visit (live pages)
    Always,
    Hourly,
    /// Product pages
    Daily,
    /// Category pages
    Weekly,
    Monthly,
    /// Legal and contact pages
    Yearly,
    /// Archived content that will not change again
    Never,
}

impl ChangeFrequency {
    /// The value as written in `<changefreq>`
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// Absolute page URL, unique within one sitemap
    pub url: String,
    /// When the page content last changed (updatedAt, else createdAt;
    /// generation time for the fixed pages)
    pub last_modified: DateTime<Utc>,
    /// Crawler hint for how often to come back
    pub change_frequency: ChangeFrequency,
    /// 0.0 to 1.0, relative to the other pages of the site
    pub priority: f32,
}
