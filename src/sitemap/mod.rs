// src/sitemap/mod.rs
// =============================================================================
// This module builds and serializes the sitemap.
//
// Submodules:
// - entry: SitemapEntry and ChangeFrequency
// - routes: the fixed pages of the site and their crawl hints
// - aggregate: combines static pages with fetched products and categories
// - xml: writes the entries in the sitemap protocol format
// =============================================================================

mod aggregate;
mod entry;
mod routes;
mod xml;

pub use aggregate::generate_sitemap;
pub use entry::SitemapEntry;
pub use routes::STATIC_ROUTES;
pub use xml::render_xml;
