// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - generate: build the sitemap and write it as XML (default) or JSON
// - routes:   print the fixed pages and their crawl hints
//
// Flags on `generate` override the environment variables read by
// config.rs (SITE_URL, API_URL, SITEMAP_FETCH_TIMEOUT_MS).
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "campus-sitemap",
    version,
    about = "Generates the sitemap for the campus marketplace",
    long_about = "campus-sitemap combines the marketplace's fixed pages with every product and \
                  category currently listed, and writes a sitemap search engines can crawl. \
                  If the listing service is down or slow, the sitemap still comes out with the \
                  fixed pages only."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the sitemap
    ///
    /// Example: campus-sitemap generate --base-url https://market.campus.edu -o public/sitemap.xml
    Generate {
        /// Public site URL every page URL is built from [env: SITE_URL]
        #[arg(long)]
        base_url: Option<String>,

        /// Listing service URL, serving /products and /categories [env: API_URL]
        #[arg(long)]
        api_url: Option<String>,

        /// How long each listing request may take, in milliseconds
        /// [env: SITEMAP_FETCH_TIMEOUT_MS]
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the fixed pages that are always in the sitemap
    Routes {
        /// Output the table as JSON
        #[arg(long)]
        json: bool,
    },
}

/// How the sitemap is serialized
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// sitemaps.org protocol XML
    Xml,
    /// JSON array of entries
    Json,
}
