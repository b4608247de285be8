// src/main.rs
// =============================================================================
// This is the entry point of the campus-sitemap CLI.
//
// What happens here:
// 1. Set up logging (tracing, to stderr so stdout only carries the sitemap)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = sitemap written, 2 = error)
//
// A sitemap with only the fixed pages (because the listing service was down)
// still counts as success: the site build must not fail over it.
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - site/API URLs, timeout, environment
mod error;     // src/error.rs - typed errors
mod listing;   // src/listing/ - listing service client
mod sitemap;   // src/sitemap/ - building and serializing the sitemap

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use config::SitemapConfig;
use sitemap::SitemapEntry;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise show our own info-level messages
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("campus_sitemap=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            base_url,
            api_url,
            timeout_ms,
            format,
            output,
        } => handle_generate(base_url, api_url, timeout_ms, format, output).await,
        Commands::Routes { json } => handle_routes(json),
    }
}

// Handles the 'generate' subcommand
async fn handle_generate(
    base_url: Option<String>,
    api_url: Option<String>,
    timeout_ms: Option<u64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<i32> {
    let timeout_ms = timeout_ms.map(|ms| ms.to_string());

    // Command-line values, keyed like the environment variables they override
    let flags = |key: &str| match key {
        config::SITE_URL_VAR => base_url.clone(),
        config::API_URL_VAR => api_url.clone(),
        config::FETCH_TIMEOUT_VAR => timeout_ms.clone(),
        _ => None,
    };
    let env = |key: &str| std::env::var(key).ok();

    // Flags first, then the environment, then config.rs defaults
    let config = SitemapConfig::from_lookup(config::layered_lookup(flags, env))
        .context("invalid configuration")?;

    info!(
        site = %config.base_url,
        api = %config.api_url,
        timeout_ms = config.fetch_timeout.as_millis() as u64,
        "generating sitemap"
    );

    let entries: Vec<SitemapEntry> = sitemap::generate_sitemap(&config, Utc::now()).await;

    let body = match format {
        OutputFormat::Xml => sitemap::render_xml(&entries)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&entries)?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), urls = entries.len(), "sitemap written");
        }
        None => print!("{}", body),
    }

    Ok(0)
}

// Handles the 'routes' subcommand
fn handle_routes(json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(&sitemap::STATIC_ROUTES)?);
        return Ok(0);
    }

    println!("{:<20} {:<12} {:<8}", "PATH", "CHANGEFREQ", "PRIORITY");
    println!("{}", "=".repeat(42));

    for route in &sitemap::STATIC_ROUTES {
        println!(
            "{:<20} {:<12} {:<8.1}",
            route.path,
            route.change_frequency.as_str(),
            route.priority
        );
    }

    println!();
    println!("📋 Total: {}", sitemap::STATIC_ROUTES.len());

    Ok(0)
}
