//! Skin Tracker - CS2 Skin Portfolio Backend
//!
//! Serves catalog search, live price lookups and the tracked portfolio
//! for the skin tracker UI.

use clap::Parser;
use skin_tracker::cache::{ResponseCache, DEFAULT_CAPACITY, DEFAULT_TTL};
use skin_tracker::csfloat::{self, ListingsClient};
use skin_tracker::huggingface::{self, CatalogClient};
use skin_tracker::web;
use std::sync::Arc;
use std::time::Duration;

/// Skin tracker server - catalog search, live prices and portfolio API
#[derive(Parser, Debug)]
#[command(name = "skin_tracker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Port for the HTTP API
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Base URL of the skin catalog (datasets-server) API
    #[arg(long, default_value = huggingface::DEFAULT_API_BASE)]
    catalog_url: String,

    /// Base URL of the CSFloat listings API
    #[arg(long, default_value = csfloat::DEFAULT_API_BASE)]
    listings_url: String,

    /// Freshness window for cached upstream responses, in seconds
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    cache_ttl: u64,

    /// Maximum number of cached upstream responses
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    cache_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!("Starting skin_tracker...");
    log::info!("Catalog API: {}", args.catalog_url);
    log::info!("Listings API: {}", args.listings_url);

    // The CSFloat key stays server-side; requests work without one but
    // get rate limited sooner.
    let api_key = std::env::var("CSFLOAT_API_KEY").ok();
    if api_key.is_none() {
        log::warn!("CSFLOAT_API_KEY not set, listings requests will be unauthenticated");
    }

    let cache = Arc::new(ResponseCache::new(
        Duration::from_secs(args.cache_ttl),
        args.cache_capacity,
    ));
    let catalog = Arc::new(CatalogClient::new(&args.catalog_url, cache));
    let listings = Arc::new(ListingsClient::new(&args.listings_url, api_key));

    if let Err(e) = web::serve(catalog, listings, args.port).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
