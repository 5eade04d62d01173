//! CSFloat listings API client
//!
//! Two capabilities: exact-name price lookups (cheapest current offer)
//! and a fallback substring search over the most-recent listings window.
//! CSFloat has no native free-text search, so the fallback fetches one
//! fixed window and filters client-side. Coverage of that window is
//! reported back to the caller instead of being papered over.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::models::{
    cents_to_dollars, extract_exterior, extract_skin_name, is_stattrak, steam_image_url,
    strip_stattrak, PriceQuote, Skin, PLACEHOLDER_IMAGE,
};
use crate::search::MIN_TERM_LEN;

/// Default listings endpoint.
pub const DEFAULT_API_BASE: &str = "https://csfloat.com/api/v1";

/// Fixed most-recent window scanned by the fallback search.
pub const RECENT_WINDOW: usize = 50;

/// Sort orders accepted by the listings endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    LowestPrice,
    MostRecent,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::LowestPrice => "lowest_price",
            SortBy::MostRecent => "most_recent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "lowest_price" => Some(SortBy::LowestPrice),
            "most_recent" => Some(SortBy::MostRecent),
            _ => None,
        }
    }
}

/// A live marketplace listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub id: String,
    /// Asking price in cents
    pub price: i64,
    pub item: ListingItem,
}

/// Item metadata attached to a listing. Everything beyond the market
/// hash name is optional; upstream omits fields for some item classes.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingItem {
    pub market_hash_name: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub wear_name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub rarity: Option<i64>,
    #[serde(default)]
    pub scm: Option<ScmPrice>,
}

/// Steam Community Market reference attached to some listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScmPrice {
    /// Reference price in cents
    pub price: i64,
    #[serde(default)]
    pub volume: Option<i64>,
}

impl Listing {
    /// Convert to the canonical skin shape. StatTrak and the skin name
    /// come from the market hash name; the exterior prefers the wear
    /// name and falls back to the trailing parenthetical.
    pub fn to_skin(&self) -> Skin {
        let full = &self.item.market_hash_name;
        let bare = strip_stattrak(full);
        let weapon = bare.split(" | ").next().unwrap_or(bare).to_string();
        let skin_name = extract_skin_name(bare);
        let exterior = self
            .item
            .wear_name
            .clone()
            .or_else(|| extract_exterior(full))
            .unwrap_or_default();
        let rarity = self
            .item
            .rarity
            .map(|r| format!("Rarity {r}"))
            .unwrap_or_default();
        let image_url = self
            .item
            .icon_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(steam_image_url)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Skin {
            name: full.clone(),
            weapon,
            skin_name,
            exterior,
            rarity,
            stattrak: is_stattrak(full),
            image_url,
        }
    }
}

/// The listings endpoint answers either a bare array or a `data` wrapper
/// depending on the query; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingsPayload {
    Bare(Vec<Listing>),
    Wrapped { data: Vec<Listing> },
}

impl ListingsPayload {
    fn into_vec(self) -> Vec<Listing> {
        match self {
            ListingsPayload::Bare(listings) => listings,
            ListingsPayload::Wrapped { data } => data,
        }
    }
}

/// Query parameters forwarded to the listings endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingsQuery {
    pub market_hash_name: Option<String>,
    pub limit: Option<usize>,
    pub sort_by: Option<SortBy>,
}

impl ListingsQuery {
    fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.market_hash_name {
            parts.push(format!("market_hash_name={}", urlencoding::encode(name)));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(sort) = self.sort_by {
            parts.push(format!("sort_by={}", sort.as_str()));
        }
        parts.join("&")
    }
}

/// Outcome of one fallback search pass. `scanned` and `window` say how
/// much of the listings stream was actually inspected, so callers can
/// tell "no matches" apart from "window too small".
#[derive(Debug, Clone, Serialize)]
pub struct FallbackSearch {
    pub items: Vec<Skin>,
    /// Listings inspected in this pass
    pub scanned: usize,
    /// Fixed most-recent window requested
    pub window: usize,
}

impl FallbackSearch {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            scanned: 0,
            window: RECENT_WINDOW,
        }
    }
}

/// Client for the CSFloat listings API. The API key, when present, goes
/// out as the Authorization header on every request and never leaves
/// the server side.
pub struct ListingsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ListingsClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Raw listings passthrough used by the proxy route. Non-success
    /// statuses become errors carrying the upstream status.
    pub async fn forward(&self, query: &ListingsQuery) -> Result<serde_json::Value> {
        let query_string = query.to_query_string();
        let url = if query_string.is_empty() {
            format!("{}/listings", self.base_url)
        } else {
            format!("{}/listings?{query_string}", self.base_url)
        };

        let mut request = self
            .client
            .get(&url)
            .header("User-Agent", "skin_tracker/1.0");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            log::warn!("listings request failed with status {status}");
            return Err(TrackerError::from_status(status, message));
        }

        Ok(response.json().await?)
    }

    /// Typed listings fetch, accepting both payload shapes.
    pub async fn fetch_listings(&self, query: &ListingsQuery) -> Result<Vec<Listing>> {
        let payload = self.forward(query).await?;
        let parsed: ListingsPayload = serde_json::from_value(payload)?;
        Ok(parsed.into_vec())
    }

    /// Cheapest current offer for an exact market hash name. This never
    /// fails: missing listings and upstream errors both resolve to a
    /// no-data quote, keeping "no price" an ordinary outcome.
    pub async fn price_quote(&self, market_hash_name: &str) -> PriceQuote {
        let query = ListingsQuery {
            market_hash_name: Some(market_hash_name.to_string()),
            limit: Some(1),
            sort_by: Some(SortBy::LowestPrice),
        };

        let listings = match self.fetch_listings(&query).await {
            Ok(listings) => listings,
            Err(e) => {
                log::warn!("price lookup failed for \"{market_hash_name}\": {e}");
                return PriceQuote::no_data();
            }
        };

        let Some(cheapest) = listings.first() else {
            log::debug!("no current listings for \"{market_hash_name}\"");
            return PriceQuote::no_data();
        };

        PriceQuote {
            lowest_price: Some(cents_to_dollars(cheapest.price)),
            steam_price: cheapest
                .item
                .scm
                .as_ref()
                .map(|scm| cents_to_dollars(scm.price)),
            has_data: true,
        }
    }

    /// Fallback substring search over the most-recent listings window.
    /// One page, client-side filter over market hash name and item name,
    /// deduplicated by market hash name with the first occurrence kept.
    /// Terms shorter than the search minimum return empty without any
    /// upstream call, and upstream failures degrade to an empty result.
    pub async fn search_recent(&self, term: &str, limit: usize) -> FallbackSearch {
        let needle = term.trim().to_lowercase();
        if needle.chars().count() < MIN_TERM_LEN {
            return FallbackSearch::empty();
        }

        let query = ListingsQuery {
            market_hash_name: None,
            limit: Some(RECENT_WINDOW),
            sort_by: Some(SortBy::MostRecent),
        };

        let listings = match self.fetch_listings(&query).await {
            Ok(listings) => listings,
            Err(e) => {
                log::warn!("fallback search failed for \"{term}\": {e}");
                return FallbackSearch::empty();
            }
        };

        let scanned = listings.len();
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for listing in &listings {
            let market_name = listing.item.market_hash_name.to_lowercase();
            let item_name = listing
                .item
                .item_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            if !market_name.contains(&needle) && !item_name.contains(&needle) {
                continue;
            }
            if !seen.insert(listing.item.market_hash_name.clone()) {
                continue;
            }
            items.push(listing.to_skin());
            if items.len() >= limit {
                break;
            }
        }

        log::debug!(
            "fallback search for \"{term}\": {} unique of {scanned} scanned",
            items.len()
        );

        FallbackSearch {
            items,
            scanned,
            window: RECENT_WINDOW,
        }
    }
}

#[cfg(test)]
#[path = "csfloat_tests.rs"]
mod tests;
