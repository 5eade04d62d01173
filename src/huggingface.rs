//! Hugging Face datasets API client for the CS2 skin catalog
//!
//! The catalog lives in a dataset served page by page; there is no
//! server-side search. Pages are fetched by offset/length and normalized
//! into canonical skins. Raw page fetches go through the shared response
//! cache, so repeated reads of the same page within the freshness window
//! cost a single upstream call.

use std::sync::Arc;

use serde::Deserialize;

use crate::cache::{CacheStatus, ResponseCache};
use crate::error::{Result, TrackerError};
use crate::models::{catalog_image_url, extract_skin_name, is_stattrak, Skin};

/// Default datasets-server endpoint.
pub const DEFAULT_API_BASE: &str = "https://datasets-server.huggingface.co";

/// Dataset coordinates of the skin catalog.
pub const DATASET: &str = "While402/CounterStrike2Skins";
pub const CONFIG: &str = "metadata";
pub const SPLIT: &str = "metadata";

/// Upstream page size ceiling; longer requests get clamped.
pub const MAX_PAGE_LENGTH: usize = 100;

/// Raw catalog row as stored in the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub weapon: String,
    pub exterior: String,
    pub rarity: String,
    pub imageid: u64,
}

impl CatalogRecord {
    /// Validate one raw row against the record schema.
    fn from_row(row: serde_json::Value) -> Result<Self> {
        serde_json::from_value(row).map_err(|e| TrackerError::InvalidRecord(e.to_string()))
    }

    /// Normalize into the canonical skin shape. The StatTrak flag and the
    /// skin name are derived from the full display name.
    pub fn into_skin(self) -> Skin {
        let skin_name = extract_skin_name(&self.name);
        let stattrak = is_stattrak(&self.name);
        let image_url = catalog_image_url(self.imageid);
        Skin {
            name: self.name,
            weapon: self.weapon,
            skin_name,
            exterior: self.exterior,
            rarity: self.rarity,
            stattrak,
            image_url,
        }
    }
}

/// Rows envelope returned by the datasets server. Row payloads stay
/// untyped here; each one is validated into a `CatalogRecord` on its own
/// so a malformed row gets quarantined instead of failing the page.
#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<RowEntry>,
    num_rows_total: u64,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Value,
}

/// A paged catalog query. The field tuple doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowsQuery {
    pub dataset: String,
    pub config: String,
    pub split: String,
    pub offset: usize,
    pub length: usize,
}

impl RowsQuery {
    /// Page of the standard skin catalog.
    pub fn page(offset: usize, length: usize) -> Self {
        Self {
            dataset: DATASET.to_string(),
            config: CONFIG.to_string(),
            split: SPLIT.to_string(),
            offset,
            length: length.min(MAX_PAGE_LENGTH),
        }
    }

    /// Cache key: the exact parameter tuple.
    pub fn cache_key(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.dataset, self.config, self.split, self.offset, self.length
        )
    }

    fn to_query_string(&self) -> String {
        format!(
            "dataset={}&config={}&split={}&offset={}&length={}",
            urlencoding::encode(&self.dataset),
            urlencoding::encode(&self.config),
            urlencoding::encode(&self.split),
            self.offset,
            self.length
        )
    }
}

/// Client for the paginated skin catalog.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<ResponseCache>,
}

impl CatalogClient {
    pub fn new(base_url: &str, cache: Arc<ResponseCache>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Fetch raw rows for a query through the response cache. Returns the
    /// payload plus whether it was served from the cache.
    pub async fn fetch_rows(&self, query: &RowsQuery) -> Result<(serde_json::Value, CacheStatus)> {
        let key = query.cache_key();
        if let Some(payload) = self.cache.get(&key).await {
            log::debug!("catalog cache hit for offset {}", query.offset);
            return Ok((payload, CacheStatus::Hit));
        }

        let url = format!("{}/rows?{}", self.base_url, query.to_query_string());
        log::debug!(
            "fetching catalog rows: offset {} length {}",
            query.offset,
            query.length
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "skin_tracker/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            log::warn!("catalog request failed with status {status}");
            return Err(TrackerError::from_status(status, message));
        }

        let payload: serde_json::Value = response.json().await?;
        self.cache.insert(key, payload.clone()).await;
        Ok((payload, CacheStatus::Miss))
    }

    /// Fetch one catalog page normalized into canonical skins. Rows that
    /// fail schema validation are quarantined with a warning; the rest of
    /// the page goes through.
    pub async fn fetch_page(&self, offset: usize, length: usize) -> Result<Vec<Skin>> {
        let query = RowsQuery::page(offset, length);
        let (payload, _) = self.fetch_rows(&query).await?;
        let parsed: RowsResponse = serde_json::from_value(payload)?;

        let mut skins = Vec::with_capacity(parsed.rows.len());
        for entry in parsed.rows {
            match CatalogRecord::from_row(entry.row) {
                Ok(record) => skins.push(record.into_skin()),
                Err(e) => log::warn!("quarantined catalog row near offset {offset}: {e}"),
            }
        }
        Ok(skins)
    }

    /// Total number of records in the catalog, read from the row envelope
    /// of a single-record page.
    pub async fn total_count(&self) -> Result<u64> {
        let query = RowsQuery::page(0, 1);
        let (payload, _) = self.fetch_rows(&query).await?;
        let parsed: RowsResponse = serde_json::from_value(payload)?;
        Ok(parsed.num_rows_total)
    }
}

#[cfg(test)]
#[path = "huggingface_tests.rs"]
mod tests;
