//! Batched free-text search over the paginated catalog
//!
//! The catalog upstream has no server-side search, so a query walks the
//! dataset page by page and filters client-side. This is a workaround
//! for a non-searchable backend, and it cannot see past its scan
//! ceiling; a real fix would index a periodically refreshed catalog
//! snapshot locally. Until then the scan policies bound the cost: fixed
//! pages of 100, at most 50 batches per query, an early stop once
//! enough matches accumulate, and a short pause between batches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::TrackerError;
use crate::huggingface::CatalogClient;
use crate::models::Skin;

/// Minimum term length; shorter terms return empty without a call.
pub const MIN_TERM_LEN: usize = 3;

/// Catalog page size per batch (the upstream maximum).
pub const BATCH_SIZE: usize = 100;

/// Scan ceiling per query. Records past `MAX_BATCHES * BATCH_SIZE` are
/// unreachable by search.
pub const MAX_BATCHES: usize = 50;

/// Stop scanning once this many matches have accumulated, trading
/// completeness for latency.
pub const EARLY_STOP: usize = 30;

/// Batches fetched back to back before the longer pause kicks in.
const FAST_BATCH_COUNT: usize = 20;

const EARLY_BATCH_DELAY: Duration = Duration::from_millis(100);
const LATE_BATCH_DELAY: Duration = Duration::from_millis(200);

/// Result of one search call. `generation` supports latest-wins at the
/// call site: apply an outcome only while it is still the newest one
/// issued.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub generation: u64,
    pub items: Vec<Skin>,
    /// Non-empty catalog pages processed during the scan
    pub batches: usize,
    /// True when a rate limit cut the scan short with partial results
    pub partial: bool,
}

/// Free-text search over the paginated catalog.
pub struct SearchEngine {
    catalog: Arc<CatalogClient>,
    generation: AtomicU64,
}

impl SearchEngine {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self {
            catalog,
            generation: AtomicU64::new(0),
        }
    }

    /// Newest generation issued so far.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True while `generation` belongs to the most recently issued search.
    pub fn is_latest(&self, generation: u64) -> bool {
        generation == self.latest_generation()
    }

    /// Scan the catalog for skins whose full name, weapon, or skin name
    /// contains `term`, case-insensitively. Matches keep catalog order;
    /// there is no relevance ranking. Every call rescans from offset 0.
    ///
    /// A rate limit mid-scan returns the matches accumulated so far. Any
    /// other upstream failure returns an empty outcome. Neither case
    /// surfaces an error to the caller.
    pub async fn search(&self, term: &str, limit: usize) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let needle = term.trim().to_lowercase();

        if needle.chars().count() < MIN_TERM_LEN {
            log::debug!("search #{generation}: term too short, skipping scan");
            return SearchOutcome {
                generation,
                items: Vec::new(),
                batches: 0,
                partial: false,
            };
        }

        log::info!(
            "search #{generation}: scanning up to {} records for \"{needle}\"",
            MAX_BATCHES * BATCH_SIZE
        );

        let mut matches: Vec<Skin> = Vec::new();
        let mut offset = 0;
        let mut batches = 0;
        let mut partial = false;

        while matches.len() < limit && batches < MAX_BATCHES {
            let page = match self.catalog.fetch_page(offset, BATCH_SIZE).await {
                Ok(page) => page,
                Err(TrackerError::RateLimited) => {
                    log::warn!(
                        "search #{generation}: rate limited, keeping {} partial matches",
                        matches.len()
                    );
                    partial = true;
                    break;
                }
                Err(e) => {
                    log::error!("search #{generation}: batch {} failed: {e}", batches + 1);
                    return SearchOutcome {
                        generation,
                        items: Vec::new(),
                        batches,
                        partial: false,
                    };
                }
            };

            if page.is_empty() {
                log::debug!("search #{generation}: end of catalog at offset {offset}");
                break;
            }

            matches.extend(page.into_iter().filter(|skin| matches_term(skin, &needle)));
            offset += BATCH_SIZE;
            batches += 1;

            if matches.len() >= limit {
                break;
            }
            if matches.len() >= EARLY_STOP {
                log::debug!(
                    "search #{generation}: early stop with {} matches after {batches} batches",
                    matches.len()
                );
                break;
            }
            if batches < MAX_BATCHES {
                tokio::time::sleep(batch_delay(batches)).await;
            }
        }

        matches.truncate(limit);
        log::info!(
            "search #{generation}: {} matches after {batches} batches",
            matches.len()
        );

        SearchOutcome {
            generation,
            items: matches,
            batches,
            partial,
        }
    }
}

/// Substring match across full name, weapon, and skin name.
fn matches_term(skin: &Skin, needle: &str) -> bool {
    skin.name.to_lowercase().contains(needle)
        || skin.weapon.to_lowercase().contains(needle)
        || skin.skin_name.to_lowercase().contains(needle)
}

/// Pause between batches: short at first, longer once the scan runs deep.
fn batch_delay(batches_done: usize) -> Duration {
    if batches_done < FAST_BATCH_COUNT {
        EARLY_BATCH_DELAY
    } else {
        LATE_BATCH_DELAY
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
