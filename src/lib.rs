//! Skin Tracker - CS2 Skin Portfolio Backend
//!
//! Searches the paginated skin catalog batch by batch, enriches results
//! with live CSFloat prices, and keeps an in-memory portfolio with a
//! synthesized valuation history behind a JSON API.

pub mod cache;
pub mod csfloat;
pub mod error;
pub mod huggingface;
pub mod models;
pub mod portfolio;
pub mod search;
pub mod web;

pub use cache::{CacheStatus, ResponseCache};
pub use csfloat::{FallbackSearch, ListingsClient};
pub use error::{Result, TrackerError};
pub use huggingface::{CatalogClient, CatalogRecord};
pub use models::{PriceQuote, Skin};
pub use portfolio::{Portfolio, TrackedSkin};
pub use search::{SearchEngine, SearchOutcome};
