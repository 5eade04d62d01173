//! In-memory tracked portfolio
//!
//! Tracked skins live only for the process lifetime; there is no
//! persistence. Valuation history is synthesized around current prices
//! because no real price history exists, and entry ids are derived from
//! the creation timestamp with a strictly monotonic bump so two adds in
//! the same millisecond still get distinct ids.

use chrono::{DateTime, Local, Utc};
use rand::Rng;
use serde::Serialize;

use crate::models::{PriceQuote, Skin, PLACEHOLDER_IMAGE};

/// Chart ranges supported by the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl TimeRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "24h" => Some(TimeRange::Day),
            "7d" => Some(TimeRange::Week),
            "1m" => Some(TimeRange::Month),
            "3m" => Some(TimeRange::Quarter),
            "1y" => Some(TimeRange::Year),
            "all" => Some(TimeRange::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "1m",
            TimeRange::Quarter => "3m",
            TimeRange::Year => "1y",
            TimeRange::All => "all",
        }
    }

    fn days(&self) -> usize {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
            TimeRange::All => 730,
        }
    }
}

/// A skin tracked in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSkin {
    /// Creation-timestamp id, unique within the process
    pub id: String,
    pub name: String,
    pub image: String,
    /// None means no price data; excluded from totals, shown as N/A
    pub price: Option<f64>,
    pub change_24h: f64,
    pub change_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stattrak: Option<bool>,
}

/// Aggregate valuation of the tracked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub change_24h: f64,
    pub change_percent: f64,
}

/// One point of the synthesized valuation series, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Short axis label, e.g. `14:00` or `Aug 25`
    pub date: String,
    /// Long label for tooltips, e.g. `August 25, 2026`
    pub full_date: String,
    pub value: f64,
}

/// The in-memory tracked list. Wrapped in a lock by the web state; the
/// struct itself is single-owner.
#[derive(Debug, Default)]
pub struct Portfolio {
    skins: Vec<TrackedSkin>,
    last_id: i64,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond timestamp, bumped past the previous id when two adds
    /// land inside the same millisecond.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_id + 1);
        self.last_id = id;
        id.to_string()
    }

    /// Track a skin selected from search together with the quote fetched
    /// for it. A no-data quote yields a null price and zero change.
    pub fn add_skin(&mut self, skin: &Skin, quote: &PriceQuote) -> TrackedSkin {
        let price = quote.best_price();
        let (change_24h, change_percent) = synth_change(price);
        let entry = TrackedSkin {
            id: self.next_id(),
            name: skin.name.clone(),
            image: skin.image_url.clone(),
            price,
            change_24h,
            change_percent,
            weapon: Some(skin.weapon.clone()),
            skin_name: Some(skin.skin_name.clone()),
            rarity: Some(skin.rarity.clone()),
            stattrak: Some(skin.stattrak),
        };
        self.skins.push(entry.clone());
        entry
    }

    /// Track a manually named skin with no catalog metadata and no price.
    pub fn add_manual(&mut self, name: &str) -> TrackedSkin {
        let entry = TrackedSkin {
            id: self.next_id(),
            name: name.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            price: None,
            change_24h: 0.0,
            change_percent: 0.0,
            weapon: None,
            skin_name: None,
            rarity: None,
            stattrak: None,
        };
        self.skins.push(entry.clone());
        entry
    }

    /// Remove by id. False when no entry matches.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.skins.len();
        self.skins.retain(|skin| skin.id != id);
        self.skins.len() != before
    }

    pub fn skins(&self) -> &[TrackedSkin] {
        &self.skins
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }

    /// Aggregate valuation. Entries without price data contribute
    /// nothing to any of the sums.
    pub fn totals(&self) -> PortfolioTotals {
        let total_value: f64 = self.skins.iter().filter_map(|skin| skin.price).sum();
        let change_24h: f64 = self
            .skins
            .iter()
            .filter(|skin| skin.price.is_some())
            .map(|skin| skin.change_24h)
            .sum();
        let change_percent = if total_value > 0.0 {
            change_24h / (total_value - change_24h) * 100.0
        } else {
            0.0
        };
        PortfolioTotals {
            total_value,
            change_24h,
            change_percent,
        }
    }

    /// Synthesized valuation series for a range, oldest point first.
    /// The day range gets one point per hour; longer ranges one point
    /// per interval. Values drift toward the current total with a small
    /// random fluctuation and never go negative.
    pub fn history(&self, range: TimeRange) -> Vec<HistoryPoint> {
        let now = Local::now();
        let mut rng = rand::thread_rng();
        let prices: Vec<f64> = self.skins.iter().filter_map(|skin| skin.price).collect();

        if range == TimeRange::Day {
            return (0..=24)
                .rev()
                .map(|hours_ago| {
                    let at = now - chrono::Duration::hours(hours_ago);
                    let drift = hours_ago as f64 * 0.0002;
                    HistoryPoint {
                        date: at.format("%-H:00").to_string(),
                        full_date: hourly_label(&at),
                        value: synth_value(&prices, drift, &mut rng),
                    }
                })
                .collect();
        }

        let days = range.days();
        let interval = if days <= 7 {
            1
        } else if days <= 30 {
            2
        } else if days <= 90 {
            7
        } else {
            30
        };
        let points = (days + interval - 1) / interval;

        (0..points)
            .rev()
            .map(|intervals_ago| {
                let days_ago = intervals_ago * interval;
                let at = now - chrono::Duration::days(days_ago as i64);
                let drift = days_ago as f64 * 0.005;
                let date = if days <= 90 {
                    at.format("%b %-d").to_string()
                } else {
                    at.format("%b %y").to_string()
                };
                HistoryPoint {
                    date,
                    full_date: daily_label(&at),
                    value: synth_value(&prices, drift, &mut rng),
                }
            })
            .collect()
    }
}

/// Sum of per-skin values drifted away from the current price, with a
/// small random wobble, floored at zero.
fn synth_value(prices: &[f64], drift: f64, rng: &mut impl Rng) -> f64 {
    prices
        .iter()
        .map(|price| {
            let fluctuation = (rng.gen::<f64>() - 0.5) * 0.05;
            (price * (1.0 - drift + fluctuation)).max(0.0)
        })
        .sum()
}

/// Random 24h movement for a newly tracked skin: up to ±5% of the price
/// in absolute terms, up to ±5 percentage points relative.
fn synth_change(price: Option<f64>) -> (f64, f64) {
    match price {
        Some(price) => {
            let mut rng = rand::thread_rng();
            let change = (rng.gen::<f64>() - 0.5) * (price * 0.1);
            let percent = (rng.gen::<f64>() - 0.5) * 10.0;
            (change, percent)
        }
        None => (0.0, 0.0),
    }
}

fn hourly_label(at: &DateTime<Local>) -> String {
    at.format("%B %-d, %Y at %H:%M").to_string()
}

fn daily_label(at: &DateTime<Local>) -> String {
    at.format("%B %-d, %Y").to_string()
}
