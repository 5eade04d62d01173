//! Canonical item shapes and display-name parsing
//!
//! Both upstreams describe the same items in different shapes: the
//! catalog stores full display names like
//! `StatTrak™ AK-47 | Redline (Field-Tested)` while the listings API
//! keys everything by market hash name. The helpers here are the single
//! place that grammar is taken apart and put back together.

use serde::Serialize;

/// StatTrak marker spellings as they appear in display names, with and
/// without the trademark sign.
pub const STATTRAK_MARKERS: [&str; 2] = ["StatTrak™", "StatTrak"];

/// Image used when an upstream record carries none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Catalog item images, keyed by dataset image id.
const CATALOG_IMAGE_BASE: &str =
    "https://huggingface.co/datasets/While402/CounterStrike2Skins/resolve/main/images";

/// Steam CDN base for listing icon paths.
const STEAM_IMAGE_BASE: &str = "https://community.akamai.steamstatic.com/economy/image";

/// A skin in canonical form, normalized from a catalog row or a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skin {
    /// Full display name, e.g. `AK-47 | Redline (Field-Tested)`
    pub name: String,
    pub weapon: String,
    /// The part between the `|` separator and the exterior parenthetical
    pub skin_name: String,
    pub exterior: String,
    pub rarity: String,
    pub stattrak: bool,
    pub image_url: String,
}

impl Skin {
    /// Market hash name used for exact listings lookups.
    pub fn market_hash_name(&self) -> String {
        build_market_hash_name(&self.weapon, &self.skin_name, &self.exterior, self.stattrak)
    }
}

/// Price data for one lookup. Every failure path resolves to `no_data`;
/// a missing price is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Cheapest current listing, in dollars
    pub lowest_price: Option<f64>,
    /// Steam Community Market reference price, when the listing has one
    pub steam_price: Option<f64>,
    pub has_data: bool,
}

impl PriceQuote {
    pub fn no_data() -> Self {
        Self {
            lowest_price: None,
            steam_price: None,
            has_data: false,
        }
    }

    /// Preferred price for valuation: the cheapest listing, falling back
    /// to the Steam reference.
    pub fn best_price(&self) -> Option<f64> {
        self.lowest_price.or(self.steam_price)
    }
}

/// True when the display name carries a StatTrak marker.
pub fn is_stattrak(full_name: &str) -> bool {
    STATTRAK_MARKERS.iter().any(|m| full_name.contains(m))
}

/// Strip a leading StatTrak marker, leaving the bare display name.
pub fn strip_stattrak(full_name: &str) -> &str {
    for marker in STATTRAK_MARKERS {
        if let Some(rest) = full_name.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    full_name
}

/// Extract the skin name: the part between the `|` separator and the
/// exterior parenthetical, trimmed. Names without a separator (cases,
/// stickers) keep the full name.
pub fn extract_skin_name(full_name: &str) -> String {
    match full_name.split_once('|') {
        Some((_, rest)) => rest
            .split('(')
            .next()
            .unwrap_or(rest)
            .trim()
            .to_string(),
        None => full_name.to_string(),
    }
}

/// Extract the exterior from the trailing parenthetical, when present.
pub fn extract_exterior(full_name: &str) -> Option<String> {
    let open = full_name.rfind('(')?;
    let close = full_name.rfind(')')?;
    if close > open {
        Some(full_name[open + 1..close].trim().to_string())
    } else {
        None
    }
}

/// Assemble the exact market hash name the listings API expects:
/// `[StatTrak™ ]{weapon} | {skin} ({exterior})`.
pub fn build_market_hash_name(weapon: &str, skin_name: &str, exterior: &str, stattrak: bool) -> String {
    let prefix = if stattrak { "StatTrak™ " } else { "" };
    format!("{prefix}{weapon} | {skin_name} ({exterior})")
}

/// Listings prices arrive as integer cents.
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Image URL for a catalog image id.
pub fn catalog_image_url(imageid: u64) -> String {
    format!("{CATALOG_IMAGE_BASE}/{imageid}.png")
}

/// Image URL for a Steam economy icon path.
pub fn steam_image_url(icon_url: &str) -> String {
    format!("{STEAM_IMAGE_BASE}/{icon_url}")
}
