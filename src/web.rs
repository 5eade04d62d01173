//! Web API for the skin tracker UI
//!
//! Serves the two upstream proxy routes (catalog rows and listings) plus
//! the JSON endpoints the browser consumes: catalog search, the listings
//! fallback search, price lookups and the tracked portfolio.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::csfloat::{FallbackSearch, ListingsClient, ListingsQuery, SortBy};
use crate::error::TrackerError;
use crate::huggingface::{CatalogClient, RowsQuery};
use crate::models::{PriceQuote, Skin, PLACEHOLDER_IMAGE};
use crate::portfolio::{HistoryPoint, Portfolio, PortfolioTotals, TimeRange, TrackedSkin};
use crate::search::{SearchEngine, SearchOutcome};

/// Cache header advertised on proxied listings responses.
const SHARED_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// Shared application state (upstream clients + the tracked portfolio)
#[derive(Clone)]
struct AppState {
    catalog: Arc<CatalogClient>,
    listings: Arc<ListingsClient>,
    search: Arc<SearchEngine>,
    portfolio: Arc<RwLock<Portfolio>>,
}

/// Search query parameters
#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Price lookup parameters
#[derive(Deserialize)]
struct PriceParams {
    name: String,
}

/// History query parameters
#[derive(Deserialize)]
struct HistoryParams {
    #[serde(default = "default_range")]
    range: String,
}

fn default_range() -> String {
    "7d".to_string()
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Tracked list plus its aggregate valuation
#[derive(Serialize)]
struct PortfolioView {
    skins: Vec<TrackedSkin>,
    totals: PortfolioTotals,
}

/// Catalog size for the UI footer
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogStats {
    total_skins: u64,
}

/// Body for adding a tracked skin. A search selection carries the full
/// metadata and gets price-enriched; a bare name becomes a manual entry
/// with no price data.
#[derive(Debug, Deserialize)]
struct AddSkinRequest {
    name: String,
    #[serde(default)]
    weapon: Option<String>,
    #[serde(default)]
    skin_name: Option<String>,
    #[serde(default)]
    exterior: Option<String>,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    stattrak: Option<bool>,
    #[serde(default)]
    image_url: Option<String>,
}

impl AddSkinRequest {
    /// Only a request with weapon, skin name and exterior can be turned
    /// into a market hash name for the price lookup.
    fn as_skin(&self) -> Option<Skin> {
        match (&self.weapon, &self.skin_name, &self.exterior) {
            (Some(weapon), Some(skin_name), Some(exterior)) => Some(Skin {
                name: self.name.clone(),
                weapon: weapon.clone(),
                skin_name: skin_name.clone(),
                exterior: exterior.clone(),
                rarity: self.rarity.clone().unwrap_or_default(),
                stattrak: self.stattrak.unwrap_or(false),
                image_url: self
                    .image_url
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            }),
            _ => None,
        }
    }
}

/// Map an upstream failure onto the proxy contract: the upstream status
/// (429 included) with an `{"error": ...}` body, 500 for local failures.
fn upstream_error_response(err: TrackerError) -> Response {
    match err {
        TrackerError::Upstream { status, .. } => {
            let status =
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            let body = json!({ "error": format!("API error: {}", status.as_u16()) });
            (status, Json(body)).into_response()
        }
        TrackerError::RateLimited => {
            let body = json!({ "error": "API error: 429" });
            (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
        }
        other => {
            log::error!("proxy request failed: {other}");
            let body = json!({ "error": "Failed to fetch from upstream" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// GET /api/catalog?dataset=..&config=..&split=..&offset=..&length=..
///
/// Proxy to the datasets-server rows endpoint through the response
/// cache. `X-Cache` reports whether the payload was served from cache.
async fn catalog_proxy_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (Some(dataset), Some(config), Some(split), Some(offset), Some(length)) = (
        params.get("dataset"),
        params.get("config"),
        params.get("split"),
        params.get("offset"),
        params.get("length"),
    ) else {
        let body = json!({ "error": "Missing required parameters" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    let (Ok(offset), Ok(length)) = (offset.parse::<usize>(), length.parse::<usize>()) else {
        let body = json!({ "error": "Invalid offset or length" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    let query = RowsQuery {
        dataset: dataset.clone(),
        config: config.clone(),
        split: split.clone(),
        offset,
        length,
    };

    match state.catalog.fetch_rows(&query).await {
        Ok((payload, cache_status)) => {
            ([("x-cache", cache_status.as_str())], Json(payload)).into_response()
        }
        Err(e) => upstream_error_response(e),
    }
}

/// GET /api/listings?market_hash_name=..&limit=..&sort_by=..
///
/// Proxy to the listings endpoint. The API key is injected server-side;
/// successful responses advertise a shared cache policy.
async fn listings_proxy_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let sort_by = match params.get("sort_by") {
        None => None,
        Some(raw) => match SortBy::parse(raw) {
            Some(sort) => Some(sort),
            None => {
                let body = json!({ "error": "Invalid sort_by parameter" });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        },
    };

    let limit = match params.get("limit") {
        None => None,
        Some(raw) => match raw.parse::<usize>() {
            Ok(limit) => Some(limit),
            Err(_) => {
                let body = json!({ "error": "Invalid limit parameter" });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        },
    };

    let query = ListingsQuery {
        market_hash_name: params.get("market_hash_name").cloned(),
        limit,
        sort_by,
    };

    match state.listings.forward(&query).await {
        Ok(payload) => (
            [(header::CACHE_CONTROL, SHARED_CACHE_CONTROL)],
            Json(payload),
        )
            .into_response(),
        Err(e) => upstream_error_response(e),
    }
}

/// GET /api/search?q={term}&limit={limit}
///
/// Batched catalog search. Rate limits and upstream failures degrade to
/// partial or empty outcomes rather than errors, so this always answers
/// with success.
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ApiResponse<SearchOutcome>> {
    let outcome = state.search.search(&params.q, params.limit).await;
    Json(ApiResponse {
        success: true,
        data: Some(outcome),
        error: None,
    })
}

/// GET /api/search/listings?q={term}&limit={limit}
///
/// Fallback substring search over the most-recent listings window. The
/// outcome reports how much of the stream was scanned.
async fn listings_search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ApiResponse<FallbackSearch>> {
    let outcome = state.listings.search_recent(&params.q, params.limit).await;
    Json(ApiResponse {
        success: true,
        data: Some(outcome),
        error: None,
    })
}

/// GET /api/price?name={market_hash_name}
///
/// Cheapest current offer for an exact market hash name. A quote with
/// `hasData: false` is the ordinary no-listings outcome.
async fn price_handler(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Json<ApiResponse<PriceQuote>> {
    let quote = state.listings.price_quote(&params.name).await;
    Json(ApiResponse {
        success: true,
        data: Some(quote),
        error: None,
    })
}

/// GET /api/portfolio
async fn portfolio_handler(State(state): State<AppState>) -> Json<ApiResponse<PortfolioView>> {
    let portfolio = state.portfolio.read().await;
    Json(ApiResponse {
        success: true,
        data: Some(PortfolioView {
            skins: portfolio.skins().to_vec(),
            totals: portfolio.totals(),
        }),
        error: None,
    })
}

/// POST /api/portfolio
///
/// Add a skin to the tracked list. A failed price lookup never blocks
/// the add; the entry just lands without price data.
async fn portfolio_add_handler(
    State(state): State<AppState>,
    Json(request): Json<AddSkinRequest>,
) -> Result<Json<ApiResponse<TrackedSkin>>, StatusCode> {
    if request.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let entry = match request.as_skin() {
        Some(skin) => {
            let quote = state.listings.price_quote(&skin.market_hash_name()).await;
            let mut portfolio = state.portfolio.write().await;
            portfolio.add_skin(&skin, &quote)
        }
        None => {
            let mut portfolio = state.portfolio.write().await;
            portfolio.add_manual(request.name.trim())
        }
    };

    log::info!("tracking \"{}\" as id {}", entry.name, entry.id);
    Ok(Json(ApiResponse {
        success: true,
        data: Some(entry),
        error: None,
    }))
}

/// DELETE /api/portfolio/{id}
async fn portfolio_remove_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, StatusCode> {
    let mut portfolio = state.portfolio.write().await;
    if portfolio.remove(&id) {
        Ok(Json(ApiResponse {
            success: true,
            data: None,
            error: None,
        }))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// GET /api/portfolio/history?range={24h|7d|1m|3m|1y|all}
async fn portfolio_history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<HistoryPoint>>>, StatusCode> {
    let Some(range) = TimeRange::parse(&params.range) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let portfolio = state.portfolio.read().await;
    Ok(Json(ApiResponse {
        success: true,
        data: Some(portfolio.history(range)),
        error: None,
    }))
}

/// GET /api/stats
async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CatalogStats>>, StatusCode> {
    match state.catalog.total_count().await {
        Ok(total_skins) => Ok(Json(ApiResponse {
            success: true,
            data: Some(CatalogStats { total_skins }),
            error: None,
        })),
        Err(e) => {
            log::error!("Catalog count error: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Build the web server router
pub fn create_router(catalog: Arc<CatalogClient>, listings: Arc<ListingsClient>) -> Router {
    let state = AppState {
        search: Arc::new(SearchEngine::new(Arc::clone(&catalog))),
        portfolio: Arc::new(RwLock::new(Portfolio::new())),
        catalog,
        listings,
    };

    Router::new()
        .route("/api/catalog", get(catalog_proxy_handler))
        .route("/api/listings", get(listings_proxy_handler))
        .route("/api/search", get(search_handler))
        .route("/api/search/listings", get(listings_search_handler))
        .route("/api/price", get(price_handler))
        .route(
            "/api/portfolio",
            get(portfolio_handler).post(portfolio_add_handler),
        )
        .route("/api/portfolio/history", get(portfolio_history_handler))
        .route("/api/portfolio/{id}", delete(portfolio_remove_handler))
        .route("/api/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the web server (async)
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
/// Runs until ctrl-c, then shuts down gracefully.
pub async fn serve(
    catalog: Arc<CatalogClient>,
    listings: Arc<ListingsClient>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(catalog, listings);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown signal received"),
        Err(e) => log::error!("Failed to listen for shutdown signal: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_router(catalog_url: &str, listings_url: &str) -> Router {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300), 64));
        let catalog = Arc::new(CatalogClient::new(catalog_url, cache));
        let listings = Arc::new(ListingsClient::new(listings_url, None));
        create_router(catalog, listings)
    }

    /// Router pointed at nothing; good enough for validation paths that
    /// never reach upstream.
    fn offline_router() -> Router {
        test_router("http://127.0.0.1:9", "http://127.0.0.1:9")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_create_router() {
        let _router = offline_router();
        // If we got here without panicking, the router was created successfully
    }

    #[test]
    fn test_search_params_default_limit() {
        let params = SearchParams {
            q: "test".to_string(),
            limit: default_limit(),
        };

        assert_eq!(params.limit, 50);
    }

    #[test]
    fn test_api_response_serialization() {
        let response: ApiResponse<Vec<i32>> = ApiResponse {
            success: true,
            data: Some(vec![1, 2, 3]),
            error: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":[1,2,3]"));
    }

    #[test]
    fn test_api_response_error_serialization() {
        let response: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some("Test error".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"Test error\""));
        // data should be omitted when None
        assert!(!json.contains("\"data\""));
    }

    // ── Proxy routes ─────────────────────────────────────────────────

    #[tokio::test]
    async fn catalog_proxy_rejects_missing_parameters() {
        let router = offline_router();
        let response = router
            .oneshot(get_request("/api/catalog?dataset=x&config=y"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing required parameters");
    }

    #[tokio::test]
    async fn catalog_proxy_rejects_non_numeric_offset() {
        let router = offline_router();
        let uri = "/api/catalog?dataset=d&config=c&split=s&offset=abc&length=100";
        let response = router.oneshot(get_request(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn catalog_proxy_reports_cache_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [],
                "num_rows_total": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let router = test_router(&server.uri(), "http://127.0.0.1:9");
        let uri = "/api/catalog?dataset=d&config=c&split=s&offset=0&length=100";

        let first = router.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get("x-cache").unwrap(), "MISS");

        let second = router.oneshot(get_request(uri)).await.unwrap();
        assert_eq!(second.headers().get("x-cache").unwrap(), "HIT");
    }

    #[tokio::test]
    async fn catalog_proxy_passes_upstream_status_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rows"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let router = test_router(&server.uri(), "http://127.0.0.1:9");
        let uri = "/api/catalog?dataset=d&config=c&split=s&offset=0&length=100";
        let response = router.oneshot(get_request(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "API error: 503");
    }

    #[tokio::test]
    async fn listings_proxy_rejects_unknown_sort() {
        let router = offline_router();
        let response = router
            .oneshot(get_request("/api/listings?sort_by=best_deal"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid sort_by parameter");
    }

    #[tokio::test]
    async fn listings_proxy_forwards_and_advertises_caching() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/listings"))
            .and(query_param("sort_by", "most_recent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "1",
                    "price": 100, "item": { "market_hash_name": "X | Y (Z)" } }])),
            )
            .mount(&server)
            .await;

        let router = test_router("http://127.0.0.1:9", &server.uri());
        let response = router
            .oneshot(get_request("/api/listings?sort_by=most_recent&limit=10"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            SHARED_CACHE_CONTROL
        );
        let body = body_json(response).await;
        assert_eq!(body[0]["price"], 100);
    }

    // ── Search and price routes ──────────────────────────────────────

    #[tokio::test]
    async fn search_route_answers_success_even_for_short_terms() {
        let router = offline_router();
        let response = router
            .oneshot(get_request("/api/search?q=ak"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["items"], serde_json::json!([]));
        assert_eq!(body["data"]["batches"], 0);
    }

    #[tokio::test]
    async fn price_route_reports_no_data_for_missing_listings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/listings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let router = test_router("http://127.0.0.1:9", &server.uri());
        let response = router
            .oneshot(get_request("/api/price?name=AK-47%20%7C%20Redline%20(Field-Tested)"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["hasData"], false);
        assert_eq!(body["data"]["lowestPrice"], serde_json::Value::Null);
    }

    // ── Portfolio routes ─────────────────────────────────────────────

    #[tokio::test]
    async fn add_then_list_then_remove_tracked_skin() {
        let router = offline_router();

        let added = router
            .clone()
            .oneshot(post_json("/api/portfolio", r#"{"name":"Manual Entry"}"#))
            .await
            .unwrap();
        assert_eq!(added.status(), StatusCode::OK);
        let added_body = body_json(added).await;
        let id = added_body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(added_body["data"]["price"], serde_json::Value::Null);

        let listed = router
            .clone()
            .oneshot(get_request("/api/portfolio"))
            .await
            .unwrap();
        let listed_body = body_json(listed).await;
        assert_eq!(listed_body["data"]["skins"].as_array().unwrap().len(), 1);
        assert_eq!(listed_body["data"]["totals"]["totalValue"], 0.0);

        let removed = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/portfolio/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(removed.status(), StatusCode::OK);

        let empty = router.oneshot(get_request("/api/portfolio")).await.unwrap();
        let empty_body = body_json(empty).await;
        assert_eq!(empty_body["data"]["skins"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn add_with_metadata_fetches_a_price() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/listings"))
            .and(query_param("sort_by", "lowest_price"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "1",
                    "price": 425,
                    "item": { "market_hash_name": "AK-47 | Redline (Field-Tested)" } }])),
            )
            .mount(&server)
            .await;

        let router = test_router("http://127.0.0.1:9", &server.uri());
        let body = r#"{
            "name": "AK-47 | Redline (Field-Tested)",
            "weapon": "AK-47",
            "skin_name": "Redline",
            "exterior": "Field-Tested",
            "rarity": "Classified",
            "stattrak": false
        }"#;

        let response = router
            .oneshot(post_json("/api/portfolio", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response_body = body_json(response).await;
        assert_eq!(response_body["data"]["price"], 4.25);
        assert_eq!(response_body["data"]["weapon"], "AK-47");
    }

    #[tokio::test]
    async fn add_rejects_blank_names() {
        let router = offline_router();
        let response = router
            .oneshot(post_json("/api/portfolio", r#"{"name":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let router = offline_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/portfolio/123456789")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn history_defaults_to_one_week() {
        let router = offline_router();
        let response = router
            .oneshot(get_request("/api/portfolio/history"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn history_rejects_unknown_ranges() {
        let router = offline_router();
        let response = router
            .oneshot(get_request("/api/portfolio/history?range=2w"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Stats route ──────────────────────────────────────────────────

    #[tokio::test]
    async fn stats_route_reports_catalog_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rows"))
            .and(query_param("length", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{ "row": { "name": "AK-47 | Redline (Field-Tested)",
                    "weapon": "AK-47", "exterior": "Field-Tested",
                    "rarity": "Classified", "imageid": 1 } }],
                "num_rows_total": 13412
            })))
            .mount(&server)
            .await;

        let router = test_router(&server.uri(), "http://127.0.0.1:9");
        let response = router.oneshot(get_request("/api/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["totalSkins"], 13412);
    }
}
