//! Integration tests for the HTTP wishlist client.
//!
//! A small axum server on an ephemeral port plays the wishlist backend:
//! 1. Status codes map onto `ApiError` variants
//! 2. Bearer tokens are sent on every request
//! 3. Server payloads (camelCase, string prices) decode into entries
//! 4. The store works end to end over real HTTP

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use betta_wishlist::adapters::{
    HttpWishlistApi, HttpWishlistConfig, InMemoryCacheStorage, InMemoryCredentialStore, SyncBus,
    TracingLoginPrompt,
};
use betta_wishlist::application::{WishlistCache, WishlistStore, DEFAULT_CACHE_KEY};
use betta_wishlist::domain::foundation::ProductId;
use betta_wishlist::domain::wishlist::WishlistError;
use betta_wishlist::ports::{AccessToken, ApiError, WishlistApi};

// =============================================================================
// Test Server
// =============================================================================

const TOKEN: &str = "good-token";

#[derive(Clone, Default)]
struct ServerState {
    products: Arc<Mutex<Vec<i64>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn list(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" })))
            .into_response();
    }
    let products = state.products.lock().unwrap().clone();
    let data: Vec<Value> = products
        .iter()
        .enumerate()
        .map(|(i, product_id)| {
            json!({
                "id": i + 1,
                "userId": 42,
                "productId": product_id,
                "createdAt": "2024-05-01T10:00:00Z",
                "Product": {
                    "name": format!("Halfmoon {}", product_id),
                    "price": "24.99",
                    "imageUrl": null
                }
            })
        })
        .collect();
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn add(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(product_id) = body.get("productId").and_then(Value::as_i64) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "productId required" })))
            .into_response();
    };
    let mut products = state.products.lock().unwrap();
    if products.contains(&product_id) {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Already in wishlist" })))
            .into_response();
    }
    products.push(product_id);
    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn remove(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut products = state.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| *p != product_id);
    if products.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not in wishlist" })))
            .into_response();
    }
    Json(json!({ "success": true })).into_response()
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "database unavailable" })),
    )
        .into_response()
}

async fn garbled() -> &'static str {
    "definitely not json"
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "data": [] })).into_response()
}

/// Starts the server and returns its base URL.
async fn spawn_server(state: ServerState) -> String {
    let app = Router::new()
        .route("/api/wishlist", get(list).post(add))
        .route("/api/wishlist/:product_id", axum::routing::delete(remove))
        .route("/broken/wishlist", get(broken))
        .route("/garbled/wishlist", get(garbled))
        .route("/slow/wishlist", get(slow))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> HttpWishlistApi {
    HttpWishlistApi::new(HttpWishlistConfig::new(base)).unwrap()
}

fn token() -> AccessToken {
    AccessToken::new(TOKEN)
}

fn pid(raw: i64) -> ProductId {
    ProductId::new(raw).unwrap()
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn add_then_list_decodes_server_payload() {
    let base = spawn_server(ServerState::default()).await;
    let api = client(&format!("{}/api", base));

    api.add(&token(), pid(7)).await.unwrap();
    let entries = api.list(&token()).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product_id, pid(7));
    assert_eq!(entries[0].display_name(), "Halfmoon 7");
    assert_eq!(entries[0].product.as_ref().unwrap().price, 24.99);
}

#[tokio::test]
async fn duplicate_add_maps_to_conflict() {
    let state = ServerState::default();
    state.products.lock().unwrap().push(7);
    let base = spawn_server(state).await;

    let result = client(&format!("{}/api", base)).add(&token(), pid(7)).await;

    assert_eq!(result, Err(ApiError::Conflict));
}

#[tokio::test]
async fn remove_missing_maps_to_not_found() {
    let base = spawn_server(ServerState::default()).await;

    let result = client(&format!("{}/api", base)).remove(&token(), pid(3)).await;

    assert_eq!(result, Err(ApiError::NotFound));
}

#[tokio::test]
async fn wrong_token_maps_to_unauthorized() {
    let base = spawn_server(ServerState::default()).await;

    let result = client(&format!("{}/api", base))
        .list(&AccessToken::new("stale"))
        .await;

    assert_eq!(result, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn server_error_carries_message() {
    let base = spawn_server(ServerState::default()).await;

    let result = client(&format!("{}/broken", base)).list(&token()).await;

    assert_eq!(
        result,
        Err(ApiError::Status {
            status: 500,
            message: "database unavailable".to_string()
        })
    );
}

#[tokio::test]
async fn unreadable_body_maps_to_decode() {
    let base = spawn_server(ServerState::default()).await;

    let result = client(&format!("{}/garbled", base)).list(&token()).await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn timeout_maps_to_network() {
    let base = spawn_server(ServerState::default()).await;
    let api = HttpWishlistApi::new(
        HttpWishlistConfig::new(format!("{}/slow", base)).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let result = api.list(&token()).await;

    assert!(matches!(result, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn unreachable_server_maps_to_network() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(&format!("http://{}/api", addr)).list(&token()).await;

    assert!(matches!(result, Err(ApiError::Network(_))));
}

// =============================================================================
// Store over HTTP
// =============================================================================

#[tokio::test]
async fn store_round_trip_over_http() {
    let state = ServerState::default();
    let base = spawn_server(state.clone()).await;
    let store = WishlistStore::new(
        Arc::new(client(&format!("{}/api", base))),
        Arc::new(InMemoryCredentialStore::with_token(TOKEN)),
        Arc::new(TracingLoginPrompt::new()),
        WishlistCache::new(Arc::new(InMemoryCacheStorage::new()), DEFAULT_CACHE_KEY),
        Arc::new(SyncBus::new(Duration::ZERO)),
    );

    let snapshot = store.add(7).await.unwrap();
    assert_eq!(snapshot.count(), 1);
    assert_eq!(*state.products.lock().unwrap(), vec![7]);

    assert_eq!(
        store.add(7).await,
        Err(WishlistError::AlreadyPresent(pid(7)))
    );

    let snapshot = store.remove(7).await.unwrap();
    assert!(snapshot.is_empty());
    assert!(state.products.lock().unwrap().is_empty());
}

#[tokio::test]
async fn store_treats_rejected_token_as_signed_out() {
    let base = spawn_server(ServerState::default()).await;
    let credentials = Arc::new(InMemoryCredentialStore::with_token("expired"));
    let prompt = Arc::new(TracingLoginPrompt::new());
    let store = WishlistStore::new(
        Arc::new(client(&format!("{}/api", base))),
        credentials.clone(),
        prompt.clone(),
        WishlistCache::new(Arc::new(InMemoryCacheStorage::new()), DEFAULT_CACHE_KEY),
        Arc::new(SyncBus::new(Duration::ZERO)),
    );

    assert_eq!(store.add(1).await, Err(WishlistError::AuthRequired));
    assert!(!credentials.has_token());
    assert_eq!(prompt.prompt_count(), 1);
}
