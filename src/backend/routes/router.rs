/**
 * Router Configuration
 *
 * Combines the chat routes, the socket upgrade, media serving and the
 * health check into a single Axum router.
 *
 * # Layers
 *
 * Everything under `/chat` and `/socket` sits behind `auth_middleware`.
 * `/health` and `/media` are public. The body limit applies to multipart
 * sends; the trace and CORS layers wrap the whole router.
 */

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::socket_handler;
use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// - `/chat/*` - see `chat_routes`
/// - `GET /socket` - WebSocket upgrade
/// - `GET /health` - liveness and persistence mode
/// - `/media/*` - uploaded attachments
///
/// Unknown routes answer with a JSON 404.
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let protected = configure_chat_routes(Router::new())
        .route("/socket", get(socket_handler))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let router = Router::new()
        .route("/health", get(health))
        .merge(protected)
        .nest_service("/media", ServeDir::new(&config.media_root))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    let router = match HeaderValue::from_str(&config.client_url) {
        Ok(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        ),
        Err(e) => {
            tracing::warn!("CLIENT_URL {:?} is not a valid origin, CORS disabled: {}", config.client_url, e);
            router
        }
    };

    router.with_state(app_state)
}

async fn health(State(db_pool): State<Option<PgPool>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "database": if db_pool.is_some() { "postgres" } else { "memory" },
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "status": 404 })),
    )
}
