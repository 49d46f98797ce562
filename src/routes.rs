use axum::{extract::State, middleware, response::IntoResponse, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::time::Duration, Expiry, MemoryStore, SessionManagerLayer};

use crate::database::users::UserStore;
use crate::handlers::api;
use crate::middleware::{reset_guard, session as session_middleware};
use crate::state::AppState;

/// Assemble the application router. Layers run outermost-first: trace, CORS,
/// session manager, user resolution, then the forced-reset guard ahead of
/// every route.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(state.config.session.cookie_name.clone())
        .with_secure(state.config.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.config.session.max_age_hours as i64,
        )));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api_routes())
        .layer(middleware::from_fn(reset_guard::require_password_reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware::resolve_user,
        ))
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(api::search::search))
        .route("/api/register", post(api::register::register))
        .route("/api/login", post(api::login::login))
        .route("/api/logout", get(api::logout::logout))
        .route("/api/reset-password", post(api::reset::reset_password))
        .route("/api/session", get(api::session::session_info))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Quest API",
        "version": version,
        "description": "Authenticated search over pages and wiki articles",
        "endpoints": {
            "search": "GET /api/search?q=<text>&language=<code>",
            "register": "POST /api/register",
            "login": "POST /api/login",
            "logout": "GET /api/logout",
            "reset_password": "POST /api/reset-password",
            "session": "GET /api/session",
            "health": "GET /health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unavailable",
                    "timestamp": now,
                })),
            )
        }
    }
}
