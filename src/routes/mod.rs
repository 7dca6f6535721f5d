use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::UserStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{DiscoverySettings, OAuthProvider, VideoPlatform},
};

pub mod auth;
pub mod youtube;

/// Shared handler state; every collaborator sits behind a trait object
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub oauth: Arc<dyn OAuthProvider>,
    pub platform: Arc<dyn VideoPlatform>,
    pub discovery: DiscoverySettings,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes())
        .nest("/youtube", youtube_routes())
        .with_state(state)
        .layer(
            // Outermost first: the request id must exist before the trace span is made
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// OAuth routes under /auth
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/google", get(auth::login))
        .route("/google/callback", get(auth::callback))
}

/// Platform routes under /youtube
fn youtube_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/liked-videos", get(youtube::liked_videos))
        .route("/discover-new", get(youtube::discover_new))
        .route("/create-playlist", post(youtube::create_playlist))
}

async fn root() -> &'static str {
    "Music Curator API is running..."
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
