pub mod config;
pub mod error;
pub mod forwarding;
pub mod identity;
pub mod logging;
pub mod models;

use axum::routing::{get, post};
use axum::Router;
use relay_core::Relay;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub relay: Relay,
}

pub fn app(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/relay",
            get(forwarding::relay_get_handler).post(forwarding::relay_body_handler),
        )
        .route(
            "/relay-post",
            post(forwarding::relay_post_handler).options(forwarding::relay_post_options_handler),
        )
        .route("/identity", get(identity::identity_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
