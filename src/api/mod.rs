//! API layer
//!
//! HTTP handlers for:
//! - Account registration, lookup, and search
//! - Friend requests and friendships
//! - Metrics (Prometheus)

mod accounts;
mod dto;
mod friends;
pub mod metrics;

pub use dto::*;
pub use metrics::{metrics_router, track_http_metrics};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{AppState, auth::require_auth};

/// Create the `/v1` router
///
/// Registration is public. Everything else requires a session token.
pub fn api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/v1/accounts/search", get(accounts::search_accounts))
        .route("/v1/accounts/:id", get(accounts::get_account))
        .route("/v1/friends", get(friends::list_friends))
        .route(
            "/v1/friends/requests/outgoing",
            get(friends::list_outgoing_requests),
        )
        .route(
            "/v1/friends/requests/incoming",
            get(friends::list_incoming_requests),
        )
        .route(
            "/v1/friends/:id",
            get(friends::get_friendship_status).delete(friends::remove_friend),
        )
        .route("/v1/friends/:id/request", post(friends::send_friend_request))
        .route("/v1/friends/:id/accept", post(friends::accept_friend_request))
        .route("/v1/friends/:id/reject", post(friends::reject_friend_request))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/v1/accounts", post(accounts::register_account))
        .merge(protected)
        .layer(middleware::from_fn(track_http_metrics))
}
