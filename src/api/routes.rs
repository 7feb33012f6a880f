//! API route configuration.
//!
//! Every API request passes through [`crate::api::middleware::auth::identify`];
//! only the history endpoint requires an identity.

use crate::api::handlers::{history_handler, linkcheck_handler};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST /linkcheck` - Check one URL (identity optional)
/// - `GET  /history`   - Recent checks of the caller (identity required)
pub fn api_routes() -> Router<AppState> {
    let identified = Router::new()
        .route("/history", get(history_handler))
        .route_layer(middleware::from_fn(auth::layer));

    Router::new()
        .route("/linkcheck", post(linkcheck_handler))
        .merge(identified)
        .layer(middleware::from_fn(auth::identify))
}
