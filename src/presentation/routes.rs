//! Route definitions.

use axum::{routing::get, Router};

use super::websocket::handler::{create_handler, join_handler};
use crate::startup::AppState;

/// Build the application router.
///
/// The join code in the URL is the only addressing mechanism; there is no
/// endpoint to list games.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/create", get(create_handler))
        .route("/join/{name}", get(join_handler))
        .with_state(state)
}
