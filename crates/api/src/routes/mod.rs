pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /items            list, create
/// /items/{id}       get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/items", items::router())
}
