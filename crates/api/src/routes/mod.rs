pub mod health;
pub mod kit;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /kits          list (GET), create (POST, multipart)
/// /kits/{id}     get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/kits", kit::router())
}
