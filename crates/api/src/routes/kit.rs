//! Route definitions for kits.
//!
//! Mounted at `/kits`.
//!
//! ```text
//! GET  /          list
//! POST /          create_kit (multipart)
//! GET  /{id}      get_by_id
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::kit;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(kit::list).post(kit::create_kit))
        .route("/{id}", get(kit::get_by_id))
}
