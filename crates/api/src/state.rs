use std::sync::Arc;

use kitstore_core::upload::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, created once at startup.
    pub pool: kitstore_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upload directory receiving kit images.
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(pool: kitstore_db::DbPool, config: ServerConfig) -> Self {
        let images = Arc::new(ImageStore::new(config.upload_dir.clone()));
        Self {
            pool,
            config: Arc::new(config),
            images,
        }
    }
}
