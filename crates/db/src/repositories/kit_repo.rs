//! Repository for the `kits` table.

use kitstore_core::types::DbId;
use sqlx::PgPool;

use crate::models::kit::{CreateKit, Kit};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, category, price, discount, brand, \
    images, created_at, updated_at";

/// Provides create and read operations for kits. Kits have no update or
/// delete path.
pub struct KitRepo;

impl KitRepo {
    /// Insert a new kit, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateKit) -> Result<Kit, sqlx::Error> {
        let query = format!(
            "INSERT INTO kits (name, description, category, price, discount, brand, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Kit>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price)
            .bind(input.discount)
            .bind(&input.brand)
            .bind(&input.images)
            .fetch_one(pool)
            .await
    }

    /// Find a kit by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Kit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM kits WHERE id = $1");
        sqlx::query_as::<_, Kit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all kits, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Kit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM kits ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Kit>(&query).fetch_all(pool).await
    }
}
