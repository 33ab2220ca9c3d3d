//! Kit (product) entity model and DTOs.

use kitstore_core::kit::KitFields;
use kitstore_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `kits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Kit {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount: f64,
    pub brand: String,
    /// Stored image basenames, in display order.
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new kit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateKit {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount: f64,
    pub brand: String,
    pub images: Vec<String>,
}

impl CreateKit {
    /// Combine validated form fields with the names of the stored images.
    pub fn from_fields(fields: KitFields, images: Vec<String>) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            category: fields.category,
            price: fields.price,
            discount: fields.discount,
            brand: fields.brand,
            images,
        }
    }
}
