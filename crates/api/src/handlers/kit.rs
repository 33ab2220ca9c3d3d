//! Handlers for the `/kits` resource.
//!
//! `POST /api/kits` accepts the create-kit multipart form. The image is
//! streamed into the upload directory first, then the kit row is inserted.
//! If anything fails after the file was created, the file is removed again
//! so no orphaned upload is left behind.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use kitstore_core::error::CoreError;
use kitstore_core::kit::{KitFieldSet, FIELD_IMAGE};
use kitstore_core::types::DbId;
use kitstore_core::upload::{ImageStore, StoredImage};
use kitstore_db::models::kit::{CreateKit, Kit};
use kitstore_db::repositories::KitRepo;

use crate::error::{AppError, AppResult};
use crate::response::Envelope;
use crate::state::AppState;

/// Message returned when the form carries no (non-empty) image.
pub const NO_IMAGE_MESSAGE: &str = "No image uploaded";

/// Message returned with a newly created kit.
pub const CREATED_MESSAGE: &str = "Kit created successfully";

/// POST /api/kits
///
/// Accepts `name, description, category, price, discount, brand` text
/// fields and exactly one `image` file. Responds with the created kit.
pub async fn create_kit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Envelope<Kit>>> {
    let mut multipart = multipart?;
    let mut stored: Option<StoredImage> = None;

    match persist_upload(&state, &mut multipart, &mut stored).await {
        Ok(kit) => {
            tracing::info!(kit_id = kit.id, image = %kit.images.join(","), "Kit created");
            Ok(Json(Envelope::success(CREATED_MESSAGE, kit)))
        }
        Err(err) => {
            if let Some(image) = stored {
                discard_image(&state.images, &image).await;
            }
            Err(err)
        }
    }
}

/// GET /api/kits
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Envelope<Vec<Kit>>>> {
    let kits = KitRepo::list(&state.pool).await?;
    Ok(Json(Envelope::success("Kits retrieved", kits)))
}

/// GET /api/kits/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Envelope<Kit>>> {
    let kit = KitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Kit", id }))?;
    Ok(Json(Envelope::success("Kit retrieved", kit)))
}

// ---------------------------------------------------------------------------
// Upload flow
// ---------------------------------------------------------------------------

/// Read the form, store the image, and insert the kit.
///
/// `stored` is set as soon as an image file exists on disk, so the caller
/// can remove it if any later step fails.
async fn persist_upload(
    state: &AppState,
    multipart: &mut Multipart,
    stored: &mut Option<StoredImage>,
) -> AppResult<Kit> {
    let mut fields = KitFieldSet::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == FIELD_IMAGE {
            if stored.is_some() {
                return Err(CoreError::Validation("Only one image may be uploaded".into()).into());
            }
            stream_image(&state.images, field, stored).await?;
        } else {
            let value = field.text().await?;
            fields.insert(&name, value)?;
        }
    }

    let image = stored
        .clone()
        .ok_or_else(|| CoreError::Validation(NO_IMAGE_MESSAGE.into()))?;
    let fields = fields.into_fields()?;

    let input = CreateKit::from_fields(fields, vec![image.filename]);
    let kit = KitRepo::create(&state.pool, &input).await?;
    Ok(kit)
}

/// Stream one file field into the store, recording it in `stored`.
///
/// An empty file part (browsers send one when no file was chosen) is
/// removed again and leaves `stored` as `None`.
async fn stream_image(
    images: &ImageStore,
    mut field: Field<'_>,
    stored: &mut Option<StoredImage>,
) -> AppResult<()> {
    let original_name = field.file_name().map(str::to_string);
    let mut writer = images.create(original_name.as_deref()).await?;
    *stored = Some(writer.image().clone());

    while let Some(chunk) = field.chunk().await? {
        writer.write_chunk(&chunk).await?;
    }

    if writer.written() == 0 {
        let image = writer.image().clone();
        drop(writer);
        images.remove(&image.filename).await?;
        *stored = None;
        return Ok(());
    }

    let written = writer.written();
    let image = writer.finish().await?;
    tracing::debug!(
        filename = %image.filename,
        original = original_name.as_deref().unwrap_or(""),
        bytes = written,
        "Stored uploaded image"
    );
    *stored = Some(image);
    Ok(())
}

/// Remove an upload whose kit was never created. Failures are logged only.
async fn discard_image(images: &ImageStore, image: &StoredImage) {
    match images.remove(&image.filename).await {
        Ok(()) => {
            tracing::warn!(filename = %image.filename, "Removed upload after failed kit creation");
        }
        Err(e) => {
            tracing::error!(
                filename = %image.filename,
                error = %e,
                "Failed to remove orphaned upload"
            );
        }
    }
}
