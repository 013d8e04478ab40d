use crate::domain::upload::{NewUploadRecord, UploadRecord, is_known_category};
use crate::forms::upload::{UploadProductForm, UploadVariant};
use crate::repository::UploadWriter;
use crate::storage::UploadStorage;

use super::{ServiceError, ServiceResult};

/// Outcome of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub variant: UploadVariant,
    pub record: UploadRecord,
}

/// Core business logic for `POST /upload`.
///
/// Validates the file parts, copies every file into the content directory in
/// submission order and then inserts one record referencing all of them.
/// Files are written before the row and are not removed if the insert fails,
/// so a failed request can leave orphaned files behind.
pub fn upload_product<R>(
    form: &UploadProductForm,
    storage: &UploadStorage,
    repo: &R,
) -> ServiceResult<UploadReceipt>
where
    R: UploadWriter,
{
    let payload = form.payload()?;

    if let Some(category) = payload.category.as_deref() {
        if !is_known_category(category) {
            log::debug!("Accepting upload with unlisted category {category:?}");
        }
    }

    let mut image_paths = Vec::with_capacity(payload.files.len());
    for file in &payload.files {
        match storage.store_from_path(file.original_name, file.path) {
            Ok(stored) => image_paths.push(stored.public_path),
            Err(e) => {
                log::error!("Failed to store uploaded file: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    let file_count = image_paths.len();
    let new_upload =
        NewUploadRecord::new(image_paths, payload.cost, payload.size, payload.category)?;

    match repo.create_upload(&new_upload) {
        Ok(record) => {
            log::info!("Stored upload {} with {file_count} image(s)", record.id);
            Ok(UploadReceipt {
                variant: payload.variant,
                record,
            })
        }
        Err(e) => {
            log::error!("Failed to record upload of {file_count} stored file(s): {e}");
            Err(ServiceError::Internal)
        }
    }
}
