use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;

/// Maximum number of `images` parts accepted in one batch upload.
pub const MAX_BATCH_FILES: usize = 10;

/// Multipart body of `POST /upload`.
///
/// A single-image upload sends one `image` part, a batch upload sends up to
/// [`MAX_BATCH_FILES`] `images` parts. Text fields are optional and stored as
/// sent.
#[derive(MultipartForm)]
pub struct UploadProductForm {
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
    pub cost: Option<Text<String>>,
    pub size: Option<Text<String>>,
    pub category: Option<Text<String>>,
}

/// Which shape of upload the client sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadVariant {
    /// One file under `image`.
    Single,
    /// One or more files under `images`.
    Batch,
}

/// A received file part waiting to be copied into the content directory.
#[derive(Debug, Clone, Copy)]
pub struct IncomingFile<'a> {
    pub original_name: Option<&'a str>,
    pub path: &'a Path,
}

/// Validated view over an [`UploadProductForm`].
#[derive(Debug)]
pub struct UploadFormPayload<'a> {
    pub variant: UploadVariant,
    /// Files in submission order. Never empty.
    pub files: Vec<IncomingFile<'a>>,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadFormError {
    #[error("No file uploaded")]
    NoFiles,
    #[error("Too many files: at most {MAX_BATCH_FILES} images per upload")]
    TooManyFiles,
    #[error("Send either image or images, not both")]
    MixedFields,
}

impl UploadProductForm {
    /// Checks the file parts and returns them in submission order.
    ///
    /// Nothing is written here, so a rejected form leaves no trace on disk.
    pub fn payload(&self) -> Result<UploadFormPayload<'_>, UploadFormError> {
        let single = self.image.as_ref().filter(|file| is_present(file));
        let batch = self
            .images
            .iter()
            .filter(|file| is_present(file))
            .collect::<Vec<_>>();

        let (variant, files) = match (single, batch.is_empty()) {
            (Some(_), false) => return Err(UploadFormError::MixedFields),
            (Some(file), true) => (UploadVariant::Single, vec![file]),
            (None, false) => (UploadVariant::Batch, batch),
            (None, true) => return Err(UploadFormError::NoFiles),
        };

        if files.len() > MAX_BATCH_FILES {
            return Err(UploadFormError::TooManyFiles);
        }

        Ok(UploadFormPayload {
            variant,
            files: files
                .into_iter()
                .map(|file| IncomingFile {
                    original_name: file.file_name.as_deref(),
                    path: file.file.path(),
                })
                .collect(),
            cost: text_value(&self.cost),
            size: text_value(&self.size),
            category: text_value(&self.category),
        })
    }
}

/// Browsers send an empty, unnamed part for an untouched file input.
fn is_present(file: &TempFile) -> bool {
    let named = file.file_name.as_deref().is_some_and(|name| !name.is_empty());
    named || file.size > 0
}

fn text_value(field: &Option<Text<String>>) -> Option<String> {
    field.as_ref().map(|text| text.0.clone())
}
