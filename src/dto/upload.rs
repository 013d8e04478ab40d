use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::upload::UploadRecord;

/// Message returned for any storage or database failure.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Row returned for a single-image upload.
#[derive(Debug, Serialize)]
pub struct SingleUploadDto {
    pub id: i32,
    pub image_path: String,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

/// Row returned for a batch upload. `image_paths` is the JSON-encoded list as
/// stored in the database.
#[derive(Debug, Serialize)]
pub struct BatchUploadDto {
    pub id: i32,
    pub image_paths: String,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

impl From<UploadRecord> for SingleUploadDto {
    fn from(record: UploadRecord) -> Self {
        let image_path = record
            .image_paths
            .into_iter()
            .next()
            .map(String::from)
            .unwrap_or_default();
        Self {
            id: record.id.get(),
            image_path,
            cost: record.cost,
            size: record.size,
            category: record.category,
            uploaded_at: record.uploaded_at,
        }
    }
}

impl TryFrom<UploadRecord> for BatchUploadDto {
    type Error = serde_json::Error;

    fn try_from(record: UploadRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id.get(),
            image_paths: serde_json::to_string(&record.image_paths)?,
            cost: record.cost,
            size: record.size,
            category: record.category,
            uploaded_at: record.uploaded_at,
        })
    }
}
