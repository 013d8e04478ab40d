use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImagePath, TypeConstraintError, UploadId};

/// Categories offered by the supplier app. The server stores any string.
pub const KNOWN_CATEGORIES: [&str; 4] = [
    "Socks",
    "Children's Clothes",
    "Women's Dresses",
    "Women's Shorts",
];

/// Returns `true` when `category` is one of [`KNOWN_CATEGORIES`].
pub fn is_known_category(category: &str) -> bool {
    KNOWN_CATEGORIES.contains(&category)
}

/// One stored upload batch: the files of a single submission and its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadRecord {
    pub id: UploadId,
    /// Stored files in submission order. Never empty.
    pub image_paths: Vec<ImagePath>,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    /// Assigned by the store on insert.
    pub uploaded_at: NaiveDateTime,
}

/// Data required to insert a new [`UploadRecord`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUploadRecord {
    image_paths: Vec<ImagePath>,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
}

impl NewUploadRecord {
    /// Builds a new record, refusing an empty list of stored files.
    pub fn new(
        image_paths: Vec<ImagePath>,
        cost: Option<String>,
        size: Option<String>,
        category: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        if image_paths.is_empty() {
            return Err(TypeConstraintError::NoImages);
        }
        Ok(Self {
            image_paths,
            cost,
            size,
            category,
        })
    }

    pub fn image_paths(&self) -> &[ImagePath] {
        &self.image_paths
    }
}
