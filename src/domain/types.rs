//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers and stored-file references are checked at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// URL prefix under which stored files are served.
pub const PUBLIC_UPLOADS_PREFIX: &str = "/uploads";

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A stored file name contained a path separator or a parent reference.
    #[error("{0} must be a plain file name")]
    InvalidFileName(&'static str),
    /// An image path did not point into the public uploads prefix.
    #[error("image path must start with {PUBLIC_UPLOADS_PREFIX}/")]
    InvalidImagePath,
    /// An upload batch carried no stored files.
    #[error("an upload must reference at least one image")]
    NoImages,
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(UploadId, "Identifier of a stored upload batch.", "upload id");

/// Name of a file inside the content directory.
///
/// Always a single path component: no separators, no `.`/`..`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct StoredFileName(String);

impl StoredFileName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TypeConstraintError::EmptyString("file name"));
        }
        if value.contains(['/', '\\']) || value == "." || value == ".." {
            return Err(TypeConstraintError::InvalidFileName("file name"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public path under which the file is served.
    pub fn public_path(&self) -> ImagePath {
        ImagePath(format!("{PUBLIC_UPLOADS_PREFIX}/{}", self.0))
    }
}

impl Display for StoredFileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StoredFileName {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoredFileName> for String {
    fn from(value: StoredFileName) -> Self {
        value.0
    }
}

/// Public reference to a stored file, e.g. `/uploads/1700000000000-ab12-photo.jpg`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

impl ImagePath {
    /// Parses a public path, requiring the uploads prefix and a plain file name.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let file_name = value
            .strip_prefix(PUBLIC_UPLOADS_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or(TypeConstraintError::InvalidImagePath)?;
        StoredFileName::new(file_name).map_err(|_| TypeConstraintError::InvalidImagePath)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name component, relative to the content directory.
    pub fn file_name(&self) -> &str {
        &self.0[PUBLIC_UPLOADS_PREFIX.len() + 1..]
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImagePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ImagePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for ImagePath {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ImagePath {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

impl PartialEq<&str> for ImagePath {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_id_rejects_non_positive_values() {
        assert!(UploadId::new(1).is_ok());
        assert_eq!(
            UploadId::new(0),
            Err(TypeConstraintError::NonPositiveId("upload id"))
        );
        assert!(UploadId::new(-5).is_err());
    }

    #[test]
    fn stored_file_name_rejects_path_components() {
        assert!(StoredFileName::new("1-abc-photo.jpg").is_ok());
        assert!(StoredFileName::new("../etc/passwd").is_err());
        assert!(StoredFileName::new("a\\b.jpg").is_err());
        assert!(StoredFileName::new("..").is_err());
        assert!(StoredFileName::new("   ").is_err());
    }

    #[test]
    fn stored_file_name_maps_to_public_path() {
        let name = StoredFileName::new("1-abc-photo.jpg").unwrap();
        assert_eq!(name.public_path(), "/uploads/1-abc-photo.jpg");
    }

    #[test]
    fn image_path_requires_uploads_prefix() {
        let path = ImagePath::new("/uploads/1-abc-photo.jpg").unwrap();
        assert_eq!(path.file_name(), "1-abc-photo.jpg");

        assert_eq!(
            ImagePath::new("/static/photo.jpg"),
            Err(TypeConstraintError::InvalidImagePath)
        );
        assert!(ImagePath::new("/uploads/").is_err());
        assert!(ImagePath::new("/uploads/../secret").is_err());
        assert!(ImagePath::new("/uploadsphoto.jpg").is_err());
    }

    #[test]
    fn image_path_deserialization_validates() {
        let ok: Result<Vec<ImagePath>, _> = serde_json::from_str(r#"["/uploads/a.jpg"]"#);
        assert_eq!(ok.unwrap().len(), 1);

        let bad: Result<Vec<ImagePath>, _> = serde_json::from_str(r#"["a.jpg"]"#);
        assert!(bad.is_err());
    }
}
