//! Content directory holding uploaded files.
//!
//! Files are written once under a generated name and never modified. The same
//! directory is mounted read-only under [`PUBLIC_UPLOADS_PREFIX`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{
    ImagePath, PUBLIC_UPLOADS_PREFIX, StoredFileName, TypeConstraintError,
};

/// Name used when the client sends no usable original file name.
const FALLBACK_FILE_NAME: &str = "upload";

/// Longest stem kept from the original name. With the `<millis>-<token>-`
/// prefix this keeps generated names well under the 255-byte NAME_MAX.
const MAX_STEM_LEN: usize = 100;
/// Longer suffixes are not treated as an extension.
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create content directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to read uploaded part {path}: {source}")]
    ReadSource { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid generated file name: {0}")]
    InvalidName(#[from] TypeConstraintError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A file persisted in the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: StoredFileName,
    pub public_path: ImagePath,
    pub disk_path: PathBuf,
    pub size: u64,
}

/// Local content directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Opens the content directory, creating it when absent.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL prefix the directory is served under.
    pub fn public_prefix(&self) -> &'static str {
        PUBLIC_UPLOADS_PREFIX
    }

    /// Copies the file at `source` into the content directory under a fresh
    /// generated name and syncs it to disk.
    pub fn store_from_path(
        &self,
        original_name: Option<&str>,
        source: &Path,
    ) -> StorageResult<StoredFile> {
        let mut input = File::open(source).map_err(|source_err| StorageError::ReadSource {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        self.store(original_name, &mut input)
    }

    /// Writes everything from `reader` into the content directory under a
    /// fresh generated name and syncs it to disk.
    pub fn store<R: io::Read>(
        &self,
        original_name: Option<&str>,
        reader: &mut R,
    ) -> StorageResult<StoredFile> {
        let file_name = generate_file_name(original_name)?;
        let disk_path = self.root.join(file_name.as_str());
        let write_err = |source: io::Error| StorageError::Write {
            path: disk_path.clone(),
            source,
        };

        // create_new: a name collision fails the upload instead of overwriting.
        let mut output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&disk_path)
            .map_err(write_err)?;
        let size = io::copy(reader, &mut output).map_err(write_err)?;
        output.flush().map_err(write_err)?;
        output.sync_all().map_err(write_err)?;

        log::debug!("Stored {size} bytes at {}", disk_path.display());

        Ok(StoredFile {
            public_path: file_name.public_path(),
            file_name,
            disk_path,
            size,
        })
    }

    /// Path on disk for a public image path.
    pub fn disk_path(&self, image_path: &ImagePath) -> PathBuf {
        self.root.join(image_path.file_name())
    }
}

/// `<millis>-<token>-<sanitized original name>`.
pub fn generate_file_name(
    original_name: Option<&str>,
) -> Result<StoredFileName, TypeConstraintError> {
    let millis = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple();
    let name = sanitize_file_name(original_name.unwrap_or_default());
    StoredFileName::new(format!("{millis}-{token}-{name}"))
}

/// Keeps the last path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_` and shortens long stems, keeping the extension.
pub fn sanitize_file_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        truncate_stem(cleaned)
    }
}

// `name` is ASCII here, so byte slicing stays on char boundaries.
fn truncate_stem(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && extension.len() <= MAX_EXTENSION_LEN => {
            (stem, Some(extension))
        }
        _ => (name, None),
    };
    let stem = &stem[..stem.len().min(MAX_STEM_LEN)];

    match extension {
        Some(extension) => format!("{stem}.{extension}"),
        None => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\IMG 01.png"), "IMG_01.png");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_file_name("фото.jpg"), "____.jpg");
    }

    #[test]
    fn sanitize_falls_back_for_empty_or_hidden_names() {
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("dir/"), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(".env"), "env");
    }

    #[test]
    fn sanitize_shortens_long_names_keeping_extension() {
        let long = format!("{}.jpg", "a".repeat(220));

        let sanitized = sanitize_file_name(&long);

        assert_eq!(sanitized, format!("{}.jpg", "a".repeat(MAX_STEM_LEN)));
        assert_eq!(sanitize_file_name(&"b".repeat(300)), "b".repeat(MAX_STEM_LEN));
        assert_eq!(
            sanitize_file_name(&format!("a.{}", "x".repeat(200))).len(),
            MAX_STEM_LEN
        );
    }

    #[test]
    fn store_accepts_long_original_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path()).unwrap();
        let long = format!("{}.jpg", "a".repeat(220));

        let stored = storage
            .store(Some(&long), &mut Cursor::new(b"jpeg-bytes".to_vec()))
            .unwrap();

        assert!(stored.file_name.as_str().len() < 255);
        assert!(stored.file_name.as_str().ends_with(".jpg"));
        assert_eq!(fs::read(&stored.disk_path).unwrap(), b"jpeg-bytes");
    }

    #[test]
    fn generated_names_are_unique_and_keep_original() {
        let a = generate_file_name(Some("photo.jpg")).unwrap();
        let b = generate_file_name(Some("photo.jpg")).unwrap();

        assert_ne!(a, b);
        assert!(a.as_str().ends_with("-photo.jpg"));

        let (millis, _) = a.as_str().split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn creates_missing_content_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");

        let storage = UploadStorage::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(storage.root(), root.as_path());
    }

    #[test]
    fn store_writes_bytes_under_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path()).unwrap();

        let stored = storage
            .store(Some("photo.jpg"), &mut Cursor::new(b"jpeg-bytes".to_vec()))
            .unwrap();

        assert_eq!(stored.size, 10);
        assert_eq!(
            stored.public_path.as_str(),
            format!("/uploads/{}", stored.file_name)
        );
        assert_eq!(storage.disk_path(&stored.public_path), stored.disk_path);
        assert_eq!(fs::read(&stored.disk_path).unwrap(), b"jpeg-bytes");
    }

    #[test]
    fn store_from_path_copies_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path().join("uploads")).unwrap();
        let source = dir.path().join("incoming.tmp");
        fs::write(&source, b"abc").unwrap();

        let stored = storage.store_from_path(None, &source).unwrap();

        assert!(stored.file_name.as_str().ends_with("-upload"));
        assert_eq!(fs::read(&stored.disk_path).unwrap(), b"abc");
    }

    #[test]
    fn store_from_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path()).unwrap();

        let err = storage
            .store_from_path(Some("a.jpg"), &dir.path().join("missing"))
            .unwrap_err();

        assert!(matches!(err, StorageError::ReadSource { .. }));
    }
}
