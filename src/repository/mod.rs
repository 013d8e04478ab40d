use crate::db::{DbConnection, DbPool};
use crate::domain::types::UploadId;
use crate::domain::upload::{NewUploadRecord, UploadRecord};

pub mod errors;
pub mod upload;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for upload records.
///
/// The HTTP API never reads records back. These queries exist for
/// verification: integration tests and operational checks against a live
/// database.
pub trait UploadReader {
    /// Retrieve an upload by its identifier.
    fn get_upload_by_id(&self, id: UploadId) -> RepositoryResult<Option<UploadRecord>>;
    /// Count stored uploads.
    fn count_uploads(&self) -> RepositoryResult<usize>;
}

/// Write operations for upload records. Records are insert-only.
pub trait UploadWriter {
    /// Persist a new upload and return the stored row, including the
    /// identifier and timestamp assigned by the database.
    fn create_upload(&self, upload: &NewUploadRecord) -> RepositoryResult<UploadRecord>;
}
