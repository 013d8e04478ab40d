use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{ImagePath, UploadId};
use crate::domain::upload::{
    NewUploadRecord as DomainNewUploadRecord, UploadRecord as DomainUploadRecord,
};
use crate::repository::errors::RepositoryError;

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct UploadRecord {
    pub id: i32,
    /// JSON array of public image paths.
    pub image_paths: String,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

/// Insertable form of [`UploadRecord`]. `id` and `uploaded_at` come from the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewUploadRecord {
    pub image_paths: String,
    pub cost: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
}

impl TryFrom<UploadRecord> for DomainUploadRecord {
    type Error = RepositoryError;

    fn try_from(record: UploadRecord) -> Result<Self, Self::Error> {
        let image_paths: Vec<ImagePath> = serde_json::from_str(&record.image_paths)?;
        if image_paths.is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "upload {} has no image paths",
                record.id
            )));
        }

        Ok(Self {
            id: UploadId::new(record.id)?,
            image_paths,
            cost: record.cost,
            size: record.size,
            category: record.category,
            uploaded_at: record.uploaded_at,
        })
    }
}

impl TryFrom<&DomainNewUploadRecord> for NewUploadRecord {
    type Error = RepositoryError;

    fn try_from(record: &DomainNewUploadRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            image_paths: serde_json::to_string(record.image_paths())?,
            cost: record.cost.clone(),
            size: record.size.clone(),
            category: record.category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn db_row(image_paths: &str) -> UploadRecord {
        UploadRecord {
            id: 7,
            image_paths: image_paths.to_string(),
            cost: Some("25".into()),
            size: Some("M".into()),
            category: Some("Socks".into()),
            uploaded_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn decodes_json_encoded_paths_in_order() {
        let record: DomainUploadRecord = db_row(r#"["/uploads/2.jpg","/uploads/1.jpg"]"#)
            .try_into()
            .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.image_paths[0], "/uploads/2.jpg");
        assert_eq!(record.image_paths[1], "/uploads/1.jpg");
    }

    #[test]
    fn rejects_rows_without_paths() {
        let result: Result<DomainUploadRecord, _> = db_row("[]").try_into();
        assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    }

    #[test]
    fn rejects_malformed_path_column() {
        let result: Result<DomainUploadRecord, _> = db_row("/uploads/1.jpg").try_into();
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn encodes_paths_as_json_array() {
        let new = DomainNewUploadRecord::new(
            vec![ImagePath::new("/uploads/a.jpg").unwrap()],
            Some("25".into()),
            None,
            Some("Socks".into()),
        )
        .unwrap();

        let row = NewUploadRecord::try_from(&new).unwrap();
        assert_eq!(row.image_paths, r#"["/uploads/a.jpg"]"#);
        assert_eq!(row.size, None);
    }
}
