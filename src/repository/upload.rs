use diesel::prelude::*;

use crate::domain::types::UploadId;
use crate::domain::upload::{NewUploadRecord, UploadRecord};
use crate::models::upload::{NewUploadRecord as DbNewUploadRecord, UploadRecord as DbUploadRecord};
use crate::repository::{DieselRepository, RepositoryResult, UploadReader, UploadWriter};

impl UploadReader for DieselRepository {
    fn get_upload_by_id(&self, id: UploadId) -> RepositoryResult<Option<UploadRecord>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let upload = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbUploadRecord>(&mut conn)
            .optional()?;

        let upload = upload.map(TryInto::try_into).transpose()?;
        Ok(upload)
    }

    fn count_uploads(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let total = products::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl UploadWriter for DieselRepository {
    fn create_upload(&self, upload: &NewUploadRecord) -> RepositoryResult<UploadRecord> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_upload = DbNewUploadRecord::try_from(upload)?;

        let stored = diesel::insert_into(products::table)
            .values(&db_upload)
            .get_result::<DbUploadRecord>(&mut conn)?;

        stored.try_into()
    }
}
