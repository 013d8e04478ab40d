use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, post, web};

use crate::dto::upload::{BatchUploadDto, SingleUploadDto, SuccessResponse, UPLOAD_FAILED};
use crate::forms::upload::{UploadProductForm, UploadVariant};
use crate::repository::DieselRepository;
use crate::routes::{bad_request, internal_error, multipart_rejection};
use crate::services::ServiceError;
use crate::services::upload::{UploadReceipt, upload_product as upload_product_service};
use crate::storage::UploadStorage;

#[post("/upload")]
pub async fn upload_product(
    repo: web::Data<DieselRepository>,
    storage: web::Data<UploadStorage>,
    form: Result<MultipartForm<UploadProductForm>, actix_web::Error>,
) -> impl Responder {
    let form = match form {
        Ok(MultipartForm(form)) => form,
        Err(err) => return multipart_rejection(err),
    };

    match upload_product_service(&form, storage.get_ref(), repo.get_ref()) {
        Ok(receipt) => render_receipt(receipt),
        Err(ServiceError::Form(message)) => bad_request(message),
        Err(err) => {
            log::error!("Failed to handle upload: {err}");
            internal_error(UPLOAD_FAILED)
        }
    }
}

fn render_receipt(receipt: UploadReceipt) -> HttpResponse {
    match receipt.variant {
        UploadVariant::Single => {
            HttpResponse::Ok().json(SuccessResponse::new(SingleUploadDto::from(receipt.record)))
        }
        UploadVariant::Batch => match BatchUploadDto::try_from(receipt.record) {
            Ok(dto) => HttpResponse::Ok().json(SuccessResponse::new(dto)),
            Err(e) => {
                log::error!("Failed to encode image paths: {e}");
                internal_error(UPLOAD_FAILED)
            }
        },
    }
}
