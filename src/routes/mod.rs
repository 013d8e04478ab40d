use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::MultipartError;
use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::dto::upload::ErrorResponse;
use crate::forms::upload::UploadFormError;
use crate::models::config::{ANY_ORIGIN, ServerConfig};
use crate::repository::DieselRepository;
use crate::storage::UploadStorage;

pub mod upload;

/// Registers the upload API and the static file server.
///
/// Everything the handlers need is passed in explicitly so that tests can run
/// against their own database and content directory.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    repo: DieselRepository,
    storage: UploadStorage,
    server_config: &ServerConfig,
) {
    let multipart_config = MultipartFormConfig::default()
        .total_limit(server_config.upload_total_limit)
        .memory_limit(server_config.upload_memory_limit)
        .error_handler(multipart_error_handler);

    cfg.app_data(web::Data::new(repo))
        .app_data(web::Data::new(storage.clone()))
        .app_data(multipart_config)
        .service(upload::upload_product)
        .service(Files::new(storage.public_prefix(), storage.root()));
}

/// CORS policy for the API and the static files.
///
/// `*` in `cors_allowed_origins` allows every origin.
pub fn cors(server_config: &ServerConfig) -> Cors {
    let origins = &server_config.cors_allowed_origins;
    if origins.iter().any(|origin| origin == ANY_ORIGIN) {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_any_header()
        .max_age(3600)
}

fn multipart_error_handler(err: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected multipart payload: {err}");
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Response for a request the multipart extractor refused.
///
/// Errors that went through [`multipart_error_handler`] already carry their
/// JSON body. A raw [`MultipartError`] only comes from the content-type check,
/// which runs before any part is read, so the request held no file parts.
pub(crate) fn multipart_rejection(err: actix_web::Error) -> HttpResponse {
    match err.as_error::<MultipartError>() {
        Some(multipart_err) => {
            log::warn!("Rejected non-multipart upload: {multipart_err}");
            bad_request(UploadFormError::NoFiles.to_string())
        }
        None => err.error_response(),
    }
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

pub(crate) fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(message))
}
