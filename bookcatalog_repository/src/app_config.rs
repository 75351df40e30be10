use std::fmt;

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use paperclip::actix::web;

use crate::api::ErrorResponse;
use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/books")
                .service(web::resource("").route(web::post().to(handlers::create_book)))
                // registered before /{isbn} so that "q" is never taken for an isbn
                .service(web::resource("/q").route(web::get().to(handlers::query_books)))
                .service(
                    web::scope("/{isbn}")
                        .service(web::resource("").route(web::delete().to(handlers::delete_book)))
                        .service(
                            web::resource("/ratings").route(web::post().to(handlers::add_rating)),
                        )
                        .service(
                            web::resource("/reviews")
                                .route(web::post().to(handlers::create_review))
                                .route(web::get().to(handlers::get_reviews)),
                        ),
                ),
        );
}

/// Malformed bodies and query strings are rejected with 422 and json error body
fn unprocessable_entity<E>(err: E, req: &HttpRequest) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    tracing::debug!("Rejecting malformed request to {}: {}", req.path(), err);
    let response = HttpResponse::UnprocessableEntity().json(ErrorResponse {
        error: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

pub fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default().error_handler(unprocessable_entity::<JsonPayloadError>)
}

pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(unprocessable_entity::<QueryPayloadError>)
}
