use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::api::ErrorResponse;
use crate::book_query::BookQueryError;
use crate::books_repository::BookRepositoryError;
use crate::isbn::InvalidIsbn;
use crate::rating::InvalidRating;

/// Error returned by the catalog handlers, converted into an http response with json body
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    InvalidIsbn(#[from] InvalidIsbn),

    #[error(transparent)]
    InvalidRating(#[from] InvalidRating),

    #[error("Field {0} must not be empty")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidQuery(#[from] BookQueryError),

    #[error(transparent)]
    Repository(#[from] BookRepositoryError),
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::InvalidIsbn(_)
            | CatalogError::InvalidRating(_)
            | CatalogError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::InvalidQuery(BookQueryError::InvalidRatingRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            CatalogError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Repository(BookRepositoryError::DuplicateIsbn(_)) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
