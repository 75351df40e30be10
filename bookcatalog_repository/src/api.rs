use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

use crate::rating::Rating;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Book record stored in the catalog together with its rating state
pub struct Book {
    pub title: String,
    pub author: String,
    pub category: String,
    pub isbn: String,
    /// Average of all ratings, null until the first rating is submitted
    pub avg_rating: Option<f64>,
    pub num_ratings: u32,
    pub sum_ratings: f64,
    pub soft_deleted: bool,
}

impl Book {
    /// Accumulates the rating and recomputes the average as sum / count
    pub fn record_rating(&mut self, rating: Rating) {
        self.num_ratings += 1;
        self.sum_ratings += rating.value();
        self.avg_rating = Some(self.sum_ratings / f64::from(self.num_ratings));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Body of POST /books
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub category: String,
    pub isbn: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Body of POST /books/{isbn}/ratings
pub struct AddRatingRequest {
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Body of POST /books/{isbn}/reviews
pub struct CreateReviewRequest {
    pub review: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Query string of GET /books/q, every filter is optional
pub struct BookQueryParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Maximal number of books returned, must be positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    #[serde(default)]
    pub return_deleted_books: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}
