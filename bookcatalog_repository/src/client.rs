use anyhow::{bail, Context};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryPolicy, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{
    AddRatingRequest, Book, BookQueryParameters, CreateBookRequest, CreateReviewRequest,
    ErrorResponse,
};

const MAX_RETRIES: u32 = 3;

pub struct BookCatalogClient {
    url: String,
    /// Used for GET and DELETE, which are safe to repeat
    client: ClientWithMiddleware,
    /// Used for POST, a retried rating would be recorded twice
    non_retrying_client: ClientWithMiddleware,
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let error = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_default();
    format!("{status} {error}")
}

impl BookCatalogClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_retry_policy(
            url,
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES),
        )
    }

    pub fn with_retry_policy(
        url: &str,
        retry_policy: impl RetryPolicy + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client.clone())
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let non_retrying_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            non_retrying_client,
        })
    }

    /// Calls GET /health endpoint
    pub async fn health(&self) -> anyhow::Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// Calls GET /books/q endpoint
    pub async fn query_books(&self, params: &BookQueryParameters) -> anyhow::Result<Vec<Book>> {
        let response = self
            .client
            .get(format!("{}/books/q", self.url))
            .query(params)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to query books {}", error_message(response).await)
        }
    }

    /// Calls POST /books endpoint
    /// Returns the created book
    pub async fn create_book(&self, request: &CreateBookRequest) -> anyhow::Result<Book> {
        let response = self
            .non_retrying_client
            .post(format!("{}/books", self.url))
            .json(request)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to create book {}", error_message(response).await)
        }
    }

    /// Calls DELETE /books/{isbn} endpoint
    /// Succeeds also when there was no book to delete
    pub async fn delete_book(&self, isbn: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(format!("{}/books/{}", self.url, isbn))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to delete book {}", error_message(response).await)
        }
        Ok(())
    }

    /// Calls POST /books/{isbn}/ratings endpoint
    pub async fn add_rating(&self, isbn: &str, rating: f64) -> anyhow::Result<()> {
        let response = self
            .non_retrying_client
            .post(format!("{}/books/{}/ratings", self.url, isbn))
            .json(&AddRatingRequest { rating })
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to add rating {}", error_message(response).await)
        }
        Ok(())
    }

    /// Calls POST /books/{isbn}/reviews endpoint
    pub async fn add_review(&self, isbn: &str, review: &str) -> anyhow::Result<()> {
        let response = self
            .non_retrying_client
            .post(format!("{}/books/{}/reviews", self.url, isbn))
            .json(&CreateReviewRequest {
                review: review.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to add review {}", error_message(response).await)
        }
        Ok(())
    }

    /// Calls GET /books/{isbn}/reviews endpoint
    /// Returns empty list for books without reviews
    pub async fn get_reviews(&self, isbn: &str) -> anyhow::Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/books/{}/reviews", self.url, isbn))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to get reviews {}", error_message(response).await)
        }
    }
}
