use std::sync::Arc;

use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{AddRatingRequest, BookQueryParameters, CreateBookRequest, CreateReviewRequest};
use crate::book_query::BookQuery;
use crate::books_repository::{BookRepository, NewBook};
use crate::catalog_error::CatalogError;
use crate::isbn::Isbn;
use crate::rating::Rating;

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn query_books(
    books_repository: Data<Arc<dyn BookRepository>>,
    params: web::Query<BookQueryParameters>,
) -> Result<HttpResponse, Error> {
    let query = BookQuery::try_from(params.into_inner()).map_err(CatalogError::from)?;
    match books_repository.query_books(&query).await {
        Ok(books) => {
            tracing::debug!(found = books.len(), "Books queried");
            Ok(HttpResponse::Ok().json(books))
        }
        Err(err) => {
            tracing::error!("Query books failed {}", err);
            Err(CatalogError::from(err).into())
        }
    }
}

fn validate_new_book(request: CreateBookRequest) -> Result<NewBook, CatalogError> {
    let isbn = Isbn::parse(request.isbn)?;
    for (field, value) in [
        ("title", &request.title),
        ("author", &request.author),
        ("category", &request.category),
    ] {
        if value.trim().is_empty() {
            return Err(CatalogError::MissingField(field));
        }
    }
    Ok(NewBook {
        title: request.title,
        author: request.author,
        category: request.category,
        isbn,
    })
}

#[api_v2_operation]
pub async fn create_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    request: web::Json<CreateBookRequest>,
) -> Result<HttpResponse, Error> {
    let new_book = validate_new_book(request.into_inner())?;
    match books_repository.add_book(new_book).await {
        Ok(book) => {
            tracing::info!(isbn = %book.isbn, "Book created");
            Ok(HttpResponse::Ok().json(book))
        }
        Err(err) => {
            tracing::warn!("Add book failed {}", err);
            Err(CatalogError::from(err).into())
        }
    }
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let isbn = Isbn::parse(isbn.into_inner()).map_err(CatalogError::from)?;
    match books_repository.delete_book(&isbn).await {
        Ok(true) => tracing::info!(%isbn, "Book soft deleted"),
        Ok(false) => tracing::info!(%isbn, "Nothing to delete, book not found"),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            return Err(CatalogError::from(err).into());
        }
    }
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn add_rating(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
    request: web::Json<AddRatingRequest>,
) -> Result<HttpResponse, Error> {
    let isbn = Isbn::parse(isbn.into_inner()).map_err(CatalogError::from)?;
    let rating = Rating::new(request.rating).map_err(CatalogError::from)?;
    match books_repository.add_rating(&isbn, rating).await {
        Ok(true) => tracing::debug!(%isbn, rating = rating.value(), "Rating added"),
        Ok(false) => tracing::info!(%isbn, "Rating ignored, book not found"),
        Err(err) => {
            tracing::error!("Add rating failed {}", err);
            return Err(CatalogError::from(err).into());
        }
    }
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn create_review(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, Error> {
    let isbn = Isbn::parse(isbn.into_inner()).map_err(CatalogError::from)?;
    match books_repository
        .add_review(&isbn, request.into_inner().review)
        .await
    {
        Ok(true) => tracing::debug!(%isbn, "Review added"),
        Ok(false) => tracing::info!(%isbn, "Review dropped, book not found"),
        Err(err) => {
            tracing::error!("Add review failed {}", err);
            return Err(CatalogError::from(err).into());
        }
    }
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_reviews(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let isbn = Isbn::parse(isbn.into_inner()).map_err(CatalogError::from)?;
    match books_repository.get_reviews(&isbn).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(reviews)),
        Err(err) => {
            tracing::error!("Get reviews failed {}", err);
            Err(CatalogError::from(err).into())
        }
    }
}

#[cfg(test)]
mod handler_tests {
    use std::sync::Arc;

    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::web::Data;
    use actix_web::{test, App};
    use paperclip::actix::OpenApiExt;
    use serde_json::json;

    use crate::api::{Book, ErrorResponse};
    use crate::app_config::{config_app, json_config, query_config};
    use crate::books_repository::{BookRepository, InMemoryBookRepository};

    const VALID_ISBN: &str = "4444444444444";
    const INVALID_ISBNS: [&str; 4] = [
        "fffffffff1111",
        "fffffffffffff",
        "111111111111",
        "111111111111111",
    ];

    async fn init_app(
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        let repository: Arc<dyn BookRepository> = Arc::new(InMemoryBookRepository::default());
        test::init_service(
            App::new()
                .wrap_api()
                .app_data(Data::new(repository))
                .app_data(json_config())
                .app_data(query_config())
                .configure(config_app)
                .build(),
        )
        .await
    }

    async fn create_hawking(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    ) {
        let request = test::TestRequest::post()
            .uri("/books")
            .set_json(json!({
                "title": "A Brief History of Time",
                "author": "Stephen Hawking",
                "category": "Science",
                "isbn": VALID_ISBN,
            }))
            .to_request();
        let response = test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn query(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        query_string: &str,
    ) -> Vec<Book> {
        let request = test::TestRequest::get()
            .uri(&format!("/books/q?{query_string}"))
            .to_request();
        let response = test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::OK, "query {query_string}");
        test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn test_health() {
        let app = init_app().await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    /// Creates a book and queries it back by isbn
    async fn test_create_book_and_query_by_isbn() {
        let app = init_app().await;

        let request = test::TestRequest::post()
            .uri("/books")
            .set_json(json!({
                "title": "The Great Gatsby",
                "author": "F. Scott Fitzgerald",
                "category": "Classics",
                "isbn": "9780345533011",
            }))
            .to_request();
        let created: Book = test::call_and_read_body_json(&app, request).await;
        assert_eq!(created.isbn, "9780345533011");
        assert_eq!(created.avg_rating, None);
        assert_eq!(created.num_ratings, 0);
        assert!(!created.soft_deleted);

        create_hawking(&app).await;

        assert_eq!(query(&app, "isbn=9780345533011").await, vec![created]);
        assert_eq!(query(&app, "").await.len(), 2);
    }

    #[actix_web::test]
    async fn test_create_book_validation() {
        let app = init_app().await;

        let invalid_bodies = [
            json!({"title": "T", "author": "A B", "category": "C", "isbn": "foobar1234"}),
            json!({"title": "T", "author": "A B", "category": "C"}),
            json!({"title": "", "author": "A B", "category": "C", "isbn": VALID_ISBN}),
            json!({"title": "T", "author": "  ", "category": "C", "isbn": VALID_ISBN}),
            json!({"title": "T", "author": "A B", "category": 5, "isbn": VALID_ISBN}),
        ];
        for body in invalid_bodies {
            let request = test::TestRequest::post()
                .uri("/books")
                .set_json(&body)
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{body}"
            );
        }
        assert_eq!(query(&app, "").await, Vec::<Book>::new());

        create_hawking(&app).await;
        let request = test::TestRequest::post()
            .uri("/books")
            .set_json(json!({"title": "T", "author": "A B", "category": "C", "isbn": VALID_ISBN}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert!(error.error.contains(VALID_ISBN));
    }

    #[actix_web::test]
    async fn test_query_validation() {
        let app = init_app().await;

        for isbn in INVALID_ISBNS {
            let request = test::TestRequest::get()
                .uri(&format!("/books/q?isbn={isbn}"))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{isbn}");
        }

        for query_string in [
            "top=0",
            "top=-1",
            "top=abc",
            "min_rating=low",
            "min_rating=NaN",
            "max_rating=inf",
            "min_rating=1&max_rating=NaN",
        ] {
            let request = test::TestRequest::get()
                .uri(&format!("/books/q?{query_string}"))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{query_string}"
            );
        }

        for query_string in ["min_rating=5.0&max_rating=1.0", "min_rating=3.0&max_rating=3.0"] {
            let request = test::TestRequest::get()
                .uri(&format!(
                    "/books/q?author=John%20Doe&category=Cooking&isbn={VALID_ISBN}&{query_string}"
                ))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query_string}");
        }
    }

    #[actix_web::test]
    /// Rates a book three times and checks the aggregated values
    async fn test_average_and_number_of_ratings_is_correctly_calculated() {
        let app = init_app().await;
        create_hawking(&app).await;

        for rating in [2.0, 3.0, 4.5] {
            let request = test::TestRequest::post()
                .uri(&format!("/books/{VALID_ISBN}/ratings"))
                .set_json(json!({ "rating": rating }))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let books = query(&app, &format!("isbn={VALID_ISBN}")).await;
        assert_eq!(books[0].num_ratings, 3);
        let avg = books[0].avg_rating.unwrap();
        assert!((avg - 3.17).abs() < 1e-2);

        assert_eq!(query(&app, "min_rating=3&max_rating=3.5").await, books);
        assert_eq!(query(&app, "min_rating=3.5").await, Vec::<Book>::new());
    }

    #[actix_web::test]
    async fn test_rating_validation() {
        let app = init_app().await;
        create_hawking(&app).await;

        for rating in [-1.0, -0.5, 0.0, 0.5, 5.5, 6.0] {
            let request = test::TestRequest::post()
                .uri(&format!("/books/{VALID_ISBN}/ratings"))
                .set_json(json!({ "rating": rating }))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{rating}"
            );
        }

        for step in 2..=10 {
            let request = test::TestRequest::post()
                .uri(&format!("/books/{VALID_ISBN}/ratings"))
                .set_json(json!({ "rating": step as f64 * 0.5 }))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        for isbn in INVALID_ISBNS {
            let request = test::TestRequest::post()
                .uri(&format!("/books/{isbn}/ratings"))
                .set_json(json!({ "rating": 2.5 }))
                .to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{isbn}");
        }

        // unknown book is a no-op
        let request = test::TestRequest::post()
            .uri("/books/0000000000000/ratings")
            .set_json(json!({ "rating": 2.5 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );
    }

    #[actix_web::test]
    async fn test_delete_book() {
        let app = init_app().await;

        let request = test::TestRequest::delete()
            .uri("/books/foobar1234")
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        // deleting a book that does not exist succeeds
        let request = test::TestRequest::delete()
            .uri(&format!("/books/{VALID_ISBN}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );

        create_hawking(&app).await;
        let request = test::TestRequest::delete()
            .uri(&format!("/books/{VALID_ISBN}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );

        assert_eq!(query(&app, "").await, Vec::<Book>::new());
        let with_deleted = query(&app, "return_deleted_books=true").await;
        assert_eq!(with_deleted.len(), 1);
        assert!(with_deleted[0].soft_deleted);
    }

    #[actix_web::test]
    async fn test_reviews() {
        let app = init_app().await;
        create_hawking(&app).await;

        let request = test::TestRequest::get()
            .uri(&format!("/books/{VALID_ISBN}/reviews"))
            .to_request();
        let reviews: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reviews, Vec::<String>::new());

        let request = test::TestRequest::post()
            .uri(&format!("/books/{VALID_ISBN}/reviews"))
            .set_json(json!({ "review": "This is a great book!" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );

        let request = test::TestRequest::get()
            .uri(&format!("/books/{VALID_ISBN}/reviews"))
            .to_request();
        let reviews: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reviews, vec!["This is a great book!".to_string()]);

        // after deletion new reviews are dropped and stored ones stay readable
        let request = test::TestRequest::delete()
            .uri(&format!("/books/{VALID_ISBN}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );
        let request = test::TestRequest::post()
            .uri(&format!("/books/{VALID_ISBN}/reviews"))
            .set_json(json!({ "review": "Too late" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );
        let request = test::TestRequest::get()
            .uri(&format!("/books/{VALID_ISBN}/reviews"))
            .to_request();
        let reviews: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reviews, vec!["This is a great book!".to_string()]);

        // review of unknown book is accepted but not stored
        let request = test::TestRequest::post()
            .uri("/books/0000000000000/reviews")
            .set_json(json!({ "review": "Yay!" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, request).await.status(),
            StatusCode::OK
        );
        let request = test::TestRequest::get()
            .uri("/books/0000000000000/reviews")
            .to_request();
        let reviews: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reviews, Vec::<String>::new());

        for isbn in INVALID_ISBNS {
            let request = test::TestRequest::post()
                .uri(&format!("/books/{isbn}/reviews"))
                .set_json(json!({ "review": "Yay!" }))
                .to_request();
            assert_eq!(
                test::call_service(&app, request).await.status(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
            let request = test::TestRequest::get()
                .uri(&format!("/books/{isbn}/reviews"))
                .to_request();
            assert_eq!(
                test::call_service(&app, request).await.status(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }
    }
}
