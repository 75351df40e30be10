pub use in_memory_books_repository::InMemoryBookRepository;

use crate::api::Book;
use crate::book_query::BookQuery;
use crate::isbn::Isbn;
use crate::rating::Rating;

mod in_memory_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} already exists")]
    DuplicateIsbn(Isbn),
}

/// Validated details of a book to be added to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub isbn: Isbn,
}

impl From<NewBook> for Book {
    fn from(new_book: NewBook) -> Self {
        Book {
            title: new_book.title,
            author: new_book.author,
            category: new_book.category,
            isbn: new_book.isbn.to_string(),
            avg_rating: None,
            num_ratings: 0,
            sum_ratings: 0.0,
            soft_deleted: false,
        }
    }
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Adds book to the catalog, returns the stored record
    async fn add_book(&self, new_book: NewBook) -> Result<Book, BookRepositoryError>;
    /// Returns books matching the query, sorted by author surname
    async fn query_books(&self, query: &BookQuery) -> Result<Vec<Book>, BookRepositoryError>;
    /// Soft deletes the book, returns false if there was no active book with given isbn
    async fn delete_book(&self, isbn: &Isbn) -> Result<bool, BookRepositoryError>;
    /// Adds rating to the book, returns false if there was no active book with given isbn
    async fn add_rating(&self, isbn: &Isbn, rating: Rating) -> Result<bool, BookRepositoryError>;
    /// Stores review of the book, returns false (and drops the review) if there was no active book with given isbn
    async fn add_review(&self, isbn: &Isbn, review: String) -> Result<bool, BookRepositoryError>;
    /// Returns all reviews of the book in submission order
    async fn get_reviews(&self, isbn: &Isbn) -> Result<Vec<String>, BookRepositoryError>;
}
