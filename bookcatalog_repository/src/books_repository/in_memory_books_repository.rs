use std::collections::HashMap;

use crate::api::Book;
use crate::book_query::BookQuery;
use crate::books_repository::{BookRepository, BookRepositoryError, NewBook};
use crate::isbn::Isbn;
use crate::rating::Rating;

/// Catalog kept in process memory.
/// Lock order is always books before reviews.
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: parking_lot::RwLock<Vec<Book>>,
    reviews: parking_lot::RwLock<HashMap<Isbn, Vec<String>>>,
}

fn find_active<'a>(books: &'a mut [Book], isbn: &Isbn) -> Option<&'a mut Book> {
    books
        .iter_mut()
        .find(|book| !book.soft_deleted && book.isbn == isbn.as_str())
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(&self, new_book: NewBook) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if find_active(&mut locked_books, &new_book.isbn).is_some() {
            return Err(BookRepositoryError::DuplicateIsbn(new_book.isbn));
        }
        let book = Book::from(new_book);
        locked_books.push(book.clone());
        Ok(book)
    }

    async fn query_books(&self, query: &BookQuery) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(query.apply(self.books.read().iter()))
    }

    async fn delete_book(&self, isbn: &Isbn) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if let Some(book) = find_active(&mut locked_books, isbn) {
            book.soft_deleted = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn add_rating(&self, isbn: &Isbn, rating: Rating) -> Result<bool, BookRepositoryError> {
        // Whole read-modify-write happens under the write lock so no rating is lost
        let mut locked_books = self.books.write();
        if let Some(book) = find_active(&mut locked_books, isbn) {
            book.record_rating(rating);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn add_review(&self, isbn: &Isbn, review: String) -> Result<bool, BookRepositoryError> {
        let locked_books = self.books.read();
        let book_exists = locked_books
            .iter()
            .any(|book| !book.soft_deleted && book.isbn == isbn.as_str());
        if !book_exists {
            return Ok(false);
        }
        self.reviews
            .write()
            .entry(isbn.clone())
            .or_default()
            .push(review);
        Ok(true)
    }

    async fn get_reviews(&self, isbn: &Isbn) -> Result<Vec<String>, BookRepositoryError> {
        Ok(self
            .reviews
            .read()
            .get(isbn)
            .cloned()
            .unwrap_or_default())
    }
}
