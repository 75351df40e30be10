use anyhow::Context;

use crate::books_repository::{BookRepository, NewBook};
use crate::isbn::Isbn;

const SAMPLE_BOOKS: [(&str, &str, &str, &str); 7] = [
    ("A Brief History of Time", "Stephen Hawking", "Science", "9780553380163"),
    ("The Great Gatsby", "F. Scott Fitzgerald", "Classic", "9780743273565"),
    ("1984", "George Orwell", "Dystopian", "9780451524935"),
    ("Animal Farm", "George Orwell", "Satire", "9780451526342"),
    ("To Kill a Mockingbird", "Harper Lee", "Classic", "9780061120084"),
    ("The Catcher in the Rye", "J.D. Salinger", "Fiction", "9780316769488"),
    ("Go Set a Watchman", "Harper Lee", "Classic", "9780062409850"),
];

pub fn sample_books() -> anyhow::Result<Vec<NewBook>> {
    SAMPLE_BOOKS
        .iter()
        .map(|&(title, author, category, isbn)| -> anyhow::Result<NewBook> {
            Ok(NewBook {
                title: title.to_string(),
                author: author.to_string(),
                category: category.to_string(),
                isbn: Isbn::parse(isbn)?,
            })
        })
        .collect()
}

/// Adds sample books to the repository, returns number of books added
pub async fn seed(books_repository: &dyn BookRepository) -> anyhow::Result<usize> {
    let books = sample_books()?;
    let count = books.len();
    for book in books {
        let isbn = book.isbn.clone();
        books_repository
            .add_book(book)
            .await
            .with_context(|| format!("Failed to seed book {isbn}"))?;
    }
    tracing::info!(count, "Sample books added to catalog");
    Ok(count)
}
