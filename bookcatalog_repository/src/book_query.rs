use crate::api::{Book, BookQueryParameters};
use crate::isbn::{InvalidIsbn, Isbn};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BookQueryError {
    #[error(transparent)]
    InvalidIsbn(#[from] InvalidIsbn),

    #[error("top must be a positive number, got {0}")]
    NonPositiveTop(i64),

    #[error("rating bounds must be finite numbers, got {0}")]
    NonFiniteRating(f64),

    #[error("max_rating ({max}) must be greater than min_rating ({min})")]
    InvalidRatingRange { min: f64, max: f64 },
}

/// Validated set of filters applied to the catalog.
/// Filters set to None impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub author: Option<String>,
    pub category: Option<String>,
    pub isbn: Option<Isbn>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub top: Option<usize>,
    pub include_deleted: bool,
}

impl TryFrom<BookQueryParameters> for BookQuery {
    type Error = BookQueryError;

    fn try_from(params: BookQueryParameters) -> Result<Self, Self::Error> {
        let isbn = params.isbn.map(Isbn::parse).transpose()?;

        let top = match params.top {
            Some(top) if top <= 0 => return Err(BookQueryError::NonPositiveTop(top)),
            Some(top) => Some(usize::try_from(top).unwrap_or(usize::MAX)),
            None => None,
        };

        if let Some(bound) = [params.min_rating, params.max_rating]
            .into_iter()
            .flatten()
            .find(|bound| !bound.is_finite())
        {
            return Err(BookQueryError::NonFiniteRating(bound));
        }

        if let (Some(min), Some(max)) = (params.min_rating, params.max_rating) {
            if max <= min {
                return Err(BookQueryError::InvalidRatingRange { min, max });
            }
        }

        Ok(Self {
            author: params.author.filter(|author| !author.is_empty()),
            category: params.category.filter(|category| !category.is_empty()),
            isbn,
            min_rating: params.min_rating,
            max_rating: params.max_rating,
            top,
            include_deleted: params.return_deleted_books,
        })
    }
}

impl BookQuery {
    /// Checks a single book against every filter except `top`
    pub fn matches(&self, book: &Book) -> bool {
        if book.soft_deleted && !self.include_deleted {
            return false;
        }
        if !matches_ignoring_case(self.author.as_deref(), &book.author)
            || !matches_ignoring_case(self.category.as_deref(), &book.category)
        {
            return false;
        }
        if let Some(isbn) = &self.isbn {
            if isbn.as_str() != book.isbn {
                return false;
            }
        }
        self.matches_rating(book.avg_rating)
    }

    fn matches_rating(&self, avg_rating: Option<f64>) -> bool {
        if self.min_rating.is_none() && self.max_rating.is_none() {
            return true;
        }
        // Unrated books never satisfy a rating bound
        let Some(avg_rating) = avg_rating else {
            return false;
        };
        self.min_rating.map_or(true, |min| avg_rating >= min)
            && self.max_rating.map_or(true, |max| avg_rating <= max)
    }

    /// Filters books, sorts them by author surname and truncates to `top`.
    /// Sort is stable, books of the same surname keep their original order.
    pub fn apply<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Vec<Book> {
        let mut result: Vec<Book> = books
            .into_iter()
            .filter(|book| self.matches(book))
            .cloned()
            .collect();
        result.sort_by(|a, b| author_surname(&a.author).cmp(author_surname(&b.author)));
        if let Some(top) = self.top {
            result.truncate(top);
        }
        result
    }
}

/// Compares Unicode lowercase forms. This is not full case folding,
/// e.g. "STRASSE" does not match "straße".
fn matches_ignoring_case(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |filter| filter.to_lowercase() == value.to_lowercase())
}

/// Last whitespace separated token of the author name, empty for a blank name
pub fn author_surname(author: &str) -> &str {
    author.split_whitespace().last().unwrap_or_default()
}
