pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("Invalid rating {0}, it must be between 1 and 5")]
pub struct InvalidRating(pub f64);

/// Single rating submitted for a book, always within [MIN_RATING, MAX_RATING]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    pub fn new(value: f64) -> Result<Self, InvalidRating> {
        // NaN fails the range check
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}
