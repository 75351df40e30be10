use std::fmt;
use std::str::FromStr;

const ISBN_LENGTH: usize = 13;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid ISBN {0:?}, it must be exactly 13 numeric digits")]
pub struct InvalidIsbn(pub String);

/// ISBN-13 identifier of a book, guaranteed to consist of exactly 13 ASCII digits.
/// Check digit is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidIsbn> {
        let value = value.into();
        if value.len() == ISBN_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(InvalidIsbn(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Isbn {
    type Err = InvalidIsbn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
