//! Error types for session and collection management.
//!
//! Every failure returns control to the caller with a kind it can act on:
//! - `ValidationError`: bad form input, shown to the user verbatim
//! - `Error::NotAuthenticated`: the user has to log in first
//! - `PersistenceError`: the store rejected a read or write

use thiserror::Error;

/// Rejected login/signup input.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    EmptyField,
    #[error(
        "Please enter a valid email address (e.g. user@example.com) \
         with a domain name of at least 3 characters and a proper extension"
    )]
    InvalidEmailFormat,
    #[error("Name must be at least 2 characters long and contain only letters and spaces")]
    InvalidNameFormat,
    #[error("Password must be at least 4 characters long")]
    PasswordTooShort,
    #[error("Password must contain at least one number or special character (!@#$%^&*)")]
    PasswordTooWeak,
}

/// Failure reading from or writing to a persistence store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access '{key}' in store: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store is full: writing '{key}' needs {needed} bytes but only {available} are left")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

/// Catalog request beyond what the catalog is allowed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Cannot load {requested} page(s), the limit is {max}")]
    PageLimit { requested: u64, max: u64 },
    #[error("Grid position {position} is beyond the last loadable image ({last})")]
    PositionOutOfRange { position: usize, last: usize },
    #[error("Catalog page size is 0, no images can be loaded")]
    EmptyPages,
}

/// Any failure surfaced by the collection state manager.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please login to like or save images")]
    NotAuthenticated,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type Result<T> = std::result::Result<T, Error>;
