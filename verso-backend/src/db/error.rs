//! Store error taxonomy
//!
//! Every precondition violation in the store surfaces as one of these
//! variants, carrying the id or field the caller needs to report precisely.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation on registration ("username" or "email")
    #[error("{field} already exists")]
    Conflict { field: &'static str },

    /// Credential mismatch - deliberately does not say which part failed
    #[error("invalid credentials")]
    Unauthorized,

    /// Referenced entity absent ("user", "note", "version history")
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn conflict(field: &'static str) -> Self {
        StoreError::Conflict { field }
    }
}
