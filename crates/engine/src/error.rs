//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] when the caller sent malformed, missing or non-positive
//!   input. Nothing has been written.
//! - [`NotFound`] when a campaign id does not resolve to a stored campaign.
//! - [`Conflict`] when a unique key (campaign code) is already taken.
//! - [`Storage`] when the database failed. The surrounding transaction has
//!   been rolled back.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Storage`]: EngineError::Storage
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    Conflict(String),
    #[error(transparent)]
    Storage(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
