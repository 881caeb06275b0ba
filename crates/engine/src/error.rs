//! The module contains the errors the engine can return.
//!
//! Business-rule violations are recoverable and come back to the caller as
//! an [`EngineError`]:
//!
//! - [`InsufficientBalance`] when a donation costs more than the user's balance.
//! - [`InsufficientStock`] when a donation asks for more food than is in stock.
//! - [`InsufficientPoints`] when a redemption costs more points than the user has.
//! - [`OutOfStock`] when a reward has no units left.
//! - [`NotFound`] when a referenced record does not exist.
//!
//! [`IllegalState`] describes coordinator misuse; the coordinator panics
//! with it instead of returning it. An operation only returns it when the
//! runtime shuts down before its unit of work could finish.
//!
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`InsufficientPoints`]: EngineError::InsufficientPoints
//!  [`OutOfStock`]: EngineError::OutOfStock
//!  [`NotFound`]: EngineError::NotFound
//!  [`IllegalState`]: EngineError::IllegalState
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),
    #[error("Out of stock: {0}")]
    OutOfStock(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Illegal state: {0}")]
    IllegalState(String),
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::InsufficientPoints(a), Self::InsufficientPoints(b)) => a == b,
            (Self::OutOfStock(a), Self::OutOfStock(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::IllegalState(a), Self::IllegalState(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl EngineError {
    /// Returns `true` for errors caused by a business rule rather than by the
    /// storage layer or by a programming mistake.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Persistence(_) | Self::IllegalState(_))
    }
}
