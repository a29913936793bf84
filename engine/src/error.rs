//! Error types for the larder engine.

use crate::{Amount, ItemName};
use thiserror::Error;

/// All possible errors from the larder engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("item not found: {0}")]
    ItemNotFound(ItemName),

    // Ledger errors
    #[error("insufficient stock for '{item}': requested {requested}, available {available}")]
    InsufficientStock {
        item: ItemName,
        requested: Amount,
        available: Amount,
    },

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
