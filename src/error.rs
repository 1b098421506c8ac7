//! Error types for the planner

use thiserror::Error;

/// Errors raised outside the pure engine: loading, storing and parsing input.
///
/// Business-logic conditions (unknown items, uncraftable recipes, cycles) are
/// never errors; they come back as empty or `None` results.
#[derive(Debug, Error)]
pub enum CookerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{0}: top-level JSON value is not an object keyed by item name")]
    NotAnObject(String),

    #[error("inventory line {line}: cannot parse '{content}'")]
    InventoryParse { line: usize, content: String },

    #[error("invalid inventory entry '{0}' (expected 'Name=10' or '10x Name')")]
    InvalidEntry(String),

    #[error("invalid quantity '{0}' (expected a positive integer)")]
    InvalidQuantity(String),

    #[error("quantity {quantity} of '{ingredient}' does not fit the item store")]
    QuantityOutOfRange { ingredient: String, quantity: String },
}

pub type Result<T> = std::result::Result<T, CookerError>;
