use std::fmt;

use thiserror::Error;

/// Vendor input field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ItemName,
    Amount,
    /// Generated link token; only fails if no unused token could be drawn
    Link,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ItemName => f.write_str("item name"),
            Field::Amount => f.write_str("amount"),
            Field::Link => f.write_str("link"),
        }
    }
}

/// Rejected vendor input. The store is never touched when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: Field, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Errors that can occur outside of the payment-link domain rules
/// (I/O, CSV, configuration) plus validation failures surfaced in batch mode
#[derive(Error, Debug)]
pub enum RiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RiftError>;
