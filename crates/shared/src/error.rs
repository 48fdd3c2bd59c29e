use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Validation,
    Internal,
    #[serde(other)]
    Unknown,
}

/// Error body returned by the resource-request API on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Why a quantity text is not acceptable for a resource type.
///
/// The `Display` text is shown inline next to the quantity field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("Select a resource type first")]
    NoResourceType,
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("Quantity is required")]
    Empty,
    #[error("Quantity must be a whole number")]
    NotAWholeNumber,
    #[error("Minimum quantity for {label} is {min} {unit}")]
    BelowMinimum {
        label: String,
        min: u32,
        unit: String,
    },
    #[error("Maximum quantity for {label} is {max} {unit}")]
    AboveMaximum {
        label: String,
        max: u32,
        unit: String,
    },
}
