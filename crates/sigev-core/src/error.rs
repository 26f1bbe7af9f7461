//! # Error Types
//!
//! Domain-specific error types for sigev-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sigev-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sigev-client errors (separate crate)                                  │
//! │  └── ApiError         - Remote call failures (network, 401, 5xx)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → user-facing message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, product, amount)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the draft.
    #[error("Product not in sale: {0}")]
    ProductNotInSale(String),

    /// Product is out of stock and cannot be added to a sale.
    ///
    /// ## When This Occurs
    /// - Trying to sell more than available stock
    /// - The inventory list only offers products with stock > 0, but a
    ///   stale list can still race a concurrent sale
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A boleta was requested while the sale total requires a factura.
    ///
    /// ## User Workflow
    /// ```text
    /// Total: S/ 850.00 (> S/ 700)
    ///      │
    ///      ▼
    /// set_document_kind(Boleta)
    ///      │
    ///      ▼
    /// ReceiptNotAllowed { total: S/ 850.00 }
    ///      │
    ///      ▼
    /// UI keeps the boleta option disabled
    /// ```
    #[error("Sale total {total} exceeds the boleta limit, a factura is required")]
    ReceiptNotAllowed { total: Money },

    /// The sale draft has no line items.
    #[error("Sale has no items")]
    EmptySale,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are detected client-side before anything is sent to the server
/// and surfaced inline per field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed email, wrong-length RUC).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// The name of the field that failed, for inline per-field display.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Azúcar 1kg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Azúcar 1kg: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "clienteDocumento".to_string(),
        };
        assert_eq!(err.to_string(), "clienteDocumento is required");
        assert_eq!(err.field(), "clienteDocumento");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "ruc".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_receipt_not_allowed_shows_total() {
        let err = CoreError::ReceiptNotAllowed {
            total: Money::from_cents(85_000),
        };
        assert!(err.to_string().contains("S/ 850.00"));
    }
}
