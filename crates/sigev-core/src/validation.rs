//! # Validation Module
//!
//! Input validation utilities for SIGEV-PYME.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client (THIS MODULE)                                          │
//! │  ├── Required fields, email pattern, RUC/DNI length                     │
//! │  ├── Numeric ranges (price > 0, stock ≥ 0)                              │
//! │  └── Inline per-field feedback before anything is sent                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Remote API                                                    │
//! │  └── Authoritative checks; a request that fails Layer 1 is NEVER        │
//! │      submitted                                                          │
//! │                                                                         │
//! │  Defense in depth: the client catches what it can, early.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sigev_core::validation::{validate_ruc, validate_price};
//! use sigev_core::Money;
//!
//! validate_ruc("20123456789").unwrap();
//! validate_price(Money::from_cents(500)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a field is non-empty after trimming.
///
/// ## Returns
/// The trimmed value.
pub fn require(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates an email address if one was entered.
///
/// ## Rules
/// - Empty input is accepted (email is optional in every form)
/// - Otherwise must match `local@domain.tld` with no whitespace,
///   mirroring the original form check
///
/// ## Example
/// ```rust
/// use sigev_core::validation::validate_email;
///
/// assert!(validate_email("").is_ok());
/// assert!(validate_email("cliente@tienda.pe").is_ok());
/// assert!(validate_email("sin-arroba").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    // /^[^\s@]+@[^\s@]+\.[^\s@]+$/ without pulling in a regex engine
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(invalid_email()),
    };
    let dot = domain.rfind('.');
    let valid = !local.is_empty()
        && !local.chars().any(char::is_whitespace)
        && !domain.chars().any(char::is_whitespace)
        && matches!(dot, Some(i) if i > 0 && i + 1 < domain.len());
    if valid {
        Ok(())
    } else {
        Err(invalid_email())
    }
}

fn invalid_email() -> ValidationError {
    ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    }
}

/// Validates a RUC (company tax id).
///
/// ## Rules
/// - Required
/// - Exactly 11 digits
pub fn validate_ruc(ruc: &str) -> ValidationResult<()> {
    let ruc = ruc.trim();
    if ruc.is_empty() {
        return Err(ValidationError::Required {
            field: "ruc".to_string(),
        });
    }
    if ruc.len() != 11 || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "ruc".to_string(),
            reason: "must be exactly 11 digits".to_string(),
        });
    }
    Ok(())
}

/// Validates a DNI (personal id number).
///
/// ## Rules
/// - Required
/// - Exactly 8 digits
pub fn validate_dni(dni: &str) -> ValidationResult<()> {
    let dni = dni.trim();
    if dni.is_empty() {
        return Err(ValidationError::Required {
            field: "clienteDocumento".to_string(),
        });
    }
    if dni.len() != 8 || !dni.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "clienteDocumento".to_string(),
            reason: "must be exactly 8 digits".to_string(),
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be strictly positive; S/ 0.00 products are not sellable
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be non-negative; zero is a legal (Depleted) state
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }
    Ok(())
}

/// Validates a company's employee count.
///
/// ## Rules
/// - At least 1 (the manager counts)
pub fn validate_employee_count(count: i64) -> ValidationResult<()> {
    if count < 1 {
        return Err(ValidationError::OutOfRange {
            field: "numeroEmpleados".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require("nombre", "  Bodega Sol  ").unwrap(), "Bodega Sol");
        assert!(require("nombre", "   ").is_err());
        assert!(require("nombre", "").is_err());
    }

    #[test]
    fn test_validate_email() {
        // Optional: empty passes
        assert!(validate_email("").is_ok());
        assert!(validate_email("   ").is_ok());

        assert!(validate_email("cliente@tienda.pe").is_ok());
        assert!(validate_email("a.b@sub.dominio.com").is_ok());

        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("dos@@arrobas.pe").is_err());
        assert!(validate_email("sin@punto").is_err());
        assert!(validate_email("con espacio@x.pe").is_err());
        assert!(validate_email("@dominio.pe").is_err());
        assert!(validate_email("x@dominio.").is_err());
    }

    #[test]
    fn test_validate_ruc() {
        assert!(validate_ruc("20123456789").is_ok());
        assert!(validate_ruc("").is_err());
        assert!(validate_ruc("12345").is_err());
        assert!(validate_ruc("201234567890").is_err());
        assert!(validate_ruc("2012345678X").is_err());
    }

    #[test]
    fn test_validate_dni() {
        assert!(validate_dni("12345678").is_ok());
        assert!(validate_dni("").is_err());
        assert!(validate_dni("1234567").is_err());
        assert!(validate_dni("123456789").is_err());
        assert!(validate_dni("1234567A").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(10).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_employee_count() {
        assert!(validate_employee_count(1).is_ok());
        assert!(validate_employee_count(250).is_ok());
        assert!(validate_employee_count(0).is_err());
    }
}
