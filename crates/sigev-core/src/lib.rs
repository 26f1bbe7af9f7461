//! # sigev-core: Pure Business Logic for SIGEV-PYME
//!
//! This crate is the **heart** of SIGEV-PYME. It contains all client-side
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SIGEV-PYME Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend Host (CLI / UI)                     │   │
//! │  │    Login ──► Inventory ──► New Sale ──► Company Dashboard       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sigev-client                                 │   │
//! │  │    Session, token store, typed endpoint services that call      │   │
//! │  │    the remote REST API over HTTPS                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sigev-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │   stock   │  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleDraft │  │ StockLevel│  │   │
//! │  │   │   Sale    │  │  céntimos │  │  Boleta/  │  │  alerts   │  │   │
//! │  │   │   User    │  │           │  │  Factura  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ validation│  │  reports  │                                 │   │
//! │  │   │   rules   │  │  monthly  │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Company, Product, Sale, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`stock`] - Stock-level classification and alert construction
//! - [`draft`] - In-progress sale with the invoice-type threshold rule
//! - [`reports`] - Trailing-months revenue aggregation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and clock access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in céntimos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use sigev_core::money::Money;
//! use sigev_core::stock::StockLevel;
//!
//! // Create money from céntimos (never from floats!)
//! let price = Money::from_cents(1099); // S/ 10.99
//!
//! // Classify a product's stock against its alert threshold
//! let level = StockLevel::classify(2, 5);
//! assert_eq!(level, StockLevel::Low);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod reports;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sigev_core::Money` instead of
// `use sigev_core::money::Money`

pub use draft::{Customer, DocumentKind, DraftItem, SaleDraft};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use reports::{monthly_earnings, MonthBucket};
pub use stock::{StockAlert, StockLevel};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sale total above which only a factura may be issued (S/ 700.00).
///
/// ## Business Reason
/// Peruvian tax rules: past this amount the buyer must be identified by
/// RUC on a factura; a boleta (personal DNI) is no longer acceptable.
pub const INVOICE_THRESHOLD: Money = Money::from_cents(70_000);

/// Default minimum-stock alert threshold applied when a product is
/// created without one.
pub const DEFAULT_MIN_STOCK_ALERT: i64 = 5;

/// Number of trailing calendar months covered by the revenue report.
pub const TRAILING_MONTHS: usize = 6;
