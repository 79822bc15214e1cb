//! # Error Types
//!
//! Domain-specific error types for smartcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  smartcart-core errors (this file)                                     │
//! │  ├── CoreError        - Cart and rule-table failures                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  smartcart-cli errors (separate crate)                                 │
//! │  └── AppError         - Config, I/O, scripts, wraps CoreError          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - An empty cart: it prices to an all-zero breakdown.
//! - Removing or updating an item that is not in the cart: a no-op.
//! - A category or tier without a rule: priced at a zero rate, with a
//!   `tracing` warning.

use thiserror::Error;

use crate::types::CatalogId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is raised *before* the cart is mutated, so a failed call
/// leaves the cart and its breakdown exactly as they were.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog has no item with this id.
    ///
    /// ## When This Occurs
    /// - A storefront intent references an id the catalog does not list
    #[error("Product not found: {0}")]
    ProductNotFound(CatalogId),

    /// Cart has reached the maximum number of distinct line items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line item quantity would exceed the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A rule table could not be built.
    ///
    /// ## When This Occurs
    /// - Two rules for the same category or tier
    /// - A rate above 100%
    #[error("Invalid pricing rule: {0}")]
    InvalidRule(String),

    /// Catalog data could not be parsed or is inconsistent.
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation at the boundary, before business logic runs.
#[derive(Debug, Error)]
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
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unknown category name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate catalog id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
