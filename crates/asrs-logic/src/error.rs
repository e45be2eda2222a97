//! Hard errors: construction and parameter mistakes.
//!
//! Runtime domain events (invalid position, full cell, empty cell) are never
//! errors; they surface as `false`, `None` or an empty list. Only values that
//! indicate a programming or configuration mistake end up here.

use thiserror::Error;

/// Errors raised while building a warehouse or validating its parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarehouseError {
    /// A grid bound is zero, exceeds `i32::MAX`, or the cell count overflows.
    #[error("grid dimensions must be positive and addressable, got {x}x{y}x{z}")]
    InvalidDimensions { x: u32, y: u32, z: u32 },

    /// A cell must be able to hold at least one entity.
    #[error("cell capacity must be at least 1")]
    ZeroCapacity,

    /// A rate, time or cost parameter is negative or not finite.
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidParameter { field: &'static str, value: f64 },
}

impl WarehouseError {
    /// Reject negative, NaN and infinite values for `field`.
    pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(WarehouseError::InvalidParameter { field, value })
        }
    }
}

/// Result type for warehouse construction and parameter validation.
pub type Result<T> = std::result::Result<T, WarehouseError>;
