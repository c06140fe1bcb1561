//! Error types for map construction.

use thiserror::Error;

/// Result type alias for fallible [`HashMap`](crate::HashMap) construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors.
///
/// Map operations never fail; absence is reported through `Option`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The initial capacity was zero.
    #[error("initial capacity must be greater than zero")]
    ZeroCapacity,

    /// The maximum load factor was not a finite positive number.
    #[error("maximum load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),
}
