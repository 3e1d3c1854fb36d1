//! Errors returned by network construction, training and inference.

use thiserror::Error;

/// The value returned in place of a training error by callers that still
/// expect the legacy "already trained" signal.
///
/// Training errors are sums of squares, so a negative value can never be
/// mistaken for a real result.
pub const ALREADY_TRAINED_SENTINEL: f64 = -1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A layer was declared with zero neurons, or a restored network had no
    /// layers at all.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A vector did not match the declared input or output width.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The network has already been trained. Training runs at most once.
    #[error("network has already been trained")]
    AlreadyTrained,
}

impl Error {
    /// Returns the legacy sentinel for errors that had one.
    ///
    /// Only `AlreadyTrained` maps to `ALREADY_TRAINED_SENTINEL`; every other
    /// error has no numeric equivalent.
    pub fn sentinel(&self) -> Option<f64> {
        match self {
            Error::AlreadyTrained => Some(ALREADY_TRAINED_SENTINEL),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with `DimensionMismatch` unless `actual == expected`.
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, actual })
    }
}
