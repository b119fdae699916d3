//! Error handling for the ShangMi primitive suite

#[cfg(feature = "alloc")]
use alloc::borrow::Cow;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

/// The error type for the primitives in this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parameter validation error
    Parameter {
        /// Name of the invalid parameter
        name: Cow<'static, str>,
        /// Reason why the parameter is invalid
        reason: Cow<'static, str>,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// A supplied or computed point does not satisfy the curve equation
    InvalidPoint {
        /// Context where the off-curve point was encountered
        context: &'static str,
    },

    /// A modular inverse does not exist (gcd with the modulus is not 1)
    NoInverse {
        /// Context where the inversion was attempted
        context: &'static str,
    },

    /// A randomized operation exhausted its bounded retries on degenerate draws
    RetryLimit {
        /// Operation that gave up
        operation: &'static str,
        /// Number of attempts made before giving up
        attempts: u32,
    },

    /// Integrity check failure (signature or ciphertext hash mismatch)
    Integrity {
        /// Scheme whose integrity check failed
        context: &'static str,
    },

    /// Malformed padding encountered while unpadding
    Padding {
        /// Context where the bad padding was found
        context: &'static str,
    },

    /// Unrecognized cipher mode name
    #[cfg(feature = "alloc")]
    UnsupportedMode {
        /// The mode string that was not recognized
        mode: String,
    },

    /// Processing error during a cryptographic operation
    Processing {
        /// Operation that failed
        operation: &'static str,
        /// Additional details about the failure
        details: &'static str,
    },

    /// Fallback for other errors
    Other(&'static str),
}

// Add convenience helper
impl Error {
    /// Shorthand to create a Parameter error
    pub fn param<N: Into<Cow<'static, str>>, R: Into<Cow<'static, str>>>(
        name: N,
        reason: R,
    ) -> Self {
        Error::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for primitive operations
pub type Result<T> = core::result::Result<T, Error>;

// Display implementation for error formatting
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid length for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            Error::InvalidPoint { context } => {
                write!(f, "Point is not on the curve in {}", context)
            }
            Error::NoInverse { context } => {
                write!(f, "No modular inverse exists in {}", context)
            }
            Error::RetryLimit {
                operation,
                attempts,
            } => {
                write!(
                    f,
                    "Retry limit reached in {} after {} attempts",
                    operation, attempts
                )
            }
            Error::Integrity { context } => {
                write!(f, "Integrity check failed for {}", context)
            }
            Error::Padding { context } => {
                write!(f, "Invalid padding in {}", context)
            }
            #[cfg(feature = "alloc")]
            Error::UnsupportedMode { mode } => {
                write!(f, "Unsupported cipher mode '{}'", mode)
            }
            Error::Processing { operation, details } => {
                write!(f, "Processing error in {}: {}", operation, details)
            }
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

// Implement std::error::Error when std is available
#[cfg(feature = "std")]
impl std::error::Error for Error {}

// Include the validation submodule
pub mod validate;
