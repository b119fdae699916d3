//! Type-safe wrappers for cryptographic values
//!
//! Domain-specific types with compile-time guarantees, designed to be
//! ergonomic while preventing common mistakes.

pub mod digest;
pub mod nonce;

pub use digest::Digest;
pub use nonce::Nonce;
