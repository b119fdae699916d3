//! Block cipher modes of operation
//!
//! Generic mode wrappers over the [`BlockCipher`](crate::block::BlockCipher)
//! capability trait. ECB and CBC operate on whole blocks and rely on the
//! PKCS#7 helpers in [`padding`]; CFB, OFB and CTR are streaming modes that
//! accept arbitrary input lengths.

pub mod cbc;
pub mod cfb;
pub mod ctr;
pub mod ecb;
pub mod ofb;
pub mod padding;

#[cfg(test)]
mod tests;

pub use cbc::Cbc;
pub use cfb::Cfb;
pub use ctr::Ctr;
pub use ecb::Ecb;
pub use ofb::Ofb;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::ToString;

use crate::error::Error;

/// Identifier for a supported mode of operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeId {
    /// Electronic codebook
    Ecb,
    /// Cipher block chaining
    Cbc,
    /// Cipher feedback (full-block)
    Cfb,
    /// Output feedback
    Ofb,
    /// Counter mode
    Ctr,
}

impl core::str::FromStr for ModeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ecb") {
            Ok(ModeId::Ecb)
        } else if s.eq_ignore_ascii_case("cbc") {
            Ok(ModeId::Cbc)
        } else if s.eq_ignore_ascii_case("cfb") {
            Ok(ModeId::Cfb)
        } else if s.eq_ignore_ascii_case("ofb") {
            Ok(ModeId::Ofb)
        } else if s.eq_ignore_ascii_case("ctr") {
            Ok(ModeId::Ctr)
        } else {
            Err(Error::UnsupportedMode {
                mode: s.to_string(),
            })
        }
    }
}
