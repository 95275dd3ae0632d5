//! Positions on the 32-bit hash ring.
//!
//! A `Token` is the output of a partitioner and the unit of placement: both
//! server placements and keys are reduced to tokens, and a key is owned by the
//! first server token found walking clockwise from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the 32-bit hash space.
///
/// The space is treated as a ring: the position after `Token::MAX` is
/// `Token::ZERO`.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Token(pub u32);

impl Token {
    /// Minimum token value (start of ring).
    pub const ZERO: Token = Token(0);
    /// Maximum token value (end of ring).
    pub const MAX: Token = Token(u32::MAX);

    /// Number of distinct positions on the ring.
    pub const RING_SIZE: u64 = 1 << 32;

    /// True if this token is the minimum.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True if this token is the maximum.
    #[inline]
    pub fn is_max(&self) -> bool {
        self.0 == u32::MAX
    }

    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// ```rust
    /// use corelib::Token;
    ///
    /// assert_eq!(Token(100).distance_to(&Token(200)), 100);
    /// assert_eq!(Token::MAX.distance_to(&Token::ZERO), 1);
    /// ```
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        other.0.wrapping_sub(self.0)
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
