//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding the server responsible for a key.

pub mod position;
pub mod ring;

pub use position::PositionIndex;
pub use ring::{HashRing, RingBuilder};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
