//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead. The same bytes must
/// map to the same token in every process, otherwise placements computed by
/// different callers disagree.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a token.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to partition
    ///
    /// # Returns
    ///
    /// A token representing the position on the ring
    fn partition(&self, key: &[u8]) -> Token;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
