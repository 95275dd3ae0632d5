//! CRC-32 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// CRC-32/IEEE partitioner.
///
/// Fast and deterministic across processes and platforms, which is all ring
/// placement needs. It is not collision resistant; see `HashRing::add_server`
/// for how colliding placements are handled.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    #[inline]
    fn partition(&self, key: &[u8]) -> Token {
        Token(crc32fast::hash(key))
    }

    fn name(&self) -> &'static str {
        "Crc32Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksums() {
        let p = Crc32Partitioner;
        // Standard CRC-32/IEEE check value.
        assert_eq!(p.partition(b"123456789"), Token(0xCBF4_3926));
        assert_eq!(p.partition(b"server01"), Token(2_065_571_387));
        assert_eq!(p.partition(b"text"), Token(999_008_199));
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(Crc32Partitioner.partition(b""), Token(0));
    }
}
