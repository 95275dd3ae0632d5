//! Sorted position index.

use crate::token::Token;

/// Ascending, duplicate-free list of every occupied ring position.
///
/// This is derived state: the ring rebuilds it from its entry map after each
/// mutation and only ever reads it through [`PositionIndex::successor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    tokens: Vec<Token>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from positions in any order.
    pub fn from_positions(positions: impl IntoIterator<Item = Token>) -> Self {
        let mut index = Self::new();
        index.rebuild(positions);
        index
    }

    /// Replace the contents with `positions`, sorted and deduplicated.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Token>) {
        let mut tokens: Vec<Token> = positions.into_iter().collect();
        tokens.sort_unstable();
        tokens.dedup();
        self.tokens = tokens;
    }

    /// First position at or after `token`, wrapping to the smallest position
    /// when `token` is past the last one. `None` only when the index is empty.
    ///
    /// O(log n) binary search.
    pub fn successor(&self, token: Token) -> Option<Token> {
        let idx = self.tokens.partition_point(|t| *t < token);
        self.tokens
            .get(idx)
            .or_else(|| self.tokens.first())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = Token> + '_ {
        self.tokens.iter().copied()
    }
}
