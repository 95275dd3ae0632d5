//! Ring topology views.
//!
//! A [`Topology`] is an immutable snapshot of a ring's occupied positions.
//! It answers ownership questions (which arc of the hash space does each
//! server own, and what share of the whole ring is that) without holding the
//! ring's lock.

use std::collections::BTreeMap;

use crate::node::ServerName;
use crate::token::Token;

/// The arc of the ring owned by one position: `(start, end]`, walking
/// clockwise and wrapping past `Token::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRange {
    /// Previous occupied position (exclusive).
    pub start: Token,
    /// The owning position (inclusive).
    pub end: Token,
    pub server: ServerName,
}

impl TokenRange {
    /// Number of tokens in the range. A lone position owns the whole ring.
    pub fn len(&self) -> u64 {
        match self.start.distance_to(&self.end) {
            0 => Token::RING_SIZE,
            d => u64::from(d),
        }
    }

    /// Always false: every range holds at least its own end position.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, token: Token) -> bool {
        let span = self.start.distance_to(&self.end);
        let offset = self.start.distance_to(&token);
        span == 0 || (offset != 0 && offset <= span)
    }
}

/// Snapshot of the ring's positions in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    positions: Vec<(Token, ServerName)>,
}

impl Topology {
    /// Build from `(position, owner)` pairs. Sorted by position on the way in.
    pub fn from_positions(mut positions: Vec<(Token, ServerName)>) -> Self {
        positions.sort_by_key(|(token, _)| *token);
        positions.dedup_by_key(|(token, _)| *token);
        Self { positions }
    }

    pub fn positions(&self) -> &[(Token, ServerName)] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Owner of `token` under the clockwise-successor rule.
    pub fn owner_of(&self, token: Token) -> Option<&ServerName> {
        let idx = self.positions.partition_point(|(t, _)| *t < token);
        self.positions
            .get(idx)
            .or_else(|| self.positions.first())
            .map(|(_, server)| server)
    }

    /// One range per occupied position, in ring order.
    ///
    /// The first range starts at the last position, covering the wrap-around
    /// gap.
    pub fn ranges(&self) -> Vec<TokenRange> {
        let Some((last, _)) = self.positions.last() else {
            return Vec::new();
        };

        let mut start = *last;
        self.positions
            .iter()
            .map(|(end, server)| {
                let range = TokenRange {
                    start,
                    end: *end,
                    server: server.clone(),
                };
                start = *end;
                range
            })
            .collect()
    }

    /// Fraction of the hash space owned by each server. Sums to 1.0 on a
    /// non-empty ring.
    pub fn ownership(&self) -> BTreeMap<ServerName, f64> {
        let mut owned: BTreeMap<ServerName, u64> = BTreeMap::new();
        for range in self.ranges() {
            *owned.entry(range.server.clone()).or_default() += range.len();
        }
        owned
            .into_iter()
            .map(|(server, tokens)| (server, tokens as f64 / Token::RING_SIZE as f64))
            .collect()
    }
}
