//! Virtual node placement.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each server having a single token on the ring, each server has
//! one primary token plus `v` derived tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When servers join/leave, only a fraction of keys move
//!
//! # Placement Keys
//!
//! - primary: the bare server name, `"server01"`
//! - virtual node `i`: the name followed by the decimal index, `"server010"`,
//!   `"server011"`, ...
//!
//! Removal recomputes exactly the same keys, so it is the inverse of addition
//! for a given name and virtual-node count.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) ring entries per server
//! - **Lookup**: O(log n) where n = total occupied positions
//!
//! A virtual-node count of 0 is allowed but leaves each server with a single
//! position, which gives poor balance for small fleets.

use crate::partitioner::Partitioner;
use crate::token::Token;
use std::borrow::Cow;
use std::fmt;

/// Which of a server's placements a virtual node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Replica {
    /// Placement derived from the bare server name.
    Primary,
    /// Placement derived from the name and a virtual-node index.
    Virtual(usize),
}

impl Replica {
    /// The byte string hashed to place this replica of `server`.
    pub fn placement_key<'a>(&self, server: &'a str) -> Cow<'a, str> {
        match self {
            Replica::Primary => Cow::Borrowed(server),
            Replica::Virtual(index) => Cow::Owned(format!("{server}{index}")),
        }
    }
}

/// A single placement of a server on the hash ring.
///
/// Ordered by token first, so a sorted list of virtual nodes is in ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Token,

    /// Which placement of its server this is.
    pub replica: Replica,
}

impl VirtualNode {
    #[inline]
    pub fn new(token: Token, replica: Replica) -> Self {
        Self { token, replica }
    }

    /// Place `replica` of `server` using `partitioner`.
    pub fn place<P: Partitioner>(partitioner: &P, server: &str, replica: Replica) -> Self {
        let key = replica.placement_key(server);
        Self::new(partitioner.partition(key.as_bytes()), replica)
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        self.token.distance_to(&other.token)
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.replica {
            Replica::Primary => write!(f, "VNode(token={}, primary)", self.token),
            Replica::Virtual(i) => write!(f, "VNode(token={}, vnode={})", self.token, i),
        }
    }
}

/// Every placement of `server`: the primary followed by `virtual_nodes`
/// derived placements.
pub fn placements<'a, P: Partitioner>(
    partitioner: &'a P,
    server: &'a str,
    virtual_nodes: usize,
) -> impl Iterator<Item = VirtualNode> + 'a {
    std::iter::once(Replica::Primary)
        .chain((0..virtual_nodes).map(Replica::Virtual))
        .map(move |replica| VirtualNode::place(partitioner, server, replica))
}
