//! Hash ring data structure.
//!
//! # Concurrency
//!
//! A `HashRing` follows an exclusive-writer / many-reader contract. All
//! mutable state (ring entries, membership set, sorted index) sits behind one
//! `RwLock`:
//!
//! - `get`, `list_servers` and the other accessors take the read lock
//! - `add_server` / `remove_server` hold the write lock across the whole
//!   mutate-and-rebuild sequence
//!
//! Readers therefore see the ring either before or after a mutation, never an
//! index under construction. Share a ring between threads with `Arc<HashRing>`.
//!
//! # Collisions
//!
//! Tokens are 32 bits wide, so two placements can land on the same position.
//! The later insertion wins and a warning is logged. Removal only deletes
//! positions that still belong to the removed server, so a collision never
//! strips another member of a position it currently owns.

use std::collections::{HashMap, HashSet};
use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use crate::config::{RingConfig, DEFAULT_VIRTUAL_NODES};
use crate::error::{Error, Result};
use crate::node::ServerName;
use crate::partitioner::{Crc32Partitioner, Partitioner};
use crate::ring::position::PositionIndex;
use crate::token::Token;
use crate::topology::Topology;
use crate::vnode::placements;

#[derive(Debug, Default)]
struct RingState {
    /// Ring entries: position -> owning server.
    entries: HashMap<Token, ServerName>,
    /// Membership set.
    servers: HashSet<ServerName>,
    /// Sorted keys of `entries`.
    index: PositionIndex,
}

impl RingState {
    fn rebuild_index(&mut self) {
        self.index.rebuild(self.entries.keys().copied());
    }
}

/// Consistent hash ring mapping keys to server names.
///
/// Each server occupies `1 + virtual_nodes` positions. A key is owned by the
/// first position at or after its token, wrapping to the smallest position.
///
/// ```rust
/// use corelib::HashRing;
///
/// let ring = HashRing::new(3);
/// ring.add_server("server01").unwrap();
/// ring.add_server("server02").unwrap();
///
/// let server = ring.get("long established fact").unwrap();
/// assert_eq!(server, "server02");
/// ```
#[derive(Debug)]
pub struct HashRing<P: Partitioner = Crc32Partitioner> {
    partitioner: P,
    virtual_nodes: usize,
    state: RwLock<RingState>,
}

impl HashRing {
    /// Create an empty CRC-32 ring with `virtual_nodes` derived placements
    /// per server.
    pub fn new(virtual_nodes: usize) -> Self {
        Self::with_partitioner(virtual_nodes, Crc32Partitioner)
    }

    /// Build a ring from configuration, adding every configured server.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        RingBuilder::from_config(config).build()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_NODES)
    }
}

impl<P: Partitioner> HashRing<P> {
    /// Create an empty ring placing tokens with `partitioner`.
    pub fn with_partitioner(virtual_nodes: usize, partitioner: P) -> Self {
        Self {
            partitioner,
            virtual_nodes,
            state: RwLock::new(RingState::default()),
        }
    }

    /// Add a server to the ring.
    ///
    /// Returns `Ok(false)` without touching the ring if the server is already
    /// a member. Fails only for an empty name.
    pub fn add_server(&self, name: impl AsRef<str>) -> Result<bool> {
        let server = ServerName::new(name)?;
        let mut state = self.state.write();
        if state.servers.contains(server.as_str()) {
            return Ok(false);
        }

        for vnode in placements(&self.partitioner, server.as_str(), self.virtual_nodes) {
            if let Some(previous) = state.entries.insert(vnode.token, server.clone()) {
                warn!(
                    token = %vnode.token,
                    %previous,
                    %server,
                    "ring position collision, overwriting previous owner"
                );
            }
        }
        state.servers.insert(server.clone());
        state.rebuild_index();

        debug!(%server, positions = state.index.len(), "added server to ring");
        Ok(true)
    }

    /// Remove a server from the ring.
    ///
    /// Returns `false` if the server was not a member.
    pub fn remove_server(&self, name: impl AsRef<str>) -> bool {
        let mut state = self.state.write();
        let Some(server) = state.servers.take(name.as_ref()) else {
            return false;
        };

        let mut removed = 0usize;
        for vnode in placements(&self.partitioner, server.as_str(), self.virtual_nodes) {
            if state.entries.get(&vnode.token) == Some(&server) {
                state.entries.remove(&vnode.token);
                removed += 1;
            }
        }
        state.rebuild_index();

        debug!(%server, removed, positions = state.index.len(), "removed server from ring");
        true
    }

    /// Resolve `key` to the server owning it.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<ServerName> {
        let token = self.partitioner.partition(key.as_ref());

        let state = self.state.read();
        if state.servers.is_empty() {
            return Err(Error::NoServerAvailable);
        }
        // Members whose every position was taken over by a since-removed
        // server leave the index empty.
        let position = state
            .index
            .successor(token)
            .ok_or(Error::NoServerAvailable)?;

        match state.entries.get(&position) {
            Some(server) => {
                trace!(%token, %position, %server, "resolved key");
                Ok(server.clone())
            }
            None => {
                error!(%token, %position, "position index out of sync with ring entries");
                Err(Error::ServerNotFound(position))
            }
        }
    }

    /// Current members, in no particular order.
    pub fn list_servers(&self) -> Vec<ServerName> {
        self.state.read().servers.iter().cloned().collect()
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.state.read().servers.contains(name.as_ref())
    }

    /// Number of member servers.
    pub fn server_count(&self) -> usize {
        self.state.read().servers.len()
    }

    /// Number of occupied positions.
    pub fn position_count(&self) -> usize {
        self.state.read().index.len()
    }

    pub fn virtual_nodes(&self) -> usize {
        self.virtual_nodes
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Every occupied position with its owner, in ring order.
    pub fn positions(&self) -> Vec<(Token, ServerName)> {
        let state = self.state.read();
        state
            .index
            .iter()
            .filter_map(|token| state.entries.get(&token).map(|s| (token, s.clone())))
            .collect()
    }

    /// Positions currently owned by `name`, ascending.
    pub fn positions_of(&self, name: impl AsRef<str>) -> Vec<Token> {
        let name = name.as_ref();
        let state = self.state.read();
        state
            .index
            .iter()
            .filter(|token| state.entries.get(token).is_some_and(|s| s == name))
            .collect()
    }

    /// Snapshot of the ring for ownership analysis.
    pub fn topology(&self) -> Topology {
        Topology::from_positions(self.positions())
    }
}

impl<P: Partitioner> fmt::Display for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.write_str("Hash ring: [ ")?;
        for token in state.index.iter() {
            if let Some(server) = state.entries.get(&token) {
                write!(f, "{server}:{token} ")?;
            }
        }
        f.write_str("]")
    }
}

/// Builder for a ring with an initial set of servers.
#[derive(Debug, Clone)]
pub struct RingBuilder<P: Partitioner = Crc32Partitioner> {
    partitioner: P,
    virtual_nodes: usize,
    servers: Vec<String>,
}

impl RingBuilder {
    /// A builder using CRC-32 and the default virtual-node count.
    pub fn new() -> Self {
        Self {
            partitioner: Crc32Partitioner,
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            servers: Vec::new(),
        }
    }

    pub fn from_config(config: &RingConfig) -> Self {
        Self::new()
            .with_vnodes(config.virtual_nodes)
            .add_servers(config.servers.iter().cloned())
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    /// Set the number of virtual nodes per server.
    pub fn with_vnodes(mut self, virtual_nodes: usize) -> Self {
        self.virtual_nodes = virtual_nodes;
        self
    }

    /// Place tokens with a different partitioner.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            partitioner,
            virtual_nodes: self.virtual_nodes,
            servers: self.servers,
        }
    }

    pub fn add_server(mut self, name: impl Into<String>) -> Self {
        self.servers.push(name.into());
        self
    }

    pub fn add_servers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers.extend(names.into_iter().map(Into::into));
        self
    }

    /// Build the ring, adding servers in the order they were given.
    pub fn build(self) -> Result<HashRing<P>> {
        let ring = HashRing::with_partitioner(self.virtual_nodes, self.partitioner);
        for server in &self.servers {
            ring.add_server(server)?;
        }
        Ok(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Places every key at a caller-chosen token; unknown keys hash to 0.
    struct FixedPartitioner(HashMap<&'static str, u32>);

    impl Partitioner for FixedPartitioner {
        fn partition(&self, key: &[u8]) -> Token {
            let key = std::str::from_utf8(key).unwrap_or_default();
            Token(self.0.get(key).copied().unwrap_or(0))
        }

        fn name(&self) -> &'static str {
            "FixedPartitioner"
        }
    }

    fn fixed(pairs: &[(&'static str, u32)]) -> FixedPartitioner {
        FixedPartitioner(pairs.iter().copied().collect())
    }

    #[test]
    fn test_empty_ring() {
        let ring = HashRing::new(3);
        assert_eq!(ring.get("key"), Err(Error::NoServerAvailable));
        assert!(ring.list_servers().is_empty());
        assert_eq!(ring.position_count(), 0);
        assert_eq!(ring.to_string(), "Hash ring: [ ]");
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let ring = HashRing::new(3);
        assert!(matches!(ring.add_server(""), Err(Error::InvalidServer(_))));
        assert_eq!(ring.server_count(), 0);
    }

    #[test]
    fn test_successor_and_wrap() {
        let p = fixed(&[("a", 100), ("b", 200), ("k50", 50), ("k150", 150), ("k200", 200), ("k250", 250)]);
        let ring = HashRing::with_partitioner(0, p);
        ring.add_server("a").unwrap();
        ring.add_server("b").unwrap();

        assert_eq!(ring.get("k50").unwrap(), "a");
        assert_eq!(ring.get("k150").unwrap(), "b");
        assert_eq!(ring.get("k200").unwrap(), "b");
        // Past the last position wraps to index 0, not the largest position.
        assert_eq!(ring.get("k250").unwrap(), "a");
    }

    #[test]
    fn test_collision_overwrites_on_add() {
        let p = fixed(&[("a", 100), ("b", 100), ("key", 100)]);
        let ring = HashRing::with_partitioner(0, p);
        ring.add_server("a").unwrap();
        ring.add_server("b").unwrap();

        assert_eq!(ring.server_count(), 2);
        assert_eq!(ring.position_count(), 1);
        assert_eq!(ring.get("key").unwrap(), "b");
        assert!(ring.positions_of("a").is_empty());
    }

    #[test]
    fn test_remove_keeps_position_taken_over_by_other_server() {
        let p = fixed(&[("a", 100), ("a0", 300), ("b", 100), ("b0", 400), ("key", 100)]);
        let ring = HashRing::with_partitioner(1, p);
        ring.add_server("a").unwrap();
        ring.add_server("b").unwrap();

        // "b" won position 100; removing "a" must leave it in place.
        assert!(ring.remove_server("a"));
        assert_eq!(ring.positions_of("b"), vec![Token(100), Token(400)]);
        assert_eq!(ring.position_count(), 2);
        assert_eq!(ring.get("key").unwrap(), "b");
    }

    #[test]
    fn test_shadowed_member_without_positions() {
        let p = fixed(&[("a", 100), ("b", 100)]);
        let ring = HashRing::with_partitioner(0, p);
        ring.add_server("a").unwrap();
        ring.add_server("b").unwrap();
        ring.remove_server("b");

        // "a" is still a member but lost its only position to "b".
        assert!(ring.contains("a"));
        assert_eq!(ring.position_count(), 0);
        assert_eq!(ring.get("anything"), Err(Error::NoServerAvailable));
    }

    #[test]
    fn test_display_in_ring_order() {
        let p = fixed(&[("a", 20), ("b", 10)]);
        let ring = HashRing::with_partitioner(0, p);
        ring.add_server("a").unwrap();
        ring.add_server("b").unwrap();
        assert_eq!(ring.to_string(), "Hash ring: [ b:10 a:20 ]");
    }

    #[test]
    fn test_builder_with_partitioner() {
        let ring = RingBuilder::new()
            .with_vnodes(0)
            .with_partitioner(fixed(&[("x", 1)]))
            .add_server("x")
            .build()
            .unwrap();
        assert_eq!(ring.partitioner_name(), "FixedPartitioner");
        assert_eq!(ring.positions(), vec![(Token(1), ServerName::new("x").unwrap())]);
    }

    #[test]
    fn test_ring_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HashRing>();
    }
}
