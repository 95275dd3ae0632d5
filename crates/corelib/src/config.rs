//! Ring configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of virtual nodes per server.
pub const DEFAULT_VIRTUAL_NODES: usize = 256;

/// Settings a ring is built from.
///
/// Deserializable so callers can keep it alongside the rest of their
/// configuration:
///
/// ```json
/// { "virtual_nodes": 160, "servers": ["cache-a", "cache-b"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Derived placements per server, in addition to the primary one.
    pub virtual_nodes: usize,
    /// Servers to add when the ring is built.
    pub servers: Vec<String>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            servers: Vec::new(),
        }
    }
}

impl RingConfig {
    pub fn new(virtual_nodes: usize) -> Self {
        Self {
            virtual_nodes,
            ..Self::default()
        }
    }

    pub fn with_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers.extend(servers.into_iter().map(Into::into));
        self
    }

    /// Reject configurations the ring cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.servers.iter().position(|s| s.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "servers[{pos}]: server name must not be empty"
            )));
        }
        Ok(())
    }
}
