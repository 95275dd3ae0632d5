//! Core library for consistent hashing.
//!
//! This crate provides the consistent hash ring and its building blocks:
//! - Tokens (positions in the 32-bit hash space) and the CRC-32 partitioner
//! - Server names and virtual node placement
//! - The ring itself: membership, sorted position index, successor lookup
//! - Topology snapshots for ownership analysis
//!
//! ```rust
//! use corelib::{Error, HashRing};
//!
//! let ring = HashRing::new(3);
//! assert_eq!(ring.get("key"), Err(Error::NoServerAvailable));
//!
//! for server in ["server01", "server02", "server03"] {
//!     ring.add_server(server)?;
//! }
//! assert_eq!(ring.get("text")?, "server01");
//! # Ok::<(), corelib::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use node::ServerName;
pub use partitioner::Partitioner;
pub use ring::{HashRing, Ring, RingBuilder};
pub use token::Token;
pub use topology::Topology;
pub use vnode::VirtualNode;
