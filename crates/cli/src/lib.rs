//! CLI tool for inspecting consistent hash rings.
//!
//! Builds a ring from a JSON config file and/or command-line flags, then:
//! - Resolves keys to servers
//! - Prints the ring's positions in order
//! - Reports each server's share of the hash space

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
