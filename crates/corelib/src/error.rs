//! Error types for the core library.

use crate::token::Token;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lookup on a ring with no member servers.
    #[error("no server available")]
    NoServerAvailable,
    /// A position in the sorted index has no owner in the entry map.
    ///
    /// Only produced when the ring's internal bookkeeping is broken.
    #[error("server not found for position {0}")]
    ServerNotFound(Token),
    /// Invalid server identifier
    #[error("invalid server: {0}")]
    InvalidServer(String),
    /// Invalid ring configuration
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
