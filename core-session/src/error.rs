//! # Session Error Types

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by the playback session.
///
/// Playback-level failures (unplayable resource, stall) never appear here:
/// they are recovered internally or reported through the status signal. This
/// type covers the session object's own lifecycle and configuration.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session actor has shut down; the handle can no longer deliver
    /// commands.
    #[error("Playback session has shut down")]
    SessionClosed,

    /// A bridge collaborator failed while the session was being wired up.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Invalid configuration (log filter, channel capacity of zero).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
