//! Error types for the session layer.

use nightfall_protocol::SessionId;
use nightfall_rules::{ActionRejected, RoleSet, RulesError};

/// Errors that can occur during session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session does not exist.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session's actor has stopped (the game ended) or its command
    /// channel is closed.
    #[error("session {0} is closed")]
    Closed(SessionId),

    /// The session is in a state that doesn't allow this operation, such
    /// as joining a running game or voting in a lobby.
    #[error("invalid session state for this operation: {0}")]
    InvalidState(String),

    /// The role set isn't offered by the catalogue for its roster size.
    #[error("role set [{0}] is not in the catalogue")]
    UnsupportedRoleSet(RoleSet),

    /// The rules refused the submission. Nothing changed.
    #[error(transparent)]
    Rejected(#[from] ActionRejected),

    /// The rules hit an inconsistent state.
    #[error(transparent)]
    Rules(#[from] RulesError),
}
