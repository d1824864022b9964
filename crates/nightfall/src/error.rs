//! Unified error type for the Nightfall facade.

use nightfall_protocol::ProtocolError;
use nightfall_rules::{ActionRejected, RulesError};
use nightfall_session::SessionError;

/// Top-level error that wraps every crate-specific error.
///
/// `?` converts sub-crate errors automatically, so a delivery layer can
/// deal with this one type.
#[derive(Debug, thiserror::Error)]
pub enum NightfallError {
    /// Encoding or decoding an event failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A catalogue or game-state error from the rules layer.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A submission the rules refused.
    #[error(transparent)]
    Rejected(#[from] ActionRejected),

    /// A session-level error (unknown session, wrong state, closed actor).
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl NightfallError {
    /// Returns the rejection behind this error, however it was wrapped.
    ///
    /// Rejections are the errors worth showing to the participant who
    /// caused them.
    pub fn rejection(&self) -> Option<&ActionRejected> {
        match self {
            Self::Rejected(rejected) | Self::Session(SessionError::Rejected(rejected)) => {
                Some(rejected)
            }
            _ => None,
        }
    }
}
