//! # Nightfall
//!
//! A session engine for werewolf-style social deduction games.
//!
//! Nightfall deals roles, collects secret night actions and public votes,
//! resolves each phase, and decides when a faction has won. It renders
//! nothing: every outcome is an addressed [`Envelope`](prelude::Envelope)
//! on a per-session event stream, and the delivery layer (a chat bot, a
//! web client) decides how to show it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nightfall::prelude::*;
//!
//! # async fn run() -> Result<(), NightfallError> {
//! nightfall::telemetry::init();
//!
//! let mut manager = NightfallBuilder::new().seed(7).build()?;
//! let (events, mut stream) = tokio::sync::mpsc::unbounded_channel();
//!
//! let role_set = manager.candidates(4)?[0].clone();
//! let session = manager.open_lobby(role_set, events)?;
//! for id in 1..=4 {
//!     manager.join(session, Participant::new(PlayerId(id), format!("p{id}"))).await?;
//! }
//! while let Some(envelope) = stream.recv().await {
//!     println!("{:?}", envelope.event);
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod telemetry;

pub use builder::NightfallBuilder;
pub use error::NightfallError;

/// Everything a delivery layer needs in one import.
pub mod prelude {
    pub use crate::{NightfallBuilder, NightfallError};

    pub use nightfall_protocol::{
        Codec, EndReason, Envelope, Faction, GameEvent, JsonCodec, MediumFact, Participant,
        Phase, PlayerId, ProtocolError, Recipient, RevealScope, Role, RoleReveal, SeerFact,
        SessionId,
    };
    pub use nightfall_rules::{ActionRejected, Catalogue, NightAction, RoleSet, RulesError};
    pub use nightfall_session::{
        JoinStatus, SessionConfig, SessionError, SessionHandle, SessionInfo, SessionManager,
        SessionState, SkipStatus, TimerMetrics,
    };
}
