//! Shared vocabulary for Nightfall.
//!
//! - **Types** ([`PlayerId`], [`SessionId`], [`Participant`], [`Phase`],
//!   [`Recipient`]): identities and phases.
//! - **Roles** ([`Role`], [`Faction`]): the role behavior table.
//! - **Events** ([`GameEvent`], [`Envelope`]): what the engine tells the
//!   delivery layer.
//! - **Codec** ([`Codec`], [`JsonCodec`]): turning events into bytes.
//!
//! ```text
//! Delivery layer (chat, DMs, buttons)
//!     ↕  Envelope<GameEvent>
//! Session layer (scheduler actors)
//!     ↕
//! Rules layer (resolvers, win check)
//! ```

mod codec;
mod error;
mod event;
mod role;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::{EndReason, Envelope, GameEvent, MediumFact, RoleReveal, SeerFact};
pub use role::{Faction, RevealScope, Role};
pub use types::{Participant, Phase, PlayerId, Recipient, SessionId};
