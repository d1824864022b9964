//! Events the engine emits for the delivery layer to render.
//!
//! Every event travels inside an [`Envelope`] that says which session it
//! belongs to, its position in that session's stream, and who may see it.
//! The engine never renders anything itself.

use serde::{Deserialize, Serialize};

use crate::{Faction, Participant, Phase, PlayerId, Recipient, Role, SessionId};

/// What the seer learned tonight. Delivered only to the seer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerFact {
    pub seer: PlayerId,
    pub target: PlayerId,
    /// `true` if the target is a wolf. The madman reads as harmless.
    pub hostile: bool,
}

/// What the medium learned about the last executed participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediumFact {
    pub medium: PlayerId,
    pub target: PlayerId,
    pub hostile: bool,
}

/// One line of the end-of-game summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReveal {
    pub player: PlayerId,
    pub role: Role,
    pub alive: bool,
}

/// Why a session ended without a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndReason {
    /// A roster member cancelled the game.
    Cancelled { by: PlayerId },
    /// Too many participants left to keep playing.
    RosterBelowMinimum { present: usize, minimum: usize },
    /// Every lobby member left before the roster was complete.
    LobbyEmptied,
    /// Forced reset from outside the roster.
    Reset,
}

/// A session event.
///
/// Internally tagged: `{"type": "day_started", "day_count": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // -- Lobby --
    PlayerJoined {
        participant: Participant,
        joined: usize,
        needed: usize,
    },
    PlayerLeft {
        player: PlayerId,
        joined: usize,
        needed: usize,
    },
    /// Private: your role, and for wolves and the madman, who the wolves are.
    RoleAssigned {
        role: Role,
        allies: Vec<PlayerId>,
    },

    // -- Phases --
    NightStarted {
        day_count: u32,
    },
    /// Public copy carries `seer_fact: None`; the seer's copy carries the fact.
    NightResolved {
        deaths: Vec<PlayerId>,
        seer_fact: Option<SeerFact>,
    },
    /// Private to the medium.
    MediumReading {
        fact: MediumFact,
    },
    DayStarted {
        day_count: u32,
    },
    VoteStarted {
        day_count: u32,
    },
    VoteResolved {
        executed: PlayerId,
        vote_count: usize,
        tie_broken: bool,
        /// Nobody voted; the execution was a uniform random pick.
        random_pick: bool,
    },
    /// A participant left a running game and was removed from play.
    PlayerForfeited {
        player: PlayerId,
    },
    PhaseTimedOut {
        phase: Phase,
    },
    PhaseSkipped {
        phase: Phase,
    },

    // -- Termination --
    GameEnded {
        winning_faction: Faction,
        winners: Vec<PlayerId>,
        final_roles: Vec<RoleReveal>,
    },
    SessionEnded {
        reason: EndReason,
    },
    LobbyExpired,
    /// The session hit an inconsistent state and was torn down.
    SessionAborted {
        reason: String,
    },
}

impl GameEvent {
    /// Returns `true` for events after which the session stream ends.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::GameEnded { .. }
                | Self::SessionEnded { .. }
                | Self::LobbyExpired
                | Self::SessionAborted { .. }
        )
    }
}

/// An addressed event on a session's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub session_id: SessionId,
    /// Per-session sequence number, starting at 1.
    pub seq: u64,
    pub recipient: Recipient,
    pub event: GameEvent,
}
