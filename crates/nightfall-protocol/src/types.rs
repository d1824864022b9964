//! Identity and phase types shared by every Nightfall crate.
//!
//! These are the nouns the engine and the delivery layer agree on: who a
//! participant is, which session they sit in, which phase is running, and
//! who an event is addressed to.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable, opaque identifier for a participant.
///
/// The delivery layer owns the mapping from its own user ids to this
/// newtype; the engine never interprets the number. `Ord` is derived so
/// rosters can live in ordered sets, which keeps every seeded random pick
/// reproducible.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for one game session (one room).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A participant: stable id plus the handle the delivery layer renders.
///
/// Immutable once the roster is locked; the engine only ever clones it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub handle: String,
}

impl Participant {
    pub fn new(id: PlayerId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.handle, self.id)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The in-game phase of a locked session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Private, role-gated actions.
    Night,
    /// Public discussion. No structured input.
    Day,
    /// Everyone alive picks someone to execute.
    Vote,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Night => write!(f, "night"),
            Self::Day => write!(f, "day"),
            Self::Vote => write!(f, "vote"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who an emitted event is addressed to.
///
/// The engine decides visibility; the delivery layer decides whether that
/// means a DM, a channel post, or a mention fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every participant in the session.
    All,

    /// One participant only (private information).
    Player(PlayerId),

    /// Everyone except the given participant. Used when one participant
    /// gets a richer private copy of a public event.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if `player` should see an event sent to this recipient.
    pub fn includes(&self, player: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(p) => *p == player,
            Self::AllExcept(p) => *p != player,
        }
    }
}
