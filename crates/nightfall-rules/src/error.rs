//! Error types for the rules layer.
//!
//! Two families, handled very differently by the session layer:
//!
//! - [`ActionRejected`]: a participant asked for something the rules don't
//!   allow right now. The caller gets it back; the session carries on
//!   untouched.
//! - [`RulesError`]: the session itself is in a state the rules can't
//!   work with. Fatal for that session only.

use nightfall_protocol::{Phase, PlayerId, Role};

/// A submission refused by validation. Session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    /// The actor is not part of this session's roster.
    #[error("player {0} is not in this session")]
    NotInRoster(PlayerId),

    /// Dead participants don't act, vote, or skip.
    #[error("player {0} is dead")]
    ActorDead(PlayerId),

    /// The submission belongs to a phase that isn't open.
    #[error("{expected} phase is not open (current phase: {actual})")]
    WrongPhase { expected: Phase, actual: Phase },

    /// The actor's role doesn't grant this action.
    #[error("a {role} cannot do that")]
    NotPermitted { role: Role },

    /// Targets must be alive.
    #[error("target {0} is not alive")]
    TargetNotAlive(PlayerId),

    /// Night actions can't target the actor.
    #[error("cannot target yourself")]
    SelfTarget,

    /// A single-use role already acted this night.
    #[error("player {0} already acted this night")]
    AlreadyActed(PlayerId),

    /// Nobody acts on the opening night.
    #[error("no night actions on the first night")]
    OpeningNight,

    /// The lobby already has this participant.
    #[error("player {0} already joined")]
    AlreadyJoined(PlayerId),

    /// The lobby already holds as many participants as the role set has roles.
    #[error("roster is full ({0} players)")]
    RosterFull(usize),
}

/// An inconsistent state. The session that hit it is torn down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The catalogue has no role set for this many players.
    #[error("no role sets for {0} players")]
    UnsupportedRosterSize(usize),

    /// Roster size and role set length differ.
    #[error("roster has {roster} players but role set has {roles} roles")]
    RosterMismatch { roster: usize, roles: usize },

    /// A participant appears twice in the roster.
    #[error("player {0} appears twice in the roster")]
    DuplicateParticipant(PlayerId),

    /// A resolver needs at least one living participant.
    #[error("no living participants")]
    NoLivingParticipants,

    /// A resolver was called outside its phase.
    #[error("cannot resolve {expected} during {actual}")]
    ResolveOutOfPhase { expected: Phase, actual: Phase },

    /// A catalogue entry breaks a catalogue rule.
    #[error("invalid role set for {size} players: {reason}")]
    InvalidRoleSet { size: usize, reason: String },

    /// The alive/dead partition or the role map no longer matches the roster.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}
