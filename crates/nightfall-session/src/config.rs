//! Session configuration and lifecycle states.

use std::fmt;
use std::time::Duration;

use nightfall_protocol::Phase;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Per-manager settings applied to every session it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a night waits for the owed submissions.
    pub night_timeout: Duration,

    /// Length of the discussion before the vote opens.
    pub day_duration: Duration,

    /// How long a vote waits for every living participant.
    pub vote_timeout: Duration,

    /// How long an unfilled lobby may sit idle before it expires.
    pub lobby_timeout: Duration,

    /// Fewest participants still present for a running game to continue.
    pub min_players: usize,

    /// Command channel capacity per session actor.
    pub channel_size: usize,

    /// Fixed RNG seed for every session. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            night_timeout: Duration::from_secs(120),
            day_duration: Duration::from_secs(60),
            vote_timeout: Duration::from_secs(60),
            lobby_timeout: Duration::from_secs(300),
            min_players: 3,
            channel_size: 64,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Shortest wait any phase or lobby may be given.
    pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called by `SessionManager::new`. Rules:
    /// - every timeout is at least [`Self::MIN_TIMEOUT`]
    /// - `min_players` and `channel_size` are at least 1
    pub fn validated(mut self) -> Self {
        for (name, timeout) in [
            ("night_timeout", &mut self.night_timeout),
            ("day_duration", &mut self.day_duration),
            ("vote_timeout", &mut self.vote_timeout),
            ("lobby_timeout", &mut self.lobby_timeout),
        ] {
            if *timeout < Self::MIN_TIMEOUT {
                tracing::warn!(
                    field = name,
                    secs = timeout.as_secs_f64(),
                    "timeout below minimum, clamping"
                );
                *timeout = Self::MIN_TIMEOUT;
            }
        }
        if self.min_players == 0 {
            tracing::warn!("min_players is 0, clamping to 1");
            self.min_players = 1;
        }
        if self.channel_size == 0 {
            tracing::warn!("channel_size is 0, clamping to 1");
            self.channel_size = 1;
        }
        self
    }

    /// The bounded wait for `phase`.
    pub fn timeout_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Night => self.night_timeout,
            Phase::Day => self.day_duration,
            Phase::Vote => self.vote_timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of a session.
///
/// ```text
/// WaitingForPlayers → Night → Day → Vote → Night → …
///         ↓             ↓      ↓      ↓
///                  Terminated
/// ```
///
/// - **WaitingForPlayers**: the lobby is open and filling up.
/// - **Night / Day / Vote**: a locked game is running that phase.
/// - **Terminated**: a winner was found, or the session was cancelled,
///   reset, expired or aborted. The actor is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    WaitingForPlayers,
    Night,
    Day,
    Vote,
    Terminated,
}

impl SessionState {
    /// Returns `true` if the session is accepting new participants.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayers)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::WaitingForPlayers, Self::Night)
                | (Self::Night, Self::Day)
                | (Self::Day, Self::Vote)
                | (Self::Vote, Self::Night)
        ) || (self != Self::Terminated && target == Self::Terminated)
    }
}

impl From<Phase> for SessionState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Night => Self::Night,
            Phase::Day => Self::Day,
            Phase::Vote => Self::Vote,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::Night => write!(f, "Night"),
            Self::Day => write!(f, "Day"),
            Self::Vote => write!(f, "Vote"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}
