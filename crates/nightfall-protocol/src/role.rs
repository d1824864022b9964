//! Roles, factions, and the per-role behavior table.
//!
//! Every rule the engine applies to a role is read from the methods here,
//! so adding a role means adding one variant and one row of attributes.

use serde::{Deserialize, Serialize};

use std::fmt;

/// The two sides a session can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Villagers,
    Werewolves,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Villagers => write!(f, "villagers"),
            Self::Werewolves => write!(f, "werewolves"),
        }
    }
}

/// Who learns the private information a role produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealScope {
    /// Only the role holder.
    SelfOnly,
    /// The role produces no private information.
    Nobody,
}

/// A secret role tag.
///
/// `Ord` gives role sets a stable order when they are counted or printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No ability. Finds the wolves by talking.
    Villager,
    /// Picks a victim every night after the first.
    Wolf,
    /// Learns whether one participant is a wolf each night.
    Seer,
    /// Guards one participant from the wolves each night.
    Knight,
    /// Learns whether the last executed participant was a wolf.
    Medium,
    /// Human on the wolves' side. Wins with them, is not counted as one.
    Madman,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Villager,
        Role::Wolf,
        Role::Seer,
        Role::Knight,
        Role::Medium,
        Role::Madman,
    ];

    /// Whether the role submits an action during the night.
    pub fn acts_at_night(self) -> bool {
        matches!(self, Self::Wolf | Self::Seer | Self::Knight)
    }

    /// Whether a second night submission is rejected instead of replacing
    /// the first.
    pub fn single_use_per_night(self) -> bool {
        matches!(self, Self::Seer | Self::Knight)
    }

    /// At most one seat per role set may hold this role. Night actions
    /// and readings keep a single slot for it.
    pub fn unique_per_game(self) -> bool {
        matches!(self, Self::Seer | Self::Knight | Self::Medium)
    }

    /// The faction credited when the game ends.
    pub fn faction(self) -> Faction {
        match self {
            Self::Wolf | Self::Madman => Faction::Werewolves,
            _ => Faction::Villagers,
        }
    }

    /// Hostile-aligned for victory purposes (wolf and madman).
    pub fn hostile_faction(self) -> bool {
        self.faction() == Faction::Werewolves
    }

    /// Counted in the wolf head-count used by the win threshold, and what
    /// the seer and medium see as "hostile". The madman is not.
    pub fn counts_as_wolf(self) -> bool {
        matches!(self, Self::Wolf)
    }

    /// Who learns the private information this role produces.
    pub fn reveals_info_to(self) -> RevealScope {
        match self {
            Self::Seer | Self::Medium => RevealScope::SelfOnly,
            _ => RevealScope::Nobody,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Villager => "villager",
            Self::Wolf => "wolf",
            Self::Seer => "seer",
            Self::Knight => "knight",
            Self::Medium => "medium",
            Self::Madman => "madman",
        };
        f.write_str(name)
    }
}
