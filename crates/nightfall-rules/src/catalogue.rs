//! The role catalogue: which role sets are playable at which roster size.
//!
//! The catalogue is built once at startup and then only read, so the
//! session layer shares it behind an `Arc` without locking.

use std::collections::BTreeMap;
use std::fmt;

use nightfall_protocol::Role;
use serde::{Deserialize, Serialize};

use crate::RulesError;

// ---------------------------------------------------------------------------
// RoleSet
// ---------------------------------------------------------------------------

/// An ordered multiset of roles, one per seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn new(roles: Vec<Role>) -> Self {
        Self(roles)
    }

    pub fn roles(&self) -> &[Role] {
        &self.0
    }

    /// Number of seats, which is also the roster size it needs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How many seats hold `role`.
    pub fn count(&self, role: Role) -> usize {
        self.0.iter().filter(|r| **r == role).count()
    }

    /// The first role that must appear at most once but appears more often.
    pub fn repeated_unique_role(&self) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| role.unique_per_game() && self.count(*role) > 1)
    }

    /// Role frequencies, ordered by role.
    pub fn counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for role in &self.0 {
            *counts.entry(*role).or_insert(0) += 1;
        }
        counts
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self(roles)
    }
}

/// Renders as `villager×2, seer×1, wolf×1`.
impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (role, count) in self.counts() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{role}×{count}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Roster size → candidate role sets.
#[derive(Debug, Clone)]
pub struct Catalogue {
    presets: BTreeMap<usize, Vec<RoleSet>>,
}

impl Catalogue {
    /// Builds a catalogue from `(size, sets)` pairs and validates it.
    ///
    /// # Errors
    /// [`RulesError::InvalidRoleSet`] if any set is empty, has no wolf, or
    /// has a length different from its size key.
    pub fn from_presets(
        presets: impl IntoIterator<Item = (usize, Vec<RoleSet>)>,
    ) -> Result<Self, RulesError> {
        let catalogue = Self {
            presets: presets.into_iter().collect(),
        };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// The stock presets for 3 to 7 players.
    pub fn standard() -> Self {
        use Role::{Knight as K, Madman as M, Medium as D, Seer as S, Villager as V, Wolf as W};

        let sets = |sets: Vec<Vec<Role>>| sets.into_iter().map(RoleSet::new).collect();
        let mut presets = BTreeMap::new();
        presets.insert(
            3,
            sets(vec![vec![V, V, W], vec![V, S, W], vec![V, M, W]]),
        );
        presets.insert(
            4,
            sets(vec![
                vec![V, V, V, W],
                vec![V, S, V, W],
                vec![V, V, M, W],
                vec![V, S, M, W],
            ]),
        );
        presets.insert(
            5,
            sets(vec![
                vec![V, V, S, M, W],
                vec![V, V, V, W, W],
                vec![V, V, S, W, W],
                vec![V, S, M, W, W],
                vec![V, V, S, K, W],
            ]),
        );
        presets.insert(
            6,
            sets(vec![
                vec![V, V, V, S, M, W],
                vec![V, V, S, M, W, W],
                vec![V, V, V, S, W, W],
                vec![V, V, S, M, M, W],
                vec![V, V, S, K, M, W],
            ]),
        );
        presets.insert(
            7,
            sets(vec![
                vec![V, V, V, S, M, W, W],
                vec![V, V, S, K, D, W, W],
                vec![V, V, V, S, M, M, W],
                vec![V, V, S, M, M, W, W],
                vec![V, S, K, D, M, W, W],
            ]),
        );
        Self { presets }
    }

    /// Candidate role sets for a roster of `size`.
    ///
    /// # Errors
    /// [`RulesError::UnsupportedRosterSize`] if the catalogue has none.
    pub fn candidates(&self, size: usize) -> Result<&[RoleSet], RulesError> {
        self.presets
            .get(&size)
            .map(Vec::as_slice)
            .ok_or(RulesError::UnsupportedRosterSize(size))
    }

    /// Whether `set` matches one of the candidates for its own size.
    ///
    /// Seat order doesn't matter; only the role frequencies are compared.
    pub fn contains(&self, set: &RoleSet) -> bool {
        let counts = set.counts();
        self.presets
            .get(&set.len())
            .is_some_and(|sets| sets.iter().any(|s| s.counts() == counts))
    }

    /// Supported roster sizes, ascending.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.presets.keys().copied()
    }

    /// Smallest supported roster size (0 for an empty catalogue).
    pub fn min_players(&self) -> usize {
        self.presets.keys().next().copied().unwrap_or(0)
    }

    /// Largest supported roster size (0 for an empty catalogue).
    pub fn max_players(&self) -> usize {
        self.presets.keys().next_back().copied().unwrap_or(0)
    }

    /// Checks every entry against the catalogue rules.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (&size, sets) in &self.presets {
            if sets.is_empty() {
                return Err(RulesError::InvalidRoleSet {
                    size,
                    reason: "no candidate sets".into(),
                });
            }
            for set in sets {
                if set.len() != size {
                    return Err(RulesError::InvalidRoleSet {
                        size,
                        reason: format!("set has {} roles", set.len()),
                    });
                }
                if set.count(Role::Wolf) == 0 {
                    return Err(RulesError::InvalidRoleSet {
                        size,
                        reason: "set has no wolf".into(),
                    });
                }
                if let Some(role) = set.repeated_unique_role() {
                    return Err(RulesError::InvalidRoleSet {
                        size,
                        reason: format!("set has more than one {role}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}
