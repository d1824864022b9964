//! Win evaluation.

use std::collections::{BTreeMap, BTreeSet};

use nightfall_protocol::{Faction, PlayerId, Role};

use crate::Session;

/// Decides whether the game is over.
///
/// Only wolves are counted against the rest of the living; the madman
/// shares the werewolf win but is counted with the others here.
///
/// - no living wolf → [`Faction::Villagers`]
/// - living wolves ≥ everyone else alive → [`Faction::Werewolves`]
/// - otherwise `None`
pub fn evaluate(alive: &BTreeSet<PlayerId>, roles: &BTreeMap<PlayerId, Role>) -> Option<Faction> {
    let wolf_count = alive
        .iter()
        .filter(|id| roles.get(*id).is_some_and(|r| r.counts_as_wolf()))
        .count();
    let other_count = alive.len() - wolf_count;

    if wolf_count == 0 {
        Some(Faction::Villagers)
    } else if wolf_count >= other_count {
        Some(Faction::Werewolves)
    } else {
        None
    }
}

/// Everyone credited with a `faction` win, living or dead, in id order.
pub fn winners(faction: Faction, roles: &BTreeMap<PlayerId, Role>) -> Vec<PlayerId> {
    roles
        .iter()
        .filter(|(_, role)| role.faction() == faction)
        .map(|(id, _)| *id)
        .collect()
}

impl Session {
    /// [`evaluate`] over this session's current state.
    pub fn winner(&self) -> Option<Faction> {
        evaluate(&self.alive, &self.role_map)
    }
}
