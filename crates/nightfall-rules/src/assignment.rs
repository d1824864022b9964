//! Role assignment: the one-shot shuffle that turns a roster into a session.

use std::collections::{BTreeMap, BTreeSet};

use nightfall_protocol::{Participant, Phase, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{NightActions, RoleSet, RulesError, Session};

/// Deals `role_set` across `roster`.
///
/// Seat order and role order are shuffled independently, then zipped, so
/// every participant gets exactly one role and the role frequencies match
/// the set exactly. The roster keeps the order it was given in.
///
/// The new session starts on night 1 with everyone alive.
///
/// # Errors
/// - [`RulesError::RosterMismatch`] if the sizes differ.
/// - [`RulesError::DuplicateParticipant`] if an id repeats.
/// - [`RulesError::InvalidRoleSet`] if the set repeats a seer, knight or
///   medium.
pub fn assign_roles<R: Rng + ?Sized>(
    roster: Vec<Participant>,
    role_set: &RoleSet,
    rng: &mut R,
) -> Result<Session, RulesError> {
    if roster.len() != role_set.len() {
        return Err(RulesError::RosterMismatch {
            roster: roster.len(),
            roles: role_set.len(),
        });
    }

    if let Some(role) = role_set.repeated_unique_role() {
        return Err(RulesError::InvalidRoleSet {
            size: role_set.len(),
            reason: format!("set has more than one {role}"),
        });
    }

    let mut seen = BTreeSet::new();
    for participant in &roster {
        if !seen.insert(participant.id) {
            return Err(RulesError::DuplicateParticipant(participant.id));
        }
    }

    let mut seats: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();
    let mut roles = role_set.roles().to_vec();
    seats.shuffle(rng);
    roles.shuffle(rng);
    let role_map: BTreeMap<_, _> = seats.into_iter().zip(roles).collect();

    tracing::debug!(players = roster.len(), roles = %role_set, "roles assigned");

    Ok(Session {
        roster,
        role_set: role_set.clone(),
        role_map,
        alive: seen,
        dead: BTreeSet::new(),
        phase: Phase::Night,
        day_count: 1,
        night: NightActions::default(),
        votes: BTreeMap::new(),
        last_executed: None,
    })
}
