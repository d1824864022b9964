//! The session aggregate and the lobby that precedes it.
//!
//! A [`Lobby`] collects participants until the roster matches the chosen
//! role set; locking it runs role assignment and yields a [`Session`].
//! From then on the roster and role map never change, and every death
//! moves a participant from `alive` to `dead`.
//!
//! The session owns no locks or channels. Whoever drives it (the scheduler
//! actor) is the only writer; submissions are validated here so the
//! driver can hand rejections straight back to the caller.

use std::collections::{BTreeMap, BTreeSet};

use nightfall_protocol::{Participant, Phase, PlayerId, Role, RoleReveal};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ActionRejected, RoleSet, RulesError, assign_roles};

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// An unlocked roster waiting to fill up.
///
/// Append-only apart from departures; nothing about roles is known yet.
#[derive(Debug, Clone)]
pub struct Lobby {
    role_set: RoleSet,
    roster: Vec<Participant>,
}

impl Lobby {
    pub fn new(role_set: RoleSet) -> Self {
        Self {
            role_set,
            roster: Vec::new(),
        }
    }

    pub fn role_set(&self) -> &RoleSet {
        &self.role_set
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    /// Seats in total (the role set length).
    pub fn needed(&self) -> usize {
        self.role_set.len()
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.needed()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.roster.iter().any(|p| p.id == player)
    }

    /// Adds a participant. Returns the new roster size.
    pub fn join(&mut self, participant: Participant) -> Result<usize, ActionRejected> {
        if self.contains(participant.id) {
            return Err(ActionRejected::AlreadyJoined(participant.id));
        }
        if self.is_full() {
            return Err(ActionRejected::RosterFull(self.needed()));
        }
        self.roster.push(participant);
        Ok(self.roster.len())
    }

    /// Removes a participant. Returns the new roster size.
    pub fn leave(&mut self, player: PlayerId) -> Result<usize, ActionRejected> {
        let before = self.roster.len();
        self.roster.retain(|p| p.id != player);
        if self.roster.len() == before {
            return Err(ActionRejected::NotInRoster(player));
        }
        Ok(self.roster.len())
    }

    /// Locks the roster and assigns roles.
    ///
    /// # Errors
    /// [`RulesError::RosterMismatch`] if the roster isn't exactly full.
    pub fn lock<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Session, RulesError> {
        assign_roles(self.roster, &self.role_set, rng)
    }
}

// ---------------------------------------------------------------------------
// Night actions
// ---------------------------------------------------------------------------

/// A role-gated night submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum NightAction {
    /// Wolf: try to kill the target.
    Attack(PlayerId),
    /// Seer: learn whether the target is a wolf.
    Divine(PlayerId),
    /// Knight: protect the target from tonight's attack.
    Guard(PlayerId),
}

impl NightAction {
    pub fn target(self) -> PlayerId {
        match self {
            Self::Attack(t) | Self::Divine(t) | Self::Guard(t) => t,
        }
    }

    /// The role allowed to submit this action.
    pub fn role(self) -> Role {
        match self {
            Self::Attack(_) => Role::Wolf,
            Self::Divine(_) => Role::Seer,
            Self::Guard(_) => Role::Knight,
        }
    }
}

/// Tonight's pending submissions, as `(actor, target)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightActions {
    /// One entry per submitting wolf, in order of first submission.
    pub(crate) wolf_targets: Vec<(PlayerId, PlayerId)>,
    pub(crate) seer_target: Option<(PlayerId, PlayerId)>,
    pub(crate) knight_target: Option<(PlayerId, PlayerId)>,
}

impl NightActions {
    /// Wolf targets in submission order (duplicates included).
    pub fn wolf_targets(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.wolf_targets.iter().map(|(_, target)| *target)
    }

    pub fn wolf_submissions(&self) -> usize {
        self.wolf_targets.len()
    }

    pub fn seer_target(&self) -> Option<PlayerId> {
        self.seer_target.map(|(_, target)| target)
    }

    pub fn knight_target(&self) -> Option<PlayerId> {
        self.knight_target.map(|(_, target)| target)
    }

    /// Whether `actor` has a submission on record tonight.
    pub fn has_acted(&self, actor: PlayerId) -> bool {
        self.wolf_targets.iter().any(|(wolf, _)| *wolf == actor)
            || self.seer_target.is_some_and(|(seer, _)| seer == actor)
            || self.knight_target.is_some_and(|(knight, _)| knight == actor)
    }

    pub fn is_empty(&self) -> bool {
        self.wolf_targets.is_empty() && self.seer_target.is_none() && self.knight_target.is_none()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One locked game: roster, secret roles, who's alive, and what's pending.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) roster: Vec<Participant>,
    pub(crate) role_set: RoleSet,
    pub(crate) role_map: BTreeMap<PlayerId, Role>,
    pub(crate) alive: BTreeSet<PlayerId>,
    pub(crate) dead: BTreeSet<PlayerId>,
    pub(crate) phase: Phase,
    pub(crate) day_count: u32,
    pub(crate) night: NightActions,
    pub(crate) votes: BTreeMap<PlayerId, PlayerId>,
    pub(crate) last_executed: Option<PlayerId>,
}

impl Session {
    // -- Read access --

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn participant(&self, player: PlayerId) -> Option<&Participant> {
        self.roster.iter().find(|p| p.id == player)
    }

    pub fn in_roster(&self, player: PlayerId) -> bool {
        self.role_map.contains_key(&player)
    }

    pub fn role_set(&self) -> &RoleSet {
        &self.role_set
    }

    pub fn role_map(&self) -> &BTreeMap<PlayerId, Role> {
        &self.role_map
    }

    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        self.role_map.get(&player).copied()
    }

    pub fn alive(&self) -> &BTreeSet<PlayerId> {
        &self.alive
    }

    pub fn dead(&self) -> &BTreeSet<PlayerId> {
        &self.dead
    }

    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.alive.contains(&player)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    pub fn night(&self) -> &NightActions {
        &self.night
    }

    pub fn votes(&self) -> &BTreeMap<PlayerId, PlayerId> {
        &self.votes
    }

    pub fn last_executed(&self) -> Option<PlayerId> {
        self.last_executed
    }

    /// The opening night: no attacks, forced seer reading.
    pub fn is_first_night(&self) -> bool {
        self.phase == Phase::Night && self.day_count == 1
    }

    /// Everyone holding `role`, alive or dead, in id order.
    pub fn holders_of(&self, role: Role) -> Vec<PlayerId> {
        self.role_map
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Living holders of `role`, in id order.
    pub fn living_with(&self, role: Role) -> Vec<PlayerId> {
        self.alive
            .iter()
            .copied()
            .filter(|id| self.role_of(*id) == Some(role))
            .collect()
    }

    /// Every participant's role and survival, in roster order.
    pub fn final_roles(&self) -> Vec<RoleReveal> {
        self.roster
            .iter()
            .filter_map(|p| {
                self.role_of(p.id).map(|role| RoleReveal {
                    player: p.id,
                    role,
                    alive: self.is_alive(p.id),
                })
            })
            .collect()
    }

    // -- Phase completion --

    /// Living participants who still owe a submission tonight.
    ///
    /// Nobody is owed on the first night. Afterwards every living wolf,
    /// seer and knight owes one action.
    pub fn pending_night_actors(&self) -> Vec<PlayerId> {
        if self.phase != Phase::Night || self.day_count == 1 {
            return Vec::new();
        }
        self.alive
            .iter()
            .copied()
            .filter(|id| self.role_of(*id).is_some_and(Role::acts_at_night))
            .filter(|id| !self.night.has_acted(*id))
            .collect()
    }

    pub fn night_complete(&self) -> bool {
        self.pending_night_actors().is_empty()
    }

    /// Living participants who haven't voted yet.
    pub fn pending_voters(&self) -> Vec<PlayerId> {
        self.alive
            .iter()
            .copied()
            .filter(|id| !self.votes.contains_key(id))
            .collect()
    }

    pub fn votes_complete(&self) -> bool {
        self.phase == Phase::Vote && self.pending_voters().is_empty()
    }

    // -- Submissions --

    /// Validates and records a night action.
    ///
    /// Wolves may change their pick until the night closes; seer and
    /// knight get one submission per night.
    pub fn submit_night_action(
        &mut self,
        actor: PlayerId,
        action: NightAction,
    ) -> Result<(), ActionRejected> {
        let role = self.check_actor(actor, Phase::Night)?;
        if role != action.role() {
            return Err(ActionRejected::NotPermitted { role });
        }
        if self.day_count == 1 {
            return Err(ActionRejected::OpeningNight);
        }
        let target = action.target();
        if target == actor {
            return Err(ActionRejected::SelfTarget);
        }
        if !self.is_alive(target) {
            return Err(ActionRejected::TargetNotAlive(target));
        }
        if role.single_use_per_night() && self.night.has_acted(actor) {
            return Err(ActionRejected::AlreadyActed(actor));
        }

        match action {
            NightAction::Attack(_) => {
                match self.night.wolf_targets.iter_mut().find(|(w, _)| *w == actor) {
                    Some(entry) => entry.1 = target,
                    None => self.night.wolf_targets.push((actor, target)),
                }
            }
            NightAction::Divine(_) => self.night.seer_target = Some((actor, target)),
            NightAction::Guard(_) => self.night.knight_target = Some((actor, target)),
        }

        tracing::debug!(%actor, %target, %role, "night action recorded");
        Ok(())
    }

    /// Validates and records a vote. A later vote replaces an earlier one.
    pub fn submit_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), ActionRejected> {
        self.check_actor(voter, Phase::Vote)?;
        if !self.is_alive(target) {
            return Err(ActionRejected::TargetNotAlive(target));
        }
        self.votes.insert(voter, target);
        tracing::debug!(%voter, %target, "vote recorded");
        Ok(())
    }

    /// Common checks: in roster, phase open, alive. Returns the actor's role.
    pub fn check_actor(&self, actor: PlayerId, expected: Phase) -> Result<Role, ActionRejected> {
        let role = self
            .role_of(actor)
            .ok_or(ActionRejected::NotInRoster(actor))?;
        if self.phase != expected {
            return Err(ActionRejected::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        if !self.is_alive(actor) {
            return Err(ActionRejected::ActorDead(actor));
        }
        Ok(role)
    }

    // -- Phase changes --

    /// Day → Vote. Clears the ballot box.
    pub fn begin_vote(&mut self) -> Result<(), RulesError> {
        if self.phase != Phase::Day {
            return Err(RulesError::ResolveOutOfPhase {
                expected: Phase::Day,
                actual: self.phase,
            });
        }
        self.phase = Phase::Vote;
        self.votes.clear();
        Ok(())
    }

    /// Removes a participant from play without a resolver (they left).
    ///
    /// Their pending submissions are withdrawn. Returns `false` if they
    /// were already dead.
    pub fn forfeit(&mut self, player: PlayerId) -> Result<bool, ActionRejected> {
        if !self.in_roster(player) {
            return Err(ActionRejected::NotInRoster(player));
        }
        if !self.kill(player) {
            return Ok(false);
        }
        self.night.wolf_targets.retain(|(wolf, _)| *wolf != player);
        if self.night.seer_target.is_some_and(|(seer, _)| seer == player) {
            self.night.seer_target = None;
        }
        if self.night.knight_target.is_some_and(|(knight, _)| knight == player) {
            self.night.knight_target = None;
        }
        self.votes.remove(&player);
        Ok(true)
    }

    /// Moves `player` from alive to dead. Returns `false` if not alive.
    pub(crate) fn kill(&mut self, player: PlayerId) -> bool {
        if self.alive.remove(&player) {
            self.dead.insert(player);
            true
        } else {
            false
        }
    }

    /// Checks that alive/dead partition the roster and the role map covers
    /// exactly the roster.
    pub fn check_invariants(&self) -> Result<(), RulesError> {
        let roster: BTreeSet<PlayerId> = self.roster.iter().map(|p| p.id).collect();
        if roster.len() != self.roster.len() {
            return Err(RulesError::InvariantViolated("duplicate roster entry".into()));
        }
        if let Some(both) = self.alive.intersection(&self.dead).next() {
            return Err(RulesError::InvariantViolated(format!(
                "{both} is both alive and dead"
            )));
        }
        let union: BTreeSet<PlayerId> = self.alive.union(&self.dead).copied().collect();
        if union != roster {
            return Err(RulesError::InvariantViolated(
                "alive and dead do not cover the roster".into(),
            ));
        }
        if !self.role_map.keys().copied().eq(roster.iter().copied()) {
            return Err(RulesError::InvariantViolated(
                "role map does not match the roster".into(),
            ));
        }
        Ok(())
    }
}
