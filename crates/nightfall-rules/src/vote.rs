//! Vote resolution: tally, tie-break, execute.

use std::collections::BTreeMap;

use nightfall_protocol::{Phase, PlayerId};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{RulesError, Session};

/// What a vote produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The day the vote was held on.
    pub day: u32,
    pub executed: PlayerId,
    /// Votes the executed participant received (0 if nobody voted).
    pub vote_count: usize,
    /// More than one participant shared the top count.
    pub tie_broken: bool,
    /// Nobody voted, so the execution was a uniform pick among the living.
    pub random_pick: bool,
    /// Counted votes per target.
    pub tally: BTreeMap<PlayerId, usize>,
}

/// Counts votes cast by living participants for living targets.
pub fn tally_votes(session: &Session) -> BTreeMap<PlayerId, usize> {
    let mut tally = BTreeMap::new();
    for (voter, target) in &session.votes {
        if session.is_alive(*voter) && session.is_alive(*target) {
            *tally.entry(*target).or_insert(0) += 1;
        }
    }
    tally
}

/// Resolves the current vote and returns the session to Night.
///
/// The participant with the most votes is executed; ties are broken
/// uniformly at random, and if nobody voted the execution is a uniform
/// pick among the living. Pending votes and night actions are cleared and
/// the executed participant is remembered for the medium.
///
/// # Errors
/// - [`RulesError::ResolveOutOfPhase`] outside Vote.
/// - [`RulesError::NoLivingParticipants`] if nobody is alive.
///
/// In both cases the session is left untouched.
pub fn resolve_vote<R: Rng + ?Sized>(
    session: &mut Session,
    rng: &mut R,
) -> Result<VoteOutcome, RulesError> {
    if session.phase != Phase::Vote {
        return Err(RulesError::ResolveOutOfPhase {
            expected: Phase::Vote,
            actual: session.phase,
        });
    }
    if session.alive.is_empty() {
        return Err(RulesError::NoLivingParticipants);
    }

    let tally = tally_votes(session);
    let (executed, vote_count, tie_broken, random_pick) = match tally.values().max() {
        None => {
            let living: Vec<PlayerId> = session.alive.iter().copied().collect();
            let pick = *living.choose(rng).ok_or(RulesError::NoLivingParticipants)?;
            (pick, 0, false, true)
        }
        Some(&top) => {
            let leaders: Vec<PlayerId> = tally
                .iter()
                .filter(|(_, count)| **count == top)
                .map(|(id, _)| *id)
                .collect();
            let pick = *leaders.choose(rng).ok_or(RulesError::NoLivingParticipants)?;
            (pick, top, leaders.len() > 1, false)
        }
    };

    session.kill(executed);
    session.last_executed = Some(executed);
    session.votes.clear();
    session.night.clear();
    session.phase = Phase::Night;

    tracing::info!(
        day = session.day_count,
        %executed,
        vote_count,
        tie_broken,
        random_pick,
        "vote resolved"
    );

    Ok(VoteOutcome {
        day: session.day_count,
        executed,
        vote_count,
        tie_broken,
        random_pick,
        tally,
    })
}
