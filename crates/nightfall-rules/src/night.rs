//! Night resolution: guards, attacks, and private readings.

use std::collections::BTreeSet;

use nightfall_protocol::{MediumFact, Phase, PlayerId, Role, SeerFact};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{RulesError, Session};

/// What a night produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightOutcome {
    /// The night that was resolved (the day count before resolution).
    pub night: u32,
    /// Participants killed, ascending by id. Possibly empty.
    pub deaths: Vec<PlayerId>,
    /// The attacked participant the knight saved, if any. Not announced.
    pub repelled: Option<PlayerId>,
    /// The seer's private reading.
    pub seer_fact: Option<SeerFact>,
    /// The medium's private reading of the last execution.
    pub medium_fact: Option<MediumFact>,
}

/// Resolves the current night and opens the day.
///
/// 1. The knight's target (if any) is protected.
/// 2. Every distinct wolf target dies unless protected.
/// 3. The seer learns whether their target is a wolf, unless they died.
/// 4. Deaths are applied.
/// 5. On night 1 wolf targets are ignored and the seer instead reads a
///    random living non-hostile participant.
/// 6. A surviving medium learns about the last execution.
///
/// Then `day_count` is incremented, the phase becomes Day and pending
/// actions are cleared. Missing submissions simply mean "no action".
///
/// # Errors
/// [`RulesError::ResolveOutOfPhase`] if the session isn't in Night. The
/// session is left untouched.
pub fn resolve_night<R: Rng + ?Sized>(
    session: &mut Session,
    rng: &mut R,
) -> Result<NightOutcome, RulesError> {
    if session.phase != Phase::Night {
        return Err(RulesError::ResolveOutOfPhase {
            expected: Phase::Night,
            actual: session.phase,
        });
    }

    let night = session.day_count;
    let first_night = night == 1;

    let protected = if first_night {
        None
    } else {
        session.night.knight_target()
    };
    let targets: BTreeSet<PlayerId> = if first_night {
        BTreeSet::new()
    } else {
        session.night.wolf_targets().collect()
    };

    let mut deaths = Vec::new();
    let mut repelled = None;
    for target in targets {
        if Some(target) == protected {
            repelled = Some(target);
        } else if session.is_alive(target) {
            deaths.push(target);
        }
    }

    let seer_fact = if first_night {
        opening_reading(session, rng)
    } else {
        session
            .night
            .seer_target
            .filter(|(seer, _)| !deaths.contains(seer))
            .map(|(seer, target)| SeerFact {
                seer,
                target,
                hostile: reads_hostile(session, target),
            })
    };

    // Nothing above mutated the session; apply everything now.
    for victim in &deaths {
        session.kill(*victim);
    }

    let medium_fact = session.last_executed.and_then(|target| {
        session
            .living_with(Role::Medium)
            .first()
            .map(|&medium| MediumFact {
                medium,
                target,
                hostile: reads_hostile(session, target),
            })
    });

    session.last_executed = None;
    session.day_count += 1;
    session.phase = Phase::Day;
    session.night.clear();

    tracing::info!(
        night,
        deaths = deaths.len(),
        repelled = repelled.is_some(),
        "night resolved"
    );

    Ok(NightOutcome {
        night,
        deaths,
        repelled,
        seer_fact,
        medium_fact,
    })
}

/// The forced first-night reading: a random living participant who isn't
/// hostile-aligned and isn't the seer.
fn opening_reading<R: Rng + ?Sized>(session: &Session, rng: &mut R) -> Option<SeerFact> {
    let seer = *session.living_with(Role::Seer).first()?;
    let harmless: Vec<PlayerId> = session
        .alive
        .iter()
        .copied()
        .filter(|id| *id != seer)
        .filter(|id| session.role_of(*id).is_some_and(|r| !r.hostile_faction()))
        .collect();
    let target = *harmless.choose(rng)?;
    Some(SeerFact {
        seer,
        target,
        hostile: false,
    })
}

fn reads_hostile(session: &Session, player: PlayerId) -> bool {
    session.role_of(player).is_some_and(Role::counts_as_wolf)
}
