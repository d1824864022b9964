//! Integration tests for session actors and the session manager.
//!
//! Every async test starts with Tokio's clock paused: phase deadlines
//! expire as soon as both the test and the actor are idle, so timeouts are
//! exercised without real waiting.

use std::collections::BTreeMap;
use std::time::Duration;

use nightfall_protocol::{
    EndReason, Envelope, Faction, GameEvent, MediumFact, Participant, Phase, PlayerId, Recipient,
    Role,
};
use nightfall_rules::{ActionRejected, Catalogue, NightAction, RoleSet, RulesError};
use nightfall_session::{SessionConfig, SessionError, SessionManager, SessionState, SkipStatus};
use tokio::sync::mpsc;
use tokio::time::Instant;

// =========================================================================
// Helpers
// =========================================================================

type Events = mpsc::UnboundedReceiver<Envelope>;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn participant(id: u64) -> Participant {
    Participant::new(pid(id), format!("player-{id}"))
}

fn manager() -> SessionManager {
    SessionManager::new(
        Catalogue::standard(),
        SessionConfig {
            seed: Some(7),
            ..SessionConfig::default()
        },
    )
}

fn preset(size: usize, index: usize) -> RoleSet {
    Catalogue::standard().candidates(size).unwrap()[index].clone()
}

async fn next(rx: &mut Events) -> Envelope {
    rx.recv().await.expect("event stream closed early")
}

/// Reads events up to and including the first one matching `done`.
async fn wait_for(rx: &mut Events, done: impl Fn(&GameEvent) -> bool) -> Vec<Envelope> {
    let mut seen = Vec::new();
    loop {
        let envelope = next(rx).await;
        let finished = done(&envelope.event);
        seen.push(envelope);
        if finished {
            return seen;
        }
    }
}

fn roles_from(events: &[Envelope]) -> BTreeMap<PlayerId, Role> {
    events
        .iter()
        .filter_map(|e| match (&e.recipient, &e.event) {
            (Recipient::Player(p), GameEvent::RoleAssigned { role, .. }) => Some((*p, *role)),
            _ => None,
        })
        .collect()
}

fn holders(roles: &BTreeMap<PlayerId, Role>, role: Role) -> Vec<PlayerId> {
    roles
        .iter()
        .filter(|(_, r)| **r == role)
        .map(|(p, _)| *p)
        .collect()
}

/// Opens a lobby for `role_set`, fills it, and waits for the first day.
async fn start_game(
    mgr: &mut SessionManager,
    role_set: RoleSet,
) -> (nightfall_protocol::SessionId, Events, BTreeMap<PlayerId, Role>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let size = role_set.len() as u64;
    let id = mgr.open_lobby(role_set, tx).unwrap();
    for i in 1..=size {
        mgr.join(id, participant(i)).await.unwrap();
    }
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::DayStarted { .. })).await;
    let roles = roles_from(&events);
    assert_eq!(roles.len(), size as usize);
    (id, rx, roles)
}

// =========================================================================
// Lobby
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_lobby_rejects_unknown_role_set() {
    let mut mgr = manager();
    let (tx, _rx) = mpsc::unbounded_channel();
    let result = mgr.open_lobby(RoleSet::new(vec![Role::Wolf, Role::Wolf, Role::Wolf]), tx);
    assert!(matches!(result, Err(SessionError::UnsupportedRoleSet(_))));
    assert_eq!(mgr.session_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_candidates() {
    let mgr = manager();
    assert_eq!(mgr.candidates(4).unwrap().len(), 4);
    assert!(matches!(
        mgr.candidates(12),
        Err(SessionError::Rules(RulesError::UnsupportedRosterSize(12)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_join_fills_lobby_and_starts() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(4, 0), tx).unwrap();

    let status = mgr.join(id, participant(1)).await.unwrap();
    assert_eq!((status.joined, status.needed, status.started), (1, 4, false));
    assert!(matches!(
        mgr.join(id, participant(1)).await,
        Err(SessionError::Rejected(ActionRejected::AlreadyJoined(_)))
    ));

    let info = mgr.info(id).await.unwrap();
    assert_eq!(info.state, SessionState::WaitingForPlayers);
    assert_eq!(info.roster.len(), 1);

    mgr.join(id, participant(2)).await.unwrap();
    mgr.join(id, participant(3)).await.unwrap();
    let status = mgr.join(id, participant(4)).await.unwrap();
    assert!(status.started);

    // The opening night owes nothing, so it resolves straight into day 2.
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::DayStarted { .. })).await;
    assert!(events.iter().any(|e| e.event == GameEvent::NightStarted { day_count: 1 }));
    assert_eq!(
        events.last().map(|e| &e.event),
        Some(&GameEvent::DayStarted { day_count: 2 })
    );
    let info = mgr.info(id).await.unwrap();
    assert_eq!(info.state, SessionState::Day);
    assert_eq!(info.day_count, 2);
    assert_eq!(info.alive.len(), 4);

    assert!(matches!(
        mgr.join(id, participant(5)).await,
        Err(SessionError::InvalidState(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_events_are_numbered_from_one() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(3, 1), tx).unwrap();
    mgr.join(id, participant(1)).await.unwrap();
    mgr.join(id, participant(2)).await.unwrap();

    let first = next(&mut rx).await;
    let second = next(&mut rx).await;
    assert_eq!((first.seq, second.seq), (1, 2));
    assert_eq!(first.session_id, id);
    assert_eq!(first.recipient, Recipient::All);
    assert!(matches!(first.event, GameEvent::PlayerJoined { joined: 1, needed: 3, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_lobby_expires_when_idle() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(5, 0), tx).unwrap();
    mgr.join(id, participant(1)).await.unwrap();

    let start = Instant::now();
    let events = wait_for(&mut rx, |e| *e == GameEvent::LobbyExpired).await;
    assert!(start.elapsed() >= Duration::from_secs(300));
    assert!(events.last().unwrap().event.is_terminal());

    assert!(matches!(
        mgr.join(id, participant(2)).await,
        Err(SessionError::Closed(_))
    ));
    assert_eq!(mgr.reap(), 1);
    assert_eq!(mgr.session_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_lobby_emptied_by_leaving() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(4, 0), tx).unwrap();
    mgr.join(id, participant(1)).await.unwrap();
    mgr.leave(id, pid(1)).await.unwrap();

    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert_eq!(
        events.last().unwrap().event,
        GameEvent::SessionEnded {
            reason: EndReason::LobbyEmptied
        }
    );
}

// =========================================================================
// Explicit lock
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_lock_roster_and_assign_deals_exact_roles() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(4, 0), tx).unwrap();

    let set = RoleSet::new(vec![Role::Villager, Role::Villager, Role::Seer, Role::Wolf]);
    let roster: Vec<Participant> = (1..=4).map(participant).collect();
    mgr.lock_roster_and_assign(id, set, roster).await.unwrap();

    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::DayStarted { .. })).await;
    let roles = roles_from(&events);
    assert_eq!(holders(&roles, Role::Villager).len(), 2);
    assert_eq!(holders(&roles, Role::Seer).len(), 1);
    assert_eq!(holders(&roles, Role::Wolf).len(), 1);

    // The seer's opening reading is private and always harmless.
    let seer = holders(&roles, Role::Seer)[0];
    let reading = events
        .iter()
        .find_map(|e| match (&e.recipient, &e.event) {
            (Recipient::Player(p), GameEvent::NightResolved { seer_fact, deaths })
                if *p == seer =>
            {
                assert!(deaths.is_empty());
                *seer_fact
            }
            _ => None,
        })
        .expect("seer gets the first-night reading");
    assert!(!reading.hostile);
}

#[tokio::test(start_paused = true)]
async fn test_lock_roster_mismatch_aborts() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(4, 0), tx).unwrap();

    let roster: Vec<Participant> = (1..=3).map(participant).collect();
    let result = mgr.lock_roster_and_assign(id, preset(4, 1), roster).await;
    assert!(matches!(
        result,
        Err(SessionError::Rules(RulesError::RosterMismatch { roster: 3, roles: 4 }))
    ));

    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert!(matches!(
        events.last().unwrap().event,
        GameEvent::SessionAborted { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_allies_in_role_assignment() {
    let mut mgr = manager();
    // villager×2, seer, madman, wolf×2
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(6, 1), tx).unwrap();
    for i in 1..=6 {
        mgr.join(id, participant(i)).await.unwrap();
    }
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::NightStarted { .. })).await;
    let roles = roles_from(&events);
    let wolves = holders(&roles, Role::Wolf);

    for envelope in &events {
        let (Recipient::Player(player), GameEvent::RoleAssigned { role, allies }) =
            (&envelope.recipient, &envelope.event)
        else {
            continue;
        };
        match role {
            Role::Wolf => {
                let other: Vec<PlayerId> = wolves.iter().copied().filter(|w| w != player).collect();
                assert_eq!(allies, &other);
            }
            Role::Madman => assert_eq!(allies, &wolves),
            _ => assert!(allies.is_empty()),
        }
    }
}

// =========================================================================
// Phase flow
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_zero_submission_night_times_out() {
    let mut mgr = manager();
    // villager×3, seer, madman, wolf
    let (id, mut rx, roles) = start_game(&mut mgr, preset(6, 0)).await;

    // Nobody skips, so the day runs its full length.
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::VoteStarted { .. })).await;
    assert!(events.iter().any(|e| e.event == GameEvent::PhaseTimedOut { phase: Phase::Day }));

    // Everyone votes out a villager; one wolf against four others plays on.
    let villager = holders(&roles, Role::Villager)[0];
    for voter in roles.keys() {
        mgr.submit_vote(id, *voter, villager).await.unwrap();
    }
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::NightStarted { .. })).await;
    assert!(events.iter().any(|e| matches!(
        e.event,
        GameEvent::VoteResolved { executed, vote_count: 6, tie_broken: false, random_pick: false }
            if executed == villager
    )));

    // Nobody acts tonight: the deadline closes the night with no deaths,
    // and the medium still reads the executed villager.
    let medium = holders(&roles, Role::Medium)[0];
    let start = Instant::now();
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::DayStarted { .. })).await;
    assert!(start.elapsed() >= Duration::from_secs(120));

    let kinds: Vec<&GameEvent> = events.iter().map(|e| &e.event).collect();
    assert_eq!(
        kinds,
        vec![
            &GameEvent::PhaseTimedOut { phase: Phase::Night },
            &GameEvent::NightResolved {
                deaths: vec![],
                seer_fact: None
            },
            &GameEvent::MediumReading {
                fact: MediumFact {
                    medium,
                    target: villager,
                    hostile: false
                }
            },
            &GameEvent::DayStarted { day_count: 3 },
        ]
    );
    assert_eq!(events[2].recipient, Recipient::Player(medium));

    let info = mgr.info(id).await.unwrap();
    assert_eq!(info.state, SessionState::Day);
    assert_eq!(info.day_count, 3);
    assert_eq!(info.alive.len(), 5);
    assert_eq!(info.dead, vec![villager]);
    // The first day and the second night expired; nothing else did.
    assert_eq!(info.timer.fired, 2);
    assert!(info.timer.armed > info.timer.fired);
    assert!(info.deadline_in.is_some());

    // The night is closed; a late attack is refused.
    let wolf = holders(&roles, Role::Wolf)[0];
    let target = holders(&roles, Role::Villager)[1];
    assert!(matches!(
        mgr.submit_night_action(id, wolf, NightAction::Attack(target)).await,
        Err(SessionError::Rejected(ActionRejected::WrongPhase {
            expected: Phase::Night,
            actual: Phase::Day
        }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_silent_roster_still_finishes() {
    let mut mgr = manager();
    // villager×3, wolf; nobody ever acts, skips, or votes
    let (_id, mut rx, _roles) = start_game(&mut mgr, preset(4, 0)).await;

    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert!(matches!(
        events.last().map(|e| &e.event),
        Some(GameEvent::GameEnded { .. })
    ));

    let mut verdicts = 0;
    for (i, envelope) in events.iter().enumerate() {
        match &envelope.event {
            GameEvent::VoteResolved {
                vote_count,
                tie_broken,
                random_pick,
                ..
            } => {
                assert_eq!(*vote_count, 0);
                assert!(*random_pick);
                assert!(!*tie_broken);
                assert_eq!(
                    events[i - 1].event,
                    GameEvent::PhaseTimedOut { phase: Phase::Vote }
                );
                verdicts += 1;
            }
            GameEvent::NightResolved { deaths, .. } => assert!(deaths.is_empty()),
            _ => {}
        }
    }
    // One random execution ends it if it lands on the wolf, two otherwise.
    assert!((1..=2).contains(&verdicts), "{verdicts} verdicts");
}

#[tokio::test(start_paused = true)]
async fn test_unanimous_skip_and_night_quota() {
    let mut mgr = manager();
    let (id, mut rx, roles) = start_game(&mut mgr, preset(6, 0)).await;
    let everyone: Vec<PlayerId> = roles.keys().copied().collect();

    // Day: every living participant skips. Repeats count once.
    assert_eq!(
        mgr.skip_phase(id, everyone[0]).await.unwrap(),
        SkipStatus::Recorded { skipped: 1, needed: 6 }
    );
    assert_eq!(
        mgr.skip_phase(id, everyone[0]).await.unwrap(),
        SkipStatus::Recorded { skipped: 1, needed: 6 }
    );
    for player in &everyone[1..5] {
        mgr.skip_phase(id, *player).await.unwrap();
    }
    assert_eq!(
        mgr.skip_phase(id, everyone[5]).await.unwrap(),
        SkipStatus::Advanced
    );
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::VoteStarted { .. })).await;
    assert!(events.iter().any(|e| e.event == GameEvent::PhaseSkipped { phase: Phase::Day }));
    assert!(!events.iter().any(|e| matches!(e.event, GameEvent::PhaseTimedOut { .. })));
    let info = mgr.info(id).await.unwrap();
    assert_eq!(info.state, SessionState::Vote);
    assert_eq!(info.timer.fired, 0);
    assert!(info.timer.cancelled >= 1);

    let villagers = holders(&roles, Role::Villager);
    for voter in &everyone {
        mgr.submit_vote(id, *voter, villagers[0]).await.unwrap();
    }
    wait_for(&mut rx, |e| matches!(e, GameEvent::NightStarted { .. })).await;

    // Night 2: the wolf and the seer are owed; the second submission closes it.
    let wolf = holders(&roles, Role::Wolf)[0];
    let seer = holders(&roles, Role::Seer)[0];
    let start = Instant::now();
    mgr.submit_night_action(id, wolf, NightAction::Attack(villagers[1]))
        .await
        .unwrap();
    let info = mgr.info(id).await.unwrap();
    assert_eq!(info.state, SessionState::Night);
    assert_eq!(info.pending, vec![seer]);

    mgr.submit_night_action(id, seer, NightAction::Divine(wolf))
        .await
        .unwrap();
    let events = wait_for(&mut rx, |e| matches!(e, GameEvent::DayStarted { .. })).await;
    assert!(start.elapsed() < Duration::from_secs(120));

    let private = events
        .iter()
        .find(|e| e.recipient == Recipient::Player(seer))
        .expect("seer copy");
    match &private.event {
        GameEvent::NightResolved {
            deaths,
            seer_fact: Some(fact),
        } => {
            assert_eq!(deaths, &vec![villagers[1]]);
            assert_eq!(fact.target, wolf);
            assert!(fact.hostile);
        }
        other => panic!("unexpected seer event {other:?}"),
    }
    assert!(events.iter().any(|e| e.recipient == Recipient::AllExcept(seer)
        && e.event
            == GameEvent::NightResolved {
                deaths: vec![villagers[1]],
                seer_fact: None
            }));
}

#[tokio::test(start_paused = true)]
async fn test_dead_participant_cannot_act() {
    let mut mgr = manager();
    let (id, mut rx, roles) = start_game(&mut mgr, preset(6, 0)).await;
    let villager = holders(&roles, Role::Villager)[0];

    wait_for(&mut rx, |e| matches!(e, GameEvent::VoteStarted { .. })).await;
    for voter in roles.keys() {
        mgr.submit_vote(id, *voter, villager).await.unwrap();
    }
    wait_for(&mut rx, |e| matches!(e, GameEvent::NightStarted { .. })).await;

    assert!(matches!(
        mgr.skip_phase(id, villager).await,
        Err(SessionError::Rejected(ActionRejected::ActorDead(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_full_game_reaches_winner() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    // villager×2, seer, knight, wolf
    let id = mgr.open_lobby(preset(5, 4), tx).unwrap();
    for i in 1..=5 {
        mgr.join(id, participant(i)).await.unwrap();
    }

    let mut roles = BTreeMap::new();
    let mut expected_seq = 1;
    let winner = loop {
        let envelope = next(&mut rx).await;
        assert_eq!(envelope.seq, expected_seq);
        expected_seq += 1;

        match envelope.event {
            GameEvent::RoleAssigned { role, .. } => {
                if let Recipient::Player(p) = envelope.recipient {
                    roles.insert(p, role);
                }
            }
            GameEvent::NightStarted { day_count } if day_count > 1 => {
                let alive = mgr.info(id).await.unwrap().alive;
                let living = |role: Role| -> Vec<PlayerId> {
                    alive.iter().copied().filter(|p| roles.get(p) == Some(&role)).collect()
                };
                let wolves = living(Role::Wolf);
                let prey = alive.iter().copied().find(|p| !wolves.contains(p)).unwrap();
                for wolf in &wolves {
                    mgr.submit_night_action(id, *wolf, NightAction::Attack(prey))
                        .await
                        .unwrap();
                }
                for knight in living(Role::Knight) {
                    let ward = alive.iter().copied().find(|p| *p != knight).unwrap();
                    mgr.submit_night_action(id, knight, NightAction::Guard(ward))
                        .await
                        .unwrap();
                }
                for seer in living(Role::Seer) {
                    let target = alive.iter().copied().find(|p| *p != seer).unwrap();
                    mgr.submit_night_action(id, seer, NightAction::Divine(target))
                        .await
                        .unwrap();
                }
            }
            GameEvent::DayStarted { .. } => {
                for player in mgr.info(id).await.unwrap().alive {
                    mgr.skip_phase(id, player).await.unwrap();
                }
            }
            GameEvent::VoteStarted { .. } => {
                let alive = mgr.info(id).await.unwrap().alive;
                for voter in &alive {
                    let target = alive.iter().copied().rev().find(|p| p != voter).unwrap();
                    mgr.submit_vote(id, *voter, target).await.unwrap();
                }
            }
            GameEvent::GameEnded {
                winning_faction,
                winners,
                final_roles,
            } => {
                assert_eq!(final_roles.len(), 5);
                assert!(!winners.is_empty());
                for w in &winners {
                    assert_eq!(roles[w].faction(), winning_faction);
                }
                break winning_faction;
            }
            other => assert!(!other.is_terminal(), "unexpected end: {other:?}"),
        }
    };

    assert!(matches!(winner, Faction::Villagers | Faction::Werewolves));
    assert!(rx.recv().await.is_none(), "stream ends with the game");
    assert_eq!(mgr.reap(), 1);
}

// =========================================================================
// Termination
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_requires_roster_member() {
    let mut mgr = manager();
    let (id, mut rx, _roles) = start_game(&mut mgr, preset(4, 1)).await;

    assert!(matches!(
        mgr.cancel_session(id, pid(99)).await,
        Err(SessionError::Rejected(ActionRejected::NotInRoster(_)))
    ));
    assert_eq!(mgr.session_count(), 1);

    mgr.cancel_session(id, pid(2)).await.unwrap();
    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert_eq!(
        events.last().unwrap().event,
        GameEvent::SessionEnded {
            reason: EndReason::Cancelled { by: pid(2) }
        }
    );
    assert_eq!(mgr.session_count(), 0);
    assert!(matches!(mgr.info(id).await, Err(SessionError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_below_minimum_terminates() {
    let mut mgr = manager();
    // villager, seer, wolf
    let (id, mut rx, _roles) = start_game(&mut mgr, preset(3, 1)).await;

    mgr.leave(id, pid(1)).await.unwrap();
    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert_eq!(
        events.last().unwrap().event,
        GameEvent::SessionEnded {
            reason: EndReason::RosterBelowMinimum {
                present: 2,
                minimum: 3
            }
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_wolf_leaving_hands_villagers_the_win() {
    let mut mgr = manager();
    // villager×3, wolf
    let (id, mut rx, roles) = start_game(&mut mgr, preset(4, 0)).await;
    let wolf = holders(&roles, Role::Wolf)[0];

    mgr.leave(id, wolf).await.unwrap();
    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert!(events.iter().any(|e| e.event == GameEvent::PlayerForfeited { player: wolf }));
    match &events.last().unwrap().event {
        GameEvent::GameEnded {
            winning_faction,
            final_roles,
            ..
        } => {
            assert_eq!(*winning_faction, Faction::Villagers);
            let reveal = final_roles.iter().find(|r| r.player == wolf).unwrap();
            assert!(!reveal.alive);
        }
        other => panic!("unexpected end {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_destroy_resets_session() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(4, 0), tx).unwrap();

    mgr.destroy(id).await.unwrap();
    let events = wait_for(&mut rx, GameEvent::is_terminal).await;
    assert_eq!(
        events.last().unwrap().event,
        GameEvent::SessionEnded {
            reason: EndReason::Reset
        }
    );
    assert!(matches!(mgr.destroy(id).await, Err(SessionError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_sessions_are_independent() {
    let mut mgr = manager();
    let (tx_a, _rx_a) = mpsc::unbounded_channel();
    let (tx_b, _rx_b) = mpsc::unbounded_channel();
    let a = mgr.open_lobby(preset(3, 0), tx_a).unwrap();
    let b = mgr.open_lobby(preset(3, 0), tx_b).unwrap();
    assert_ne!(a, b);

    mgr.join(a, participant(1)).await.unwrap();
    mgr.join(b, participant(1)).await.unwrap();
    mgr.cancel_session(a, pid(1)).await.unwrap();

    let info = mgr.info(b).await.unwrap();
    assert_eq!(info.state, SessionState::WaitingForPlayers);
    assert_eq!(info.roster.len(), 1);
    assert_eq!(mgr.session_ids(), vec![b]);
}

#[tokio::test(start_paused = true)]
async fn test_events_serialize_for_delivery() {
    let mut mgr = manager();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = mgr.open_lobby(preset(3, 0), tx).unwrap();
    mgr.join(id, participant(1)).await.unwrap();

    let envelope = next(&mut rx).await;
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["event"]["type"], "player_joined");
    assert_eq!(json["event"]["participant"]["handle"], "player-1");
}
