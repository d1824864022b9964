//! Session actor: an isolated Tokio task that drives one game.
//!
//! Each session runs in its own task and owns its lobby or [`Session`]
//! outright. Submissions arrive through an mpsc channel and phase
//! deadlines come from a [`PhaseTimer`]; the actor races the two with
//! `tokio::select!`, so a phase closes on whichever happens first: the
//! last owed submission, a unanimous skip, or the deadline.
//!
//! Every command is handled to completion (including any resolution it
//! triggers) before the next one is read, so a phase is always resolved
//! from the submissions that arrived before it closed.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use nightfall_clock::{Deadline, PhaseTimer, TimerMetrics};
use nightfall_protocol::{
    EndReason, Envelope, Faction, GameEvent, Participant, Phase, PlayerId, Recipient, Role,
    SessionId,
};
use nightfall_rules::{
    ActionRejected, Catalogue, Lobby, NightAction, NightOutcome, RoleSet, RulesError, Session,
    VoteOutcome, assign_roles, resolve_night, resolve_vote, winners,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::{SessionConfig, SessionError, SessionState};

/// Channel the delivery layer reads a session's events from.
pub type EventSender = mpsc::UnboundedSender<Envelope>;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    Join {
        participant: Participant,
        reply: Reply<JoinStatus>,
    },
    Leave {
        player: PlayerId,
        reply: Reply<()>,
    },
    Assign {
        role_set: RoleSet,
        roster: Vec<Participant>,
        reply: Reply<()>,
    },
    NightAction {
        actor: PlayerId,
        action: NightAction,
        reply: Reply<()>,
    },
    Vote {
        voter: PlayerId,
        target: PlayerId,
        reply: Reply<()>,
    },
    Skip {
        actor: PlayerId,
        reply: Reply<SkipStatus>,
    },
    Cancel {
        actor: PlayerId,
        reply: Reply<()>,
    },
    Info {
        reply: oneshot::Sender<SessionInfo>,
    },
    /// Force-terminate without a roster check.
    Reset,
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStatus {
    /// Roster size after the join.
    pub joined: usize,
    /// Roster size the role set needs.
    pub needed: usize,
    /// This join filled the lobby and the game started.
    pub started: bool,
}

/// Result of a successful skip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipStatus {
    /// Counted; the phase stays open until every living participant skips.
    Recorded { skipped: usize, needed: usize },
    /// That was the last one: the phase closed.
    Advanced,
}

/// A snapshot of session metadata.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub state: SessionState,
    /// 0 while the lobby is open.
    pub day_count: u32,
    pub roster: Vec<Participant>,
    /// Roster size the role set needs.
    pub needed: usize,
    pub alive: Vec<PlayerId>,
    pub dead: Vec<PlayerId>,
    /// Who the current phase is still waiting on (night actors or voters).
    pub pending: Vec<PlayerId>,
    /// Time left before the current deadline fires.
    pub deadline_in: Option<Duration>,
    /// Deadline counters since the session opened.
    pub timer: TimerMetrics,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running session actor.
///
/// Cheap to clone; the `SessionManager` holds one per session.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub async fn join(&self, participant: Participant) -> Result<JoinStatus, SessionError> {
        self.request(|reply| SessionCommand::Join { participant, reply })
            .await
    }

    pub async fn leave(&self, player: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Leave { player, reply })
            .await
    }

    pub async fn lock_roster_and_assign(
        &self,
        role_set: RoleSet,
        roster: Vec<Participant>,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Assign {
            role_set,
            roster,
            reply,
        })
        .await
    }

    pub async fn submit_night_action(
        &self,
        actor: PlayerId,
        action: NightAction,
    ) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::NightAction {
            actor,
            action,
            reply,
        })
        .await
    }

    pub async fn submit_vote(&self, voter: PlayerId, target: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Vote {
            voter,
            target,
            reply,
        })
        .await
    }

    pub async fn skip(&self, actor: PlayerId) -> Result<SkipStatus, SessionError> {
        self.request(|reply| SessionCommand::Skip { actor, reply })
            .await
    }

    pub async fn cancel(&self, actor: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Cancel { actor, reply })
            .await
    }

    pub async fn info(&self) -> Result<SessionInfo, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Closed(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Closed(self.session_id))
    }

    /// Tells the session to terminate (fire-and-forget).
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Reset)
            .await
            .map_err(|_| SessionError::Closed(self.session_id))
    }

    /// Sends a command carrying a reply channel and waits for the answer.
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Closed(self.session_id))?
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Numbers and addresses outgoing events.
struct Outbox {
    session_id: SessionId,
    seq: u64,
    sender: EventSender,
}

impl Outbox {
    /// Silently drops the event if the delivery layer stopped listening.
    fn send(&mut self, recipient: Recipient, event: GameEvent) {
        self.seq += 1;
        let _ = self.sender.send(Envelope {
            session_id: self.session_id,
            seq: self.seq,
            recipient,
            event,
        });
    }

    fn night_resolved(&mut self, outcome: NightOutcome) {
        match outcome.seer_fact {
            Some(fact) => {
                self.send(
                    Recipient::Player(fact.seer),
                    GameEvent::NightResolved {
                        deaths: outcome.deaths.clone(),
                        seer_fact: Some(fact),
                    },
                );
                self.send(
                    Recipient::AllExcept(fact.seer),
                    GameEvent::NightResolved {
                        deaths: outcome.deaths,
                        seer_fact: None,
                    },
                );
            }
            None => self.send(
                Recipient::All,
                GameEvent::NightResolved {
                    deaths: outcome.deaths,
                    seer_fact: None,
                },
            ),
        }
        if let Some(fact) = outcome.medium_fact {
            self.send(
                Recipient::Player(fact.medium),
                GameEvent::MediumReading { fact },
            );
        }
    }

    fn vote_resolved(&mut self, outcome: VoteOutcome) {
        self.send(
            Recipient::All,
            GameEvent::VoteResolved {
                executed: outcome.executed,
                vote_count: outcome.vote_count,
                tie_broken: outcome.tie_broken,
                random_pick: outcome.random_pick,
            },
        );
    }
}

/// A locked game plus the bookkeeping the rules don't need.
struct Game {
    session: Session,
    /// Roster members who left after the lock.
    departed: BTreeSet<PlayerId>,
    /// Skip requests for the current phase.
    skips: BTreeSet<PlayerId>,
}

impl Game {
    fn new(session: Session) -> Self {
        Self {
            session,
            departed: BTreeSet::new(),
            skips: BTreeSet::new(),
        }
    }

    /// Roster members still present.
    fn present(&self) -> usize {
        self.session.roster().len() - self.departed.len()
    }

    /// Skips from participants who are still alive.
    fn skipped(&self) -> usize {
        self.skips
            .iter()
            .filter(|p| self.session.is_alive(**p))
            .count()
    }

    fn unanimous_skip(&self) -> bool {
        let alive = self.session.alive();
        !alive.is_empty() && alive.iter().all(|p| self.skips.contains(p))
    }

    /// Whether every owed input for the current phase is in.
    fn inputs_complete(&self) -> bool {
        match self.session.phase() {
            Phase::Night => self.session.night_complete(),
            Phase::Day => false,
            Phase::Vote => self.session.votes_complete(),
        }
    }

    fn pending(&self) -> Vec<PlayerId> {
        match self.session.phase() {
            Phase::Night => self.session.pending_night_actors(),
            Phase::Day => Vec::new(),
            Phase::Vote => self.session.pending_voters(),
        }
    }
}

enum Stage {
    Lobby(Lobby),
    Playing(Game),
    Ended,
}

/// The internal session actor state. Runs inside a Tokio task.
struct SessionActor {
    session_id: SessionId,
    config: SessionConfig,
    catalogue: Arc<Catalogue>,
    stage: Stage,
    /// Last announced lifecycle state; only moves along
    /// [`SessionState::can_transition_to`].
    lifecycle: SessionState,
    rng: StdRng,
    timer: PhaseTimer,
    outbox: Outbox,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    /// Runs the actor loop until the session terminates or every handle
    /// is dropped.
    async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "session actor started");
        self.timer.arm(self.config.lobby_timeout);

        while !matches!(self.stage, Stage::Ended) {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        tracing::debug!(session_id = %self.session_id, "all handles dropped");
                        break;
                    }
                },
                deadline = self.timer.wait_for_deadline() => self.handle_deadline(deadline),
            }
        }

        tracing::info!(session_id = %self.session_id, "session actor stopped");
    }

    fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Join { participant, reply } => {
                let result = self.handle_join(participant);
                let _ = reply.send(result);
            }
            SessionCommand::Leave { player, reply } => {
                let result = self.handle_leave(player);
                let _ = reply.send(result);
            }
            SessionCommand::Assign {
                role_set,
                roster,
                reply,
            } => {
                let result = self.handle_assign(role_set, roster);
                let _ = reply.send(result);
            }
            SessionCommand::NightAction {
                actor,
                action,
                reply,
            } => {
                let result = self.handle_night_action(actor, action);
                let _ = reply.send(result);
            }
            SessionCommand::Vote {
                voter,
                target,
                reply,
            } => {
                let result = self.handle_vote(voter, target);
                let _ = reply.send(result);
            }
            SessionCommand::Skip { actor, reply } => {
                let result = self.handle_skip(actor);
                let _ = reply.send(result);
            }
            SessionCommand::Cancel { actor, reply } => {
                let result = self.handle_cancel(actor);
                let _ = reply.send(result);
            }
            SessionCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            SessionCommand::Reset => {
                tracing::info!(session_id = %self.session_id, "session reset");
                self.terminate(EndReason::Reset);
            }
        }
    }

    // -- Lobby --

    fn handle_join(&mut self, participant: Participant) -> Result<JoinStatus, SessionError> {
        let state = self.state();
        let Stage::Lobby(lobby) = &mut self.stage else {
            return Err(SessionError::InvalidState(format!(
                "cannot join session in state {state}"
            )));
        };

        let player_id = participant.id;
        let joined = lobby.join(participant.clone())?;
        let needed = lobby.needed();
        let full = lobby.is_full();
        tracing::info!(
            session_id = %self.session_id,
            %player_id,
            joined,
            needed,
            "player joined"
        );
        self.outbox.send(
            Recipient::All,
            GameEvent::PlayerJoined {
                participant,
                joined,
                needed,
            },
        );

        if full {
            self.lock_lobby()?;
        } else {
            self.timer.arm(self.config.lobby_timeout);
        }

        Ok(JoinStatus {
            joined,
            needed,
            started: full,
        })
    }

    /// Locks the lobby's own roster and role set.
    fn lock_lobby(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.stage, Stage::Ended) {
            Stage::Lobby(lobby) => match lobby.lock(&mut self.rng) {
                Ok(session) => {
                    self.start(session);
                    Ok(())
                }
                Err(err) => {
                    self.abort(&err);
                    Err(err.into())
                }
            },
            other => {
                self.stage = other;
                Err(SessionError::InvalidState(format!(
                    "cannot lock session in state {}",
                    self.state()
                )))
            }
        }
    }

    /// Locks an explicit roster with an explicit role set, bypassing the
    /// lobby's own.
    fn handle_assign(
        &mut self,
        role_set: RoleSet,
        roster: Vec<Participant>,
    ) -> Result<(), SessionError> {
        if !self.state().is_joinable() {
            return Err(SessionError::InvalidState(format!(
                "cannot assign roles in state {}",
                self.state()
            )));
        }
        if !self.catalogue.contains(&role_set) {
            return Err(SessionError::UnsupportedRoleSet(role_set));
        }

        match assign_roles(roster, &role_set, &mut self.rng) {
            Ok(session) => {
                self.start(session);
                Ok(())
            }
            Err(err) => {
                self.abort(&err);
                Err(err.into())
            }
        }
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<(), SessionError> {
        let state = self.state();
        match &mut self.stage {
            Stage::Lobby(lobby) => {
                let joined = lobby.leave(player)?;
                let needed = lobby.needed();
                tracing::info!(
                    session_id = %self.session_id,
                    player_id = %player,
                    joined,
                    "player left"
                );
                self.outbox.send(
                    Recipient::All,
                    GameEvent::PlayerLeft {
                        player,
                        joined,
                        needed,
                    },
                );
                if joined == 0 {
                    self.terminate(EndReason::LobbyEmptied);
                } else {
                    self.timer.arm(self.config.lobby_timeout);
                }
                Ok(())
            }
            Stage::Playing(game) => {
                if !game.session.in_roster(player) || game.departed.contains(&player) {
                    return Err(ActionRejected::NotInRoster(player).into());
                }
                game.departed.insert(player);
                let was_alive = game.session.forfeit(player)?;
                let present = game.present();
                tracing::info!(
                    session_id = %self.session_id,
                    player_id = %player,
                    present,
                    "player left a running game"
                );
                if was_alive {
                    self.outbox
                        .send(Recipient::All, GameEvent::PlayerForfeited { player });
                }

                let minimum = self.config.min_players;
                if present < minimum {
                    self.terminate(EndReason::RosterBelowMinimum { present, minimum });
                } else {
                    self.check_winner_or_settle();
                }
                Ok(())
            }
            Stage::Ended => Err(SessionError::InvalidState(format!(
                "cannot leave session in state {state}"
            ))),
        }
    }

    // -- Submissions --

    fn game_mut(&mut self) -> Result<&mut Game, SessionError> {
        let state = self.state();
        match &mut self.stage {
            Stage::Playing(game) => Ok(game),
            _ => Err(SessionError::InvalidState(format!(
                "no game running (state {state})"
            ))),
        }
    }

    fn handle_night_action(
        &mut self,
        actor: PlayerId,
        action: NightAction,
    ) -> Result<(), SessionError> {
        let game = self.game_mut()?;
        if let Err(err) = game.session.submit_night_action(actor, action) {
            tracing::debug!(session_id = %self.session_id, %actor, %err, "night action rejected");
            return Err(err.into());
        }
        self.settle();
        Ok(())
    }

    fn handle_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), SessionError> {
        let game = self.game_mut()?;
        if let Err(err) = game.session.submit_vote(voter, target) {
            tracing::debug!(session_id = %self.session_id, %voter, %err, "vote rejected");
            return Err(err.into());
        }
        self.settle();
        Ok(())
    }

    fn handle_skip(&mut self, actor: PlayerId) -> Result<SkipStatus, SessionError> {
        let game = self.game_mut()?;
        let phase = game.session.phase();
        game.session.check_actor(actor, phase)?;
        game.skips.insert(actor);

        let skipped = game.skipped();
        let needed = game.session.alive().len();
        tracing::debug!(
            session_id = %self.session_id,
            %actor,
            phase = %phase,
            skipped,
            needed,
            "skip recorded"
        );
        if skipped < needed {
            return Ok(SkipStatus::Recorded { skipped, needed });
        }

        self.settle();
        Ok(SkipStatus::Advanced)
    }

    fn handle_cancel(&mut self, actor: PlayerId) -> Result<(), SessionError> {
        let member = match &self.stage {
            Stage::Lobby(lobby) => lobby.contains(actor),
            Stage::Playing(game) => {
                game.session.in_roster(actor) && !game.departed.contains(&actor)
            }
            Stage::Ended => false,
        };
        if !member {
            return Err(ActionRejected::NotInRoster(actor).into());
        }
        self.terminate(EndReason::Cancelled { by: actor });
        Ok(())
    }

    // -- Phase machine --

    fn start(&mut self, session: Session) {
        tracing::info!(
            session_id = %self.session_id,
            players = session.roster().len(),
            roles = %session.role_set(),
            "game started"
        );

        let wolves = session.holders_of(Role::Wolf);
        for (player, role) in session.role_map() {
            let allies = match role {
                Role::Wolf => wolves.iter().copied().filter(|w| w != player).collect(),
                Role::Madman => wolves.clone(),
                _ => Vec::new(),
            };
            self.outbox.send(
                Recipient::Player(*player),
                GameEvent::RoleAssigned {
                    role: *role,
                    allies,
                },
            );
        }

        self.stage = Stage::Playing(Game::new(session));
        self.open_phase();
        self.settle();
    }

    /// Announces the phase the session is now in and arms its deadline.
    fn open_phase(&mut self) {
        let Stage::Playing(game) = &mut self.stage else {
            return;
        };
        game.skips.clear();
        let phase = game.session.phase();
        let day_count = game.session.day_count();

        let event = match phase {
            Phase::Night => GameEvent::NightStarted { day_count },
            Phase::Day => GameEvent::DayStarted { day_count },
            Phase::Vote => GameEvent::VoteStarted { day_count },
        };
        self.outbox.send(Recipient::All, event);
        self.transition_to(phase.into());
        let generation = self.timer.arm(self.config.timeout_for(phase));
        tracing::info!(
            session_id = %self.session_id,
            phase = %phase,
            day_count,
            generation,
            "phase opened"
        );
    }

    /// Closes phases for as long as their inputs are already complete or
    /// every living participant has asked to skip.
    fn settle(&mut self) {
        loop {
            let Stage::Playing(game) = &self.stage else {
                return;
            };
            if game.inputs_complete() {
                self.close_phase();
                continue;
            }
            if game.unanimous_skip() {
                let phase = game.session.phase();
                tracing::info!(session_id = %self.session_id, phase = %phase, "phase skipped");
                self.outbox
                    .send(Recipient::All, GameEvent::PhaseSkipped { phase });
                self.close_phase();
                continue;
            }
            return;
        }
    }

    /// Runs the current phase's resolver, then either ends the game or
    /// opens the next phase. A rules error aborts the session.
    fn close_phase(&mut self) {
        self.timer.disarm();
        let Stage::Playing(game) = &mut self.stage else {
            return;
        };
        let session = &mut game.session;

        let resolved = match session.phase() {
            Phase::Night => resolve_night(session, &mut self.rng)
                .map(|outcome| self.outbox.night_resolved(outcome)),
            Phase::Day => session.begin_vote(),
            Phase::Vote => resolve_vote(session, &mut self.rng)
                .map(|outcome| self.outbox.vote_resolved(outcome)),
        };

        match resolved {
            Ok(()) => self.check_winner_or_open(),
            Err(err) => self.abort(&err),
        }
    }

    fn check_winner_or_open(&mut self) {
        let Stage::Playing(game) = &self.stage else {
            return;
        };
        match game.session.winner() {
            Some(faction) => self.end_game(faction),
            None => self.open_phase(),
        }
    }

    /// After a departure: the game may be decided, or the leaver may have
    /// been the last input the phase was waiting on.
    fn check_winner_or_settle(&mut self) {
        let Stage::Playing(game) = &self.stage else {
            return;
        };
        match game.session.winner() {
            Some(faction) => self.end_game(faction),
            None => self.settle(),
        }
    }

    fn handle_deadline(&mut self, deadline: Deadline) {
        match &self.stage {
            Stage::Lobby(lobby) => {
                tracing::info!(
                    session_id = %self.session_id,
                    joined = lobby.roster().len(),
                    needed = lobby.needed(),
                    generation = deadline.generation,
                    "lobby expired"
                );
                self.outbox.send(Recipient::All, GameEvent::LobbyExpired);
                self.transition_to(SessionState::Terminated);
                self.stage = Stage::Ended;
            }
            Stage::Playing(game) => {
                let phase = game.session.phase();
                tracing::info!(
                    session_id = %self.session_id,
                    phase = %phase,
                    waited_secs = deadline.duration.as_secs(),
                    generation = deadline.generation,
                    fired = self.timer.metrics().fired,
                    "phase timed out"
                );
                self.outbox
                    .send(Recipient::All, GameEvent::PhaseTimedOut { phase });
                self.close_phase();
                self.settle();
            }
            Stage::Ended => {}
        }
    }

    // -- Termination --

    fn end_game(&mut self, faction: Faction) {
        self.timer.disarm();
        let Stage::Playing(game) = &self.stage else {
            return;
        };
        let credited = winners(faction, game.session.role_map());
        let final_roles = game.session.final_roles();
        tracing::info!(
            session_id = %self.session_id,
            winning_faction = %faction,
            day_count = game.session.day_count(),
            "game ended"
        );
        self.outbox.send(
            Recipient::All,
            GameEvent::GameEnded {
                winning_faction: faction,
                winners: credited,
                final_roles,
            },
        );
        self.transition_to(SessionState::Terminated);
        self.stage = Stage::Ended;
    }

    fn terminate(&mut self, reason: EndReason) {
        tracing::info!(session_id = %self.session_id, ?reason, "session ended");
        self.timer.disarm();
        self.outbox
            .send(Recipient::All, GameEvent::SessionEnded { reason });
        self.transition_to(SessionState::Terminated);
        self.stage = Stage::Ended;
    }

    fn abort(&mut self, err: &RulesError) {
        tracing::warn!(session_id = %self.session_id, %err, "session aborted");
        self.timer.disarm();
        self.outbox.send(
            Recipient::All,
            GameEvent::SessionAborted {
                reason: err.to_string(),
            },
        );
        self.transition_to(SessionState::Terminated);
        self.stage = Stage::Ended;
    }

    // -- Queries --

    fn state(&self) -> SessionState {
        self.lifecycle
    }

    /// Records a lifecycle move. Debug builds panic on a move the
    /// transition table forbids; release builds log it and carry on.
    fn transition_to(&mut self, target: SessionState) {
        let from = self.lifecycle;
        if !from.can_transition_to(target) {
            tracing::error!(
                session_id = %self.session_id,
                %from,
                %target,
                "illegal session state transition"
            );
            debug_assert!(false, "illegal session state transition {from} -> {target}");
        }
        self.lifecycle = target;
    }

    fn info(&self) -> SessionInfo {
        let mut info = SessionInfo {
            session_id: self.session_id,
            state: self.state(),
            day_count: 0,
            roster: Vec::new(),
            needed: 0,
            alive: Vec::new(),
            dead: Vec::new(),
            pending: Vec::new(),
            deadline_in: self.timer.remaining(),
            timer: self.timer.metrics().clone(),
        };
        match &self.stage {
            Stage::Lobby(lobby) => {
                info.roster = lobby.roster().to_vec();
                info.needed = lobby.needed();
            }
            Stage::Playing(game) => {
                let session = &game.session;
                info.day_count = session.day_count();
                info.roster = session.roster().to_vec();
                info.needed = session.role_set().len();
                info.alive = session.alive().iter().copied().collect();
                info.dead = session.dead().iter().copied().collect();
                info.pending = game.pending();
            }
            Stage::Ended => {}
        }
        info
    }
}

/// Spawns a session actor with an open lobby for `role_set` and returns a
/// handle to it.
///
/// `config.channel_size` bounds the command channel, so senders wait when
/// the actor falls behind.
pub(crate) fn spawn_session(
    session_id: SessionId,
    config: SessionConfig,
    catalogue: Arc<Catalogue>,
    role_set: RoleSet,
    events: EventSender,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let actor = SessionActor {
        session_id,
        config,
        catalogue,
        stage: Stage::Lobby(Lobby::new(role_set)),
        lifecycle: SessionState::WaitingForPlayers,
        rng,
        timer: PhaseTimer::new(),
        outbox: Outbox {
            session_id,
            seq: 0,
            sender: events,
        },
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
