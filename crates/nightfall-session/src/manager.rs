//! Session manager: creates, tracks, and routes calls to sessions.

use std::collections::HashMap;
use std::sync::Arc;

use nightfall_protocol::{Participant, PlayerId, SessionId};
use nightfall_rules::{Catalogue, NightAction, RoleSet};

use crate::scheduler::spawn_session;
use crate::{
    EventSender, JoinStatus, SessionConfig, SessionError, SessionHandle, SessionInfo, SkipStatus,
};

/// Owns every live session and the catalogue they draw role sets from.
///
/// This is the entry point for the delivery layer. Sessions are fully
/// independent: each runs in its own actor, and the manager only holds
/// handles to them.
pub struct SessionManager {
    catalogue: Arc<Catalogue>,
    config: SessionConfig,
    /// Active sessions, keyed by session ID.
    sessions: HashMap<SessionId, SessionHandle>,
    next_id: u64,
}

impl SessionManager {
    /// Creates an empty manager. `config` is clamped with
    /// [`SessionConfig::validated`].
    pub fn new(catalogue: Catalogue, config: SessionConfig) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
            config: config.validated(),
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Candidate role sets for a roster of `roster_size`.
    pub fn candidates(&self, roster_size: usize) -> Result<Vec<RoleSet>, SessionError> {
        Ok(self.catalogue.candidates(roster_size)?.to_vec())
    }

    /// Opens a lobby for `role_set` and returns its ID.
    ///
    /// The lobby starts the game by itself once the roster reaches the
    /// role set's length. Every event of the session goes to `events`.
    pub fn open_lobby(
        &mut self,
        role_set: RoleSet,
        events: EventSender,
    ) -> Result<SessionId, SessionError> {
        if !self.catalogue.contains(&role_set) {
            return Err(SessionError::UnsupportedRoleSet(role_set));
        }

        let session_id = SessionId(self.next_id);
        self.next_id += 1;
        tracing::info!(%session_id, roles = %role_set, "session created");

        let handle = spawn_session(
            session_id,
            self.config.clone(),
            Arc::clone(&self.catalogue),
            role_set,
            events,
        );
        self.sessions.insert(session_id, handle);
        Ok(session_id)
    }

    /// Returns a clone of a session's handle.
    ///
    /// Useful when callers need to talk to a session without holding the
    /// manager.
    pub fn handle(&self, session_id: SessionId) -> Result<SessionHandle, SessionError> {
        self.get(session_id).cloned()
    }

    pub async fn join(
        &self,
        session_id: SessionId,
        participant: Participant,
    ) -> Result<JoinStatus, SessionError> {
        self.get(session_id)?.join(participant).await
    }

    /// Removes a participant. After the lock this is a forfeit.
    pub async fn leave(&self, session_id: SessionId, player: PlayerId) -> Result<(), SessionError> {
        self.get(session_id)?.leave(player).await
    }

    /// Locks `roster` with `role_set` directly, ignoring whoever joined the
    /// lobby so far.
    pub async fn lock_roster_and_assign(
        &self,
        session_id: SessionId,
        role_set: RoleSet,
        roster: Vec<Participant>,
    ) -> Result<(), SessionError> {
        self.get(session_id)?
            .lock_roster_and_assign(role_set, roster)
            .await
    }

    pub async fn submit_night_action(
        &self,
        session_id: SessionId,
        actor: PlayerId,
        action: NightAction,
    ) -> Result<(), SessionError> {
        self.get(session_id)?
            .submit_night_action(actor, action)
            .await
    }

    pub async fn submit_vote(
        &self,
        session_id: SessionId,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<(), SessionError> {
        self.get(session_id)?.submit_vote(voter, target).await
    }

    pub async fn skip_phase(
        &self,
        session_id: SessionId,
        actor: PlayerId,
    ) -> Result<SkipStatus, SessionError> {
        self.get(session_id)?.skip(actor).await
    }

    /// Cancels a session on behalf of a roster member and forgets it.
    pub async fn cancel_session(
        &mut self,
        session_id: SessionId,
        actor: PlayerId,
    ) -> Result<(), SessionError> {
        self.get(session_id)?.cancel(actor).await?;
        self.sessions.remove(&session_id);
        Ok(())
    }

    pub async fn info(&self, session_id: SessionId) -> Result<SessionInfo, SessionError> {
        self.get(session_id)?.info().await
    }

    /// Force-terminates a session without a roster check and forgets it.
    pub async fn destroy(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        // An actor that already stopped has nothing left to reset.
        let _ = handle.reset().await;

        tracing::info!(%session_id, "session destroyed");
        Ok(())
    }

    /// Forgets sessions whose actor has stopped. Returns how many.
    pub fn reap(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, handle| !handle.is_closed());
        let reaped = before - self.sessions.len();
        if reaped > 0 {
            tracing::debug!(reaped, "finished sessions reaped");
        }
        reaped
    }

    /// Number of tracked sessions, including finished ones not yet reaped.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }

    fn get(&self, session_id: SessionId) -> Result<&SessionHandle, SessionError> {
        self.sessions
            .get(&session_id)
            .ok_or(SessionError::NotFound(session_id))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Catalogue::standard(), SessionConfig::default())
    }
}
