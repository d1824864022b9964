//! Plays one full game with bots and prints every envelope as JSON.
//!
//! Usage: `village [PLAYERS] [SEED]` (defaults: 7 players, random seed).

use std::collections::BTreeMap;

use nightfall::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

/// Every bot sees every private event, which a real delivery layer would
/// never allow. Good enough to drive a game.
struct Village {
    manager: SessionManager,
    session: SessionId,
    roles: BTreeMap<PlayerId, Role>,
    rng: StdRng,
}

impl Village {
    async fn alive(&self) -> Result<Vec<PlayerId>, NightfallError> {
        Ok(self.manager.info(self.session).await?.alive)
    }

    fn pick(&mut self, from: &[PlayerId], not: impl Fn(&PlayerId) -> bool) -> Option<PlayerId> {
        let choices: Vec<PlayerId> = from.iter().copied().filter(|p| !not(p)).collect();
        choices.choose(&mut self.rng).copied()
    }

    async fn play_night(&mut self) -> Result<(), NightfallError> {
        let alive = self.alive().await?;
        let roles = self.roles.clone();
        let wolf = |p: &PlayerId| roles.get(p) == Some(&Role::Wolf);

        let prey = self.pick(&alive, wolf);
        for actor in &alive {
            let action = match roles.get(actor) {
                Some(Role::Wolf) => prey.map(NightAction::Attack),
                Some(Role::Seer) => self.pick(&alive, |p| p == actor).map(NightAction::Divine),
                Some(Role::Knight) => self.pick(&alive, |p| p == actor).map(NightAction::Guard),
                _ => None,
            };
            if let Some(action) = action {
                self.submit_night_action(*actor, action).await?;
            }
        }
        Ok(())
    }

    /// An earlier submission may already have closed the night.
    async fn submit_night_action(
        &self,
        actor: PlayerId,
        action: NightAction,
    ) -> Result<(), NightfallError> {
        match self
            .manager
            .submit_night_action(self.session, actor, action)
            .await
        {
            Err(SessionError::Rejected(rejected)) => {
                tracing::debug!(%actor, %rejected, "bot action refused");
                Ok(())
            }
            other => Ok(other?),
        }
    }

    async fn play_day(&mut self) -> Result<(), NightfallError> {
        for player in self.alive().await? {
            self.manager.skip_phase(self.session, player).await?;
        }
        Ok(())
    }

    async fn play_vote(&mut self) -> Result<(), NightfallError> {
        let alive = self.alive().await?;
        for voter in &alive {
            if let Some(target) = self.pick(&alive, |p| p == voter) {
                self.manager.submit_vote(self.session, *voter, target).await?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    nightfall::telemetry::init();

    let mut args = std::env::args().skip(1);
    let players: usize = args.next().map(|a| a.parse::<usize>()).transpose()?.unwrap_or(7);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => rand::random(),
    };
    eprintln!("village: {players} players, seed {seed}");

    let mut manager = NightfallBuilder::new().seed(seed).build()?;
    let (events, mut stream) = mpsc::unbounded_channel();

    let mut rng = StdRng::seed_from_u64(seed);
    let role_set = manager
        .candidates(players)?
        .choose(&mut rng)
        .cloned()
        .ok_or("no role set for that roster size")?;
    let session = manager.open_lobby(role_set, events)?;

    for id in 1..=players as u64 {
        manager
            .join(session, Participant::new(PlayerId(id), format!("bot-{id}")))
            .await?;
    }

    let mut village = Village {
        manager,
        session,
        roles: BTreeMap::new(),
        rng,
    };
    let codec = JsonCodec;

    while let Some(envelope) = stream.recv().await {
        println!("{}", String::from_utf8_lossy(&codec.encode(&envelope)?));

        match (&envelope.recipient, &envelope.event) {
            (Recipient::Player(player), GameEvent::RoleAssigned { role, .. }) => {
                village.roles.insert(*player, *role);
            }
            (_, GameEvent::NightStarted { day_count }) if *day_count > 1 => {
                village.play_night().await?;
            }
            (_, GameEvent::DayStarted { .. }) => village.play_day().await?,
            (_, GameEvent::VoteStarted { .. }) => village.play_vote().await?,
            _ => {}
        }
    }

    Ok(())
}
