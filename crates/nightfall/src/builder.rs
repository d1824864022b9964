//! `NightfallBuilder`: assembles a [`SessionManager`].

use std::time::Duration;

use nightfall_rules::Catalogue;
use nightfall_session::{SessionConfig, SessionManager};

use crate::NightfallError;

/// Builder for a configured [`SessionManager`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use nightfall::NightfallBuilder;
///
/// let manager = NightfallBuilder::new()
///     .night_timeout(Duration::from_secs(90))
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(manager.config().night_timeout, Duration::from_secs(90));
/// ```
#[derive(Debug, Clone)]
pub struct NightfallBuilder {
    catalogue: Catalogue,
    config: SessionConfig,
}

impl NightfallBuilder {
    /// Starts from the standard catalogue and the default timeouts.
    pub fn new() -> Self {
        Self {
            catalogue: Catalogue::standard(),
            config: SessionConfig::default(),
        }
    }

    /// Replaces the role-set catalogue.
    pub fn catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn night_timeout(mut self, timeout: Duration) -> Self {
        self.config.night_timeout = timeout;
        self
    }

    pub fn day_duration(mut self, duration: Duration) -> Self {
        self.config.day_duration = duration;
        self
    }

    pub fn vote_timeout(mut self, timeout: Duration) -> Self {
        self.config.vote_timeout = timeout;
        self
    }

    pub fn lobby_timeout(mut self, timeout: Duration) -> Self {
        self.config.lobby_timeout = timeout;
        self
    }

    /// Fewest participants still present for a game to keep running.
    pub fn min_players(mut self, min_players: usize) -> Self {
        self.config.min_players = min_players;
        self
    }

    /// Seeds every session's RNG, making deals and tie-breaks replayable.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validates the catalogue and builds the manager.
    ///
    /// # Errors
    /// [`NightfallError::Rules`] if a catalogue entry is malformed.
    pub fn build(self) -> Result<SessionManager, NightfallError> {
        self.catalogue.validate()?;
        tracing::info!(
            min_players = self.catalogue.min_players(),
            max_players = self.catalogue.max_players(),
            seeded = self.config.seed.is_some(),
            "session manager ready"
        );
        Ok(SessionManager::new(self.catalogue, self.config))
    }
}

impl Default for NightfallBuilder {
    fn default() -> Self {
        Self::new()
    }
}
