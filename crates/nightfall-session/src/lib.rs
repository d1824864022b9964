//! Session lifecycle management for Nightfall.
//!
//! Each session runs as an isolated Tokio task (actor model) that owns its
//! lobby, then its locked game, and drives the Night → Day → Vote cycle
//! until a faction wins or the session is torn down.
//!
//! # Key types
//!
//! - [`SessionManager`]: opens, tracks and routes calls to sessions
//! - [`SessionHandle`]: send commands to a running session actor
//! - [`SessionState`]: lifecycle state machine
//! - [`SessionConfig`]: phase timeouts, minimum roster, RNG seed

mod config;
mod error;
mod manager;
mod scheduler;

pub use config::{SessionConfig, SessionState};
pub use error::SessionError;
pub use manager::SessionManager;
pub use nightfall_clock::TimerMetrics;
pub use scheduler::{EventSender, JoinStatus, SessionHandle, SessionInfo, SkipStatus};
