//! Game rules for Nightfall.
//!
//! Everything here is synchronous and owns no concurrency primitives. The
//! session layer drives a [`Session`] from one task and calls into this
//! crate to validate submissions and resolve phases.
//!
//! # Key types
//!
//! - [`Catalogue`] / [`RoleSet`]: which role mixes fit which roster size
//! - [`Lobby`]: an unlocked roster filling up
//! - [`Session`]: one locked game's state
//! - [`resolve_night`], [`resolve_vote`]: phase resolvers
//! - [`evaluate`]: the win check
//!
//! Randomness is always passed in, so seeding an `StdRng` pins every
//! shuffle, tie-break and forced reading:
//!
//! ```
//! use nightfall_protocol::{Participant, PlayerId, Role};
//! use nightfall_rules::{Catalogue, assign_roles};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let set = Catalogue::standard().candidates(3).unwrap()[1].clone();
//! let roster = (1..=3).map(|i| Participant::new(PlayerId(i), format!("p{i}"))).collect();
//! let session = assign_roles(roster, &set, &mut StdRng::seed_from_u64(9)).unwrap();
//! assert_eq!(session.holders_of(Role::Wolf).len(), 1);
//! ```

mod assignment;
mod catalogue;
mod error;
mod night;
mod session;
mod vote;
mod win;

pub use assignment::assign_roles;
pub use catalogue::{Catalogue, RoleSet};
pub use error::{ActionRejected, RulesError};
pub use night::{NightOutcome, resolve_night};
pub use session::{Lobby, NightAction, NightActions, Session};
pub use vote::{VoteOutcome, resolve_vote, tally_votes};
pub use win::{evaluate, winners};
