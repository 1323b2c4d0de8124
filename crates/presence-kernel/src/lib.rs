//! `presence-kernel` – Safety & validation
//!
//! Enforces the invariants the runtime depends on; it does not talk to the
//! network itself.
//!
//! # Modules
//!
//! - [`catalog`] – [`MoodCatalog`][catalog::MoodCatalog]: the immutable,
//!   validated mood → moves table with case-insensitive lookup and the
//!   `thoughtful` fallback.
//! - [`move_gate`] – [`MoveGate`][move_gate::MoveGate]: rejects move names
//!   outside the emotion library before any request is made.
//! - [`clock`] – [`Clock`][clock::Clock] and
//!   [`SessionDeadline`][clock::SessionDeadline]: the time source and the
//!   safety bound on mood-loop sessions.

pub mod catalog;
pub mod clock;
pub mod move_gate;

pub use catalog::{FALLBACK_MOOD, MoodCatalog};
pub use clock::{Clock, ManualClock, SessionDeadline, SystemClock};
pub use move_gate::MoveGate;
