//! `presence-hal` – Robot and speech-service interfaces
//!
//! # Modules
//!
//! - [`playback`] – [`PlaybackStatusSource`]: is synthesized speech playing?
//! - [`move_trigger`] – [`MoveTrigger`]: start one recorded move.
//! - [`tts`] – [`TtsStatusClient`][tts::TtsStatusClient]: blocking HTTP
//!   implementation of [`PlaybackStatusSource`] against the speech server.
//! - [`daemon`] – [`DaemonClient`][daemon::DaemonClient]: blocking HTTP
//!   implementation of [`MoveTrigger`] against the robot daemon.
//! - [`sim`] – in-process fakes for tests and dry runs.

#[cfg(test)]
mod canned;
pub mod daemon;
pub mod move_trigger;
pub mod playback;
pub mod sim;
pub mod tts;

pub use daemon::DaemonClient;
pub use move_trigger::MoveTrigger;
pub use playback::PlaybackStatusSource;
pub use tts::TtsStatusClient;
