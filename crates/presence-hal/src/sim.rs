//! In-process stand-ins for the speech server and the movement daemon.
//!
//! [`ScriptedPlayback`] and [`RecordingTrigger`] let the mood loop and the
//! move hook run in tests, CI, and `--dry-run` mode without a robot or a TTS
//! server on the network.
//!
//! # Example
//!
//! ```rust
//! use presence_hal::sim::{RecordingTrigger, ScriptedPlayback};
//! use presence_hal::{MoveTrigger, PlaybackStatusSource};
//! use presence_types::MoveId;
//!
//! let mut playback = ScriptedPlayback::playing_for(1);
//! assert!(playback.is_playing());
//! assert!(!playback.is_playing());
//!
//! let mut trigger = RecordingTrigger::new();
//! assert!(trigger.trigger(&MoveId::new("yes1")).success);
//! assert_eq!(trigger.played().len(), 1);
//! ```

use presence_types::{MoveId, TriggerResult};

use crate::move_trigger::MoveTrigger;
use crate::playback::PlaybackStatusSource;

// ────────────────────────────────────────────────────────────────────────────
// Scripted playback
// ────────────────────────────────────────────────────────────────────────────

/// Reports `true` for a fixed number of polls, then `false` forever.
pub struct ScriptedPlayback {
    /// `None` means playback never ends.
    remaining: Option<u32>,
    polls: u32,
}

impl ScriptedPlayback {
    /// Playing for the first `polls` polls.
    pub fn playing_for(polls: u32) -> Self {
        Self {
            remaining: Some(polls),
            polls: 0,
        }
    }

    /// Playing on every poll.
    pub fn always_playing() -> Self {
        Self {
            remaining: None,
            polls: 0,
        }
    }

    /// Never playing; the loop should stop on its first poll.
    pub fn silent() -> Self {
        Self::playing_for(0)
    }

    /// Number of times [`PlaybackStatusSource::is_playing`] was called.
    pub fn polls(&self) -> u32 {
        self.polls
    }
}

impl PlaybackStatusSource for ScriptedPlayback {
    fn is_playing(&mut self) -> bool {
        self.polls += 1;
        match self.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording trigger
// ────────────────────────────────────────────────────────────────────────────

/// Records every requested move.  Succeeds unless built with
/// [`RecordingTrigger::failing`].
#[derive(Default)]
pub struct RecordingTrigger {
    played: Vec<MoveId>,
    fail: bool,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trigger whose every request fails, as if the daemon were down.
    pub fn failing() -> Self {
        Self {
            played: Vec::new(),
            fail: true,
        }
    }

    /// Moves requested so far, in call order.
    pub fn played(&self) -> &[MoveId] {
        &self.played
    }
}

impl MoveTrigger for RecordingTrigger {
    fn trigger(&mut self, emotion: &MoveId) -> TriggerResult {
        self.played.push(emotion.clone());
        if self.fail {
            TriggerResult::failed()
        } else {
            TriggerResult::accepted(Some(format!("sim-{}", self.played.len())))
        }
    }
}
