//! [`MoveGate`] – vocabulary check in front of a [`MoveTrigger`].
//!
//! Move names that come straight from generated text (the discrete `MOVE`
//! path) must pass through the gate before reaching the daemon.  Names
//! outside the emotion library are rejected with a warning and never
//! produce a network request.  Mood-loop candidates skip the gate: the
//! [`MoodCatalog`][crate::catalog::MoodCatalog] already validated them.
//!
//! # Example
//!
//! ```
//! use presence_hal::sim::RecordingTrigger;
//! use presence_kernel::MoveGate;
//!
//! let mut daemon = RecordingTrigger::new();
//! let mut gate = MoveGate::new(&mut daemon);
//!
//! assert!(gate.trigger_named("cheerful1").success);
//! assert!(!gate.trigger_named("moonwalk1").success);
//! assert_eq!(daemon.played().len(), 1);
//! ```

use presence_hal::MoveTrigger;
use presence_types::{MoveId, PresenceError, TriggerResult};
use tracing::warn;

/// Forwards only vocabulary-approved moves to the wrapped trigger.
pub struct MoveGate<'a> {
    inner: &'a mut dyn MoveTrigger,
}

impl<'a> MoveGate<'a> {
    pub fn new(inner: &'a mut dyn MoveTrigger) -> Self {
        Self { inner }
    }

    /// Validate `name` against the emotion library.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::UnknownMove`] when `name` is not a known
    /// emotion.
    pub fn check(name: &str) -> Result<MoveId, PresenceError> {
        let emotion = MoveId::new(name);
        if emotion.is_known() {
            Ok(emotion)
        } else {
            Err(PresenceError::UnknownMove(name.to_string()))
        }
    }

    /// Validate `name`, then trigger it.  Unknown names yield a failed
    /// [`TriggerResult`] without touching the wrapped trigger.
    pub fn trigger_named(&mut self, name: &str) -> TriggerResult {
        match Self::check(name) {
            Ok(emotion) => self.inner.trigger(&emotion),
            Err(e) => {
                warn!(emotion = name, error = %e, "skipping move");
                TriggerResult::failed()
            }
        }
    }
}

impl MoveTrigger for MoveGate<'_> {
    fn trigger(&mut self, emotion: &MoveId) -> TriggerResult {
        self.trigger_named(emotion.as_str())
    }
}
