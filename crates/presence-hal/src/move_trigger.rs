//! Generic `MoveTrigger` trait for anything that can start a recorded move.

use presence_types::{MoveId, TriggerResult};

/// Starts one recorded move per call.
///
/// A failed trigger is reported through [`TriggerResult::success`], never as
/// a panic or error: callers keep running after a failure.
pub trait MoveTrigger {
    fn trigger(&mut self, emotion: &MoveId) -> TriggerResult;
}
