//! Entry points that turn one generated response into robot motion.
//!
//! - [`mood_hook`] – `MOOD` directive → catalog → [`MoodLoop`] session.
//! - [`move_hook`] – up to two `MOVE` directives → [`MoveGate`] → daemon.
//!
//! Both are silent no-ops when the text carries no directive.

use presence_hal::MoveTrigger;
use presence_kernel::{MoodCatalog, MoveGate};
use presence_types::{LoopReport, TriggerResult};
use rand::Rng;
use tracing::{debug, info};

use crate::markers::{extract_mood, extract_moves};
use crate::mood_loop::MoodLoop;

/// Run a mood-loop session for the first `MOOD` directive in `text`.
///
/// Returns `None` (and touches nothing) when `text` has no such directive.
/// Unknown moods fall back to the catalog's default mood.
pub fn mood_hook<R: Rng>(
    text: &str,
    catalog: &MoodCatalog,
    mood_loop: &mut MoodLoop<'_, R>,
) -> Option<LoopReport> {
    let Some(requested) = extract_mood(text) else {
        debug!("no mood directive");
        return None;
    };

    let (mood, candidates) = catalog.resolve(requested.as_str());
    Some(mood_loop.run(mood, candidates))
}

/// Trigger the first two `MOVE` directives in `text`, in order.
///
/// Names outside the emotion library are skipped by the [`MoveGate`] and
/// reported as failed.  Returns one `(name, result)` pair per directive
/// honoured.
pub fn move_hook(text: &str, daemon: &mut dyn MoveTrigger) -> Vec<(String, TriggerResult)> {
    let names = extract_moves(text);
    if names.is_empty() {
        debug!("no move directives");
        return Vec::new();
    }

    let mut gate = MoveGate::new(daemon);
    let results: Vec<(String, TriggerResult)> = names
        .into_iter()
        .map(|name| {
            let result = gate.trigger_named(&name);
            (name, result)
        })
        .collect();

    info!(
        requested = results.len(),
        triggered = results.iter().filter(|(_, r)| r.success).count(),
        "move directives handled"
    );
    results
}
