//! `presence-runtime` – Directive handling and the mood loop
//!
//! # Modules
//!
//! - [`markers`] – [`MarkerExtractor`][markers::MarkerExtractor]: finds
//!   `<!-- MOOD: … -->` and `<!-- MOVE: … -->` directives in generated text.
//! - [`mood_loop`] – [`MoodLoop`][mood_loop::MoodLoop]: the scheduler that
//!   keeps triggering random moves from a mood while speech is playing,
//!   bounded by a safety timeout.
//! - [`hooks`] – [`mood_hook`][hooks::mood_hook] and
//!   [`move_hook`][hooks::move_hook]: one response in, robot motion out.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: stderr
//!   logging with optional OTLP span export.

pub mod hooks;
pub mod markers;
pub mod mood_loop;
pub mod telemetry;

pub use hooks::{mood_hook, move_hook};
pub use markers::{Directive, MAX_DISCRETE_MOVES, MarkerExtractor, extract_mood, extract_moves};
pub use mood_loop::{MoodLoop, MoodLoopConfig};
pub use telemetry::{TracerProviderGuard, init_tracing};
