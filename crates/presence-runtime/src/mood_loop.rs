//! [`MoodLoop`] – keeps the robot moving while speech is playing.
//!
//! One call to [`MoodLoop::run`] is one session:
//!
//! ```text
//! Idle ──start──▶ Running ──playback ended──▶ StoppedByPlaybackEnd
//!                    │
//!                    └──────elapsed > max────▶ StoppedByTimeout
//! ```
//!
//! Each iteration of `Running`:
//!
//! 1. **Deadline** – stop with [`LoopState::StoppedByTimeout`] once the
//!    session has lasted longer than `max_duration`.
//! 2. **Poll** – ask the [`PlaybackStatusSource`]; stop with
//!    [`LoopState::StoppedByPlaybackEnd`] when it says "not playing".
//! 3. **Act** – pick a candidate uniformly at random and hand it to the
//!    [`MoveTrigger`].  The attempt counts whether or not the daemon accepts
//!    it; failed moves are not retried.
//! 4. **Pause** – sleep a uniformly random duration in
//!    `[pause_min, pause_max]`.  This is the only suspension point.
//!
//! The iteration count is bounded up front: every pass sleeps at least
//! `pause_min`, so the deadline predicate must fire within
//! `floor(max_duration / pause_min) + 2` passes.  Exhausting that bound is
//! reported as a timeout.
//!
//! # Example
//!
//! ```rust
//! use presence_hal::sim::{RecordingTrigger, ScriptedPlayback};
//! use presence_kernel::{ManualClock, MoodCatalog};
//! use presence_runtime::mood_loop::{MoodLoop, MoodLoopConfig};
//! use presence_types::LoopState;
//! use rand::SeedableRng;
//!
//! let catalog = MoodCatalog::builtin().unwrap();
//! let (mood, moves) = catalog.resolve("energetic");
//!
//! let mut playback = ScriptedPlayback::playing_for(2);
//! let mut daemon = RecordingTrigger::new();
//! let mut clock = ManualClock::new();
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let mut mood_loop = MoodLoop::new(
//!     MoodLoopConfig::default(), &mut playback, &mut daemon, &mut clock, rng,
//! ).unwrap();
//! let report = mood_loop.run(mood, moves);
//!
//! assert_eq!(report.state, LoopState::StoppedByPlaybackEnd);
//! assert_eq!(report.moves_played, 2);
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use presence_hal::{MoveTrigger, PlaybackStatusSource};
use presence_kernel::{Clock, SessionDeadline};
use presence_types::{LoopReport, LoopState, MoodId, MoveId, PresenceError};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Safety bound on a single session.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(60);
pub const DEFAULT_PAUSE_MIN: Duration = Duration::from_millis(1000);
pub const DEFAULT_PAUSE_MAX: Duration = Duration::from_millis(2000);

/// Timing parameters for [`MoodLoop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodLoopConfig {
    pub max_duration: Duration,
    /// Lower bound of the pause between moves.  Must be non-zero.
    pub pause_min: Duration,
    pub pause_max: Duration,
}

impl Default for MoodLoopConfig {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_DURATION,
            pause_min: DEFAULT_PAUSE_MIN,
            pause_max: DEFAULT_PAUSE_MAX,
        }
    }
}

impl MoodLoopConfig {
    /// # Errors
    ///
    /// Returns [`PresenceError::Config`] when `pause_min` is zero or larger
    /// than `pause_max`.
    pub fn validate(&self) -> Result<(), PresenceError> {
        if self.pause_min.is_zero() {
            return Err(PresenceError::Config("pause_min must be greater than zero".into()));
        }
        if self.pause_min > self.pause_max {
            return Err(PresenceError::Config(format!(
                "pause_min ({:?}) exceeds pause_max ({:?})",
                self.pause_min, self.pause_max
            )));
        }
        Ok(())
    }

    /// Upper bound on loop passes for this configuration.
    pub fn iteration_cap(&self) -> u64 {
        let min = self.pause_min.as_nanos().max(1);
        let passes = self.max_duration.as_nanos() / min;
        u64::try_from(passes).unwrap_or(u64::MAX - 2) + 2
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session state
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable state of one session; lives only for the duration of
/// [`MoodLoop::run`].
#[derive(Debug)]
struct LoopSession {
    id: Uuid,
    mood: MoodId,
    deadline: SessionDeadline,
    started_at: DateTime<Utc>,
    moves_played: u32,
    moves_accepted: u32,
    state: LoopState,
}

impl LoopSession {
    fn start(mood: MoodId, clock: &dyn Clock, max_duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            mood,
            deadline: SessionDeadline::start(clock, max_duration),
            started_at: Utc::now(),
            moves_played: 0,
            moves_accepted: 0,
            state: LoopState::Idle,
        }
    }

    fn finish(self, clock: &dyn Clock) -> LoopReport {
        LoopReport {
            session: self.id,
            mood: self.mood,
            state: self.state,
            moves_played: self.moves_played,
            moves_accepted: self.moves_accepted,
            elapsed: self.deadline.elapsed(clock),
            started_at: self.started_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MoodLoop
// ─────────────────────────────────────────────────────────────────────────────

/// The mood-loop scheduler.
///
/// Borrows its collaborators so callers keep ownership of fakes and can
/// inspect them after [`MoodLoop::run`] returns.
pub struct MoodLoop<'a, R: Rng> {
    config: MoodLoopConfig,
    playback: &'a mut dyn PlaybackStatusSource,
    trigger: &'a mut dyn MoveTrigger,
    clock: &'a mut dyn Clock,
    rng: R,
}

impl<'a, R: Rng> MoodLoop<'a, R> {
    /// # Errors
    ///
    /// Returns [`PresenceError::Config`] if `config` fails
    /// [`MoodLoopConfig::validate`].
    pub fn new(
        config: MoodLoopConfig,
        playback: &'a mut dyn PlaybackStatusSource,
        trigger: &'a mut dyn MoveTrigger,
        clock: &'a mut dyn Clock,
        rng: R,
    ) -> Result<Self, PresenceError> {
        config.validate()?;
        Ok(Self {
            config,
            playback,
            trigger,
            clock,
            rng,
        })
    }

    /// Run one session for `mood`, drawing moves from `candidates`, until a
    /// terminal state is reached.
    ///
    /// An empty candidate set never enters `Running`; the report carries
    /// [`LoopState::Idle`] and no moves.
    pub fn run(&mut self, mood: MoodId, candidates: &[MoveId]) -> LoopReport {
        let mut session = LoopSession::start(mood, &*self.clock, self.config.max_duration);
        let span = info_span!("mood_loop", session = %session.id, mood = %session.mood);
        let _enter = span.enter();

        if candidates.is_empty() {
            warn!("mood has no candidate moves; not starting");
            return session.finish(&*self.clock);
        }

        info!(
            candidates = candidates.len(),
            max_duration_secs = session.deadline.limit().as_secs_f64(),
            "starting mood loop"
        );
        session.state = LoopState::Running;

        for iteration in 0..self.config.iteration_cap() {
            if let Some(terminal) = self.step(&mut session, candidates, iteration) {
                session.state = terminal;
                break;
            }
        }

        if !session.state.is_terminal() {
            warn!("iteration bound reached before the deadline fired; stopping");
            session.state = LoopState::StoppedByTimeout;
        }

        let report = session.finish(&*self.clock);
        match report.state {
            LoopState::StoppedByTimeout => info!(
                moves_played = report.moves_played,
                moves_accepted = report.moves_accepted,
                elapsed_secs = report.elapsed.as_secs_f64(),
                "safety timeout reached, stopping"
            ),
            _ => info!(
                moves_played = report.moves_played,
                moves_accepted = report.moves_accepted,
                elapsed_secs = report.elapsed.as_secs_f64(),
                "speech finished, mood loop complete"
            ),
        }
        report
    }

    /// One pass of the loop.  Returns the terminal state when the session
    /// must stop.
    fn step(
        &mut self,
        session: &mut LoopSession,
        candidates: &[MoveId],
        iteration: u64,
    ) -> Option<LoopState> {
        if session.deadline.expired(&*self.clock) {
            return Some(LoopState::StoppedByTimeout);
        }

        if !self.playback.is_playing() {
            return Some(LoopState::StoppedByPlaybackEnd);
        }

        let emotion = candidates.choose(&mut self.rng)?;
        let result = self.trigger.trigger(emotion);
        session.moves_played += 1;
        if result.success {
            session.moves_accepted += 1;
        }

        let pause = self.next_pause();
        debug!(
            iteration,
            emotion = %emotion,
            success = result.success,
            pause_ms = pause.as_millis() as u64,
            "move played"
        );
        self.clock.sleep(pause);
        None
    }

    fn next_pause(&mut self) -> Duration {
        self.rng
            .random_range(self.config.pause_min..=self.config.pause_max)
    }
}
