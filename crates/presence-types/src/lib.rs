use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Recorded-move dataset served by the movement daemon.
pub const DEFAULT_DATASET: &str = "pollen-robotics/reachy-mini-emotions-library";

/// Placeholder reported when the daemon accepts a move without returning its uuid.
pub const UNKNOWN_MOVE_ID: &str = "unknown";

/// The closed vocabulary of recorded emotions the daemon can play.
pub const EMOTION_LIBRARY: &[&str] = &[
    "amazed1", "anxiety1", "attentive1", "attentive2", "boredom1", "boredom2",
    "calming1", "cheerful1", "come1", "confused1", "contempt1", "curious1",
    "dance1", "dance2", "dance3", "disgusted1", "displeased1", "displeased2",
    "downcast1", "dying1", "electric1", "enthusiastic1", "enthusiastic2",
    "exhausted1", "fear1", "frustrated1", "furious1", "go_away1", "grateful1",
    "helpful1", "helpful2", "impatient1", "impatient2", "incomprehensible2",
    "indifferent1", "inquiring1", "inquiring2", "inquiring3", "irritated1",
    "irritated2", "laughing1", "laughing2", "lonely1", "lost1", "loving1",
    "no1", "no_excited1", "no_sad1", "oops1", "oops2", "proud1", "proud2",
    "proud3", "rage1", "relief1", "relief2", "reprimand1", "reprimand2",
    "reprimand3", "resigned1", "sad1", "sad2", "scared1", "serenity1", "shy1",
    "sleep1", "success1", "success2", "surprised1", "surprised2", "thoughtful1",
    "thoughtful2", "tired1", "uncertain1", "uncomfortable1", "understanding1",
    "understanding2", "welcoming1", "welcoming2", "yes1", "yes_sad1",
];

/// Returns `true` when `name` is part of [`EMOTION_LIBRARY`].
pub fn is_known_emotion(name: &str) -> bool {
    EMOTION_LIBRARY.contains(&name)
}

/// A mood category name, lower-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoodId(String);

impl MoodId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of one recorded robot motion, e.g. `"cheerful1"`.
///
/// Construction does not check the vocabulary; the catalog validates its
/// entries at load time and the discrete path goes through a vocabulary gate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoveId(String);

impl MoveId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        is_known_emotion(&self.0)
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single move-play request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResult {
    pub success: bool,
    /// Identifier the daemon assigned to the running move, or
    /// [`UNKNOWN_MOVE_ID`].
    pub move_id: String,
}

impl TriggerResult {
    pub fn accepted(move_id: Option<String>) -> Self {
        Self {
            success: true,
            move_id: move_id.unwrap_or_else(|| UNKNOWN_MOVE_ID.to_string()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            move_id: UNKNOWN_MOVE_ID.to_string(),
        }
    }
}

/// Lifecycle of one mood-loop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    Idle,
    Running,
    /// The speech service reported that playback finished (or could not be
    /// reached).
    StoppedByPlaybackEnd,
    /// The safety bound on session length was exceeded.
    StoppedByTimeout,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopState::StoppedByPlaybackEnd | LoopState::StoppedByTimeout)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::StoppedByPlaybackEnd => "stopped_by_playback_end",
            LoopState::StoppedByTimeout => "stopped_by_timeout",
        };
        f.write_str(s)
    }
}

/// Summary produced when a mood loop reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopReport {
    pub session: Uuid,
    pub mood: MoodId,
    pub state: LoopState,
    /// Trigger attempts, successful or not.
    pub moves_played: u32,
    /// Attempts the daemon acknowledged.
    pub moves_accepted: u32,
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
}

/// Errors raised inside the presence stack.
///
/// Only catalog and configuration errors ever reach the process entry point;
/// transport failures are collapsed at the client boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresenceError {
    #[error("Unknown move '{0}': not in the emotion library")]
    UnknownMove(String),

    #[error("Invalid mood catalog entry '{mood}': {reason}")]
    Catalog { mood: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    BadResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_library_has_81_unique_entries() {
        let mut names: Vec<&str> = EMOTION_LIBRARY.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 81);
        assert_eq!(EMOTION_LIBRARY.len(), 81);
    }

    #[test]
    fn known_emotion_lookup_is_exact() {
        assert!(is_known_emotion("cheerful1"));
        assert!(is_known_emotion("go_away1"));
        assert!(!is_known_emotion("Cheerful1"));
        assert!(!is_known_emotion("moonwalk1"));
    }

    #[test]
    fn mood_id_is_case_normalized() {
        assert_eq!(MoodId::new("Energetic").as_str(), "energetic");
        assert_eq!(MoodId::new(" CALM ").to_string(), "calm");
        assert_eq!(MoodId::new("sad"), MoodId::new("SAD"));
    }

    #[test]
    fn move_id_vocabulary_check() {
        assert!(MoveId::new("dance2").is_known());
        assert!(!MoveId::new("backflip1").is_known());
    }

    #[test]
    fn trigger_result_defaults_to_unknown_id() {
        let ok = TriggerResult::accepted(None);
        assert!(ok.success);
        assert_eq!(ok.move_id, UNKNOWN_MOVE_ID);

        let ok = TriggerResult::accepted(Some("abc-123".into()));
        assert_eq!(ok.move_id, "abc-123");

        let failed = TriggerResult::failed();
        assert!(!failed.success);
        assert_eq!(failed.move_id, UNKNOWN_MOVE_ID);
    }

    #[test]
    fn only_stopped_states_are_terminal() {
        assert!(!LoopState::Idle.is_terminal());
        assert!(!LoopState::Running.is_terminal());
        assert!(LoopState::StoppedByPlaybackEnd.is_terminal());
        assert!(LoopState::StoppedByTimeout.is_terminal());
    }

    #[test]
    fn loop_report_serializes_state_and_mood() {
        let report = LoopReport {
            session: Uuid::new_v4(),
            mood: MoodId::new("calm"),
            state: LoopState::StoppedByTimeout,
            moves_played: 4,
            moves_accepted: 3,
            elapsed: Duration::from_millis(6500),
            started_at: Utc::now(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("StoppedByTimeout"));
        assert!(json.contains("\"calm\""));
    }

    #[test]
    fn presence_error_display() {
        let err = PresenceError::UnknownMove("moonwalk1".into());
        assert!(err.to_string().contains("moonwalk1"));

        let err = PresenceError::Catalog {
            mood: "calm".into(),
            reason: "no moves".into(),
        };
        assert!(err.to_string().contains("calm"));
        assert!(err.to_string().contains("no moves"));
    }
}
