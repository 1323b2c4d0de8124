//! [`MoodCatalog`] – the validated mood → candidate-moves table.
//!
//! Built once at startup, either from the built-in table or from the `moods`
//! section of the configuration file, and never mutated afterwards.  Every
//! invariant the mood loop relies on is checked at construction:
//!
//! - each mood lists at least one move, with no duplicates;
//! - every move belongs to the closed emotion library;
//! - the fallback mood ([`FALLBACK_MOOD`]) is present.
//!
//! Lookups are case-insensitive.  Unknown moods are never an error: callers
//! use [`MoodCatalog::resolve`], which substitutes the fallback and logs a
//! warning.
//!
//! # Example
//!
//! ```
//! use presence_kernel::catalog::MoodCatalog;
//!
//! let catalog = MoodCatalog::builtin().expect("built-in table is valid");
//! assert!(catalog.contains("Energetic"));
//!
//! let (mood, moves) = catalog.resolve("zzz");
//! assert_eq!(mood.as_str(), "thoughtful");
//! assert!(!moves.is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use presence_types::{MoodId, MoveId, PresenceError, is_known_emotion};
use tracing::warn;

/// Mood substituted for unrecognized mood names.
pub const FALLBACK_MOOD: &str = "thoughtful";

// Moods the mood loop has always played keep their loop candidates; the
// remaining gesture clusters extend the table.
const BUILTIN_MOODS: &[(&str, &[&str])] = &[
    ("thoughtful", &[
        "thoughtful1", "thoughtful2", "curious1", "attentive1", "attentive2",
        "inquiring1", "inquiring2", "inquiring3", "understanding1", "understanding2",
    ]),
    ("energetic", &[
        "electric1", "enthusiastic1", "enthusiastic2", "dance1", "dance2",
        "dance3", "laughing1", "laughing2", "yes1", "come1",
    ]),
    ("playful", &[
        "laughing1", "laughing2", "dance1", "dance2", "dance3", "come1",
        "electric1", "oops1", "oops2",
    ]),
    ("calm", &[
        "calming1", "serenity1", "relief1", "relief2", "shy1",
        "understanding1", "understanding2", "sleep1",
    ]),
    ("confused", &[
        "confused1", "uncertain1", "lost1", "inquiring1", "inquiring2",
        "incomprehensible2", "uncomfortable1", "oops1", "oops2",
    ]),
    ("frustrated", &[
        "frustrated1", "irritated1", "irritated2", "impatient1", "impatient2",
        "exhausted1", "tired1", "displeased1", "displeased2",
    ]),
    ("sad", &[
        "sad1", "sad2", "downcast1", "lonely1", "no_sad1", "yes_sad1",
        "resigned1", "uncomfortable1",
    ]),
    ("surprised", &[
        "surprised1", "surprised2", "amazed1", "oops1", "oops2",
        "incomprehensible2", "electric1",
    ]),
    ("angry", &[
        "furious1", "rage1", "frustrated1", "irritated1", "irritated2",
        "contempt1", "disgusted1", "reprimand1", "reprimand2", "reprimand3",
    ]),
    ("helpful", &[
        "helpful1", "helpful2", "welcoming1", "welcoming2", "grateful1",
        "understanding1", "understanding2", "attentive1", "attentive2", "yes1",
    ]),
    ("shy", &["shy1", "uncertain1", "uncomfortable1", "downcast1", "anxiety1"]),
    ("sleepy", &["sleep1", "tired1", "exhausted1", "boredom1", "boredom2", "resigned1"]),
    ("affectionate", &[
        "loving1", "grateful1", "welcoming1", "welcoming2", "cheerful1",
        "shy1", "come1",
    ]),
    ("defiant", &[
        "no1", "no_excited1", "go_away1", "contempt1", "reprimand1",
        "reprimand2", "reprimand3", "indifferent1",
    ]),
    ("neutral", &[
        "attentive1", "attentive2", "thoughtful1", "curious1", "yes1",
        "understanding1", "calming1", "serenity1",
    ]),
    ("celebratory", &[
        "success1", "success2", "proud1", "proud2", "proud3",
        "cheerful1", "electric1", "enthusiastic1", "enthusiastic2",
        "grateful1", "yes1", "laughing1", "laughing2",
    ]),
    ("welcoming", &[
        "welcoming1", "welcoming2", "helpful1", "helpful2", "loving1",
        "come1", "grateful1", "cheerful1", "calming1",
    ]),
];

/// Immutable, validated mapping from mood to candidate moves.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    moods: BTreeMap<MoodId, Vec<MoveId>>,
}

impl MoodCatalog {
    /// The built-in table of 17 moods.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Catalog`] if the table violates an invariant.
    pub fn builtin() -> Result<Self, PresenceError> {
        Self::from_entries(BUILTIN_MOODS.iter().map(|(mood, moves)| {
            (
                mood.to_string(),
                moves.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            )
        }))
    }

    /// Build and validate a catalog from `(mood, moves)` pairs.
    ///
    /// Mood names are case-folded; move names are taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Catalog`] for an empty or duplicated mood, a
    /// duplicated or unknown move, or a missing [`FALLBACK_MOOD`].
    pub fn from_entries<I>(entries: I) -> Result<Self, PresenceError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut moods = BTreeMap::new();
        for (raw_mood, raw_moves) in entries {
            let mood = MoodId::new(&raw_mood);
            let invalid = |reason: String| PresenceError::Catalog {
                mood: mood.to_string(),
                reason,
            };

            if mood.as_str().is_empty() {
                return Err(invalid("empty mood name".into()));
            }
            if moods.contains_key(&mood) {
                return Err(invalid("mood defined more than once".into()));
            }
            if raw_moves.is_empty() {
                return Err(invalid("no candidate moves".into()));
            }

            let mut seen = HashSet::new();
            for name in &raw_moves {
                if !is_known_emotion(name) {
                    return Err(invalid(format!("'{name}' is not in the emotion library")));
                }
                if !seen.insert(name.as_str()) {
                    return Err(invalid(format!("'{name}' listed more than once")));
                }
            }

            let moves = raw_moves.into_iter().map(MoveId::new).collect();
            moods.insert(mood, moves);
        }

        if !moods.contains_key(&MoodId::new(FALLBACK_MOOD)) {
            return Err(PresenceError::Catalog {
                mood: FALLBACK_MOOD.to_string(),
                reason: "fallback mood is missing".into(),
            });
        }

        Ok(Self { moods })
    }

    /// Candidate moves for `mood`, or `None` when it is not a catalog key.
    pub fn lookup(&self, mood: &str) -> Option<&[MoveId]> {
        self.moods.get(&MoodId::new(mood)).map(Vec::as_slice)
    }

    pub fn contains(&self, mood: &str) -> bool {
        self.lookup(mood).is_some()
    }

    /// Resolve `mood` to a catalog key and its candidates, substituting
    /// [`FALLBACK_MOOD`] (with a warning) when the name is unknown.
    pub fn resolve(&self, mood: &str) -> (MoodId, &[MoveId]) {
        let requested = MoodId::new(mood);
        if let Some(moves) = self.moods.get(&requested).map(Vec::as_slice) {
            return (requested, moves);
        }

        warn!(mood = %requested, fallback = FALLBACK_MOOD, "unknown mood, falling back");
        let fallback = MoodId::new(FALLBACK_MOOD);
        // Presence of the fallback is checked in `from_entries`.
        let moves = self.moods.get(&fallback).map(Vec::as_slice).unwrap_or(&[]);
        (fallback, moves)
    }

    /// Mood names in sorted order.
    pub fn moods(&self) -> impl Iterator<Item = &MoodId> {
        self.moods.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MoodId, &[MoveId])> {
        self.moods.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}
