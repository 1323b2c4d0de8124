//! [`MarkerExtractor`] – finds inline directives in generated text.
//!
//! Directives are HTML comments of the shape `<!-- KEYWORD: token -->`, where
//! the keyword is `MOOD` (continuous mood loop) or `MOVE` (discrete gesture)
//! and the token matches `[a-zA-Z0-9_]+`.  Whitespace inside the comment is
//! optional; the keyword is case-sensitive.
//!
//! Text without a directive is the common case and is not an error.
//!
//! # Example
//!
//! ```rust
//! use presence_runtime::markers::MarkerExtractor;
//!
//! let text = "Sure! <!-- MOVE: yes1 --> Done <!-- MOVE: cheerful1 --> <!-- MOVE: dance1 -->";
//! assert_eq!(MarkerExtractor::moves().take(text, 2), vec!["yes1", "cheerful1"]);
//! assert_eq!(MarkerExtractor::mood().first(text), None);
//! ```

use std::sync::LazyLock;

use presence_types::MoodId;
use regex::Regex;

/// Number of `MOVE` directives honoured per response; the rest are ignored
/// to keep gestures subtle.
pub const MAX_DISCRETE_MOVES: usize = 2;

static MOOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*MOOD:\s*([a-zA-Z0-9_]+)\s*-->").expect("MOOD pattern is valid")
});

static MOVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*MOVE:\s*([a-zA-Z0-9_]+)\s*-->").expect("MOVE pattern is valid")
});

/// The directive keyword an extractor looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Mood,
    Move,
}

impl Directive {
    fn pattern(self) -> &'static Regex {
        match self {
            Directive::Mood => &*MOOD_PATTERN,
            Directive::Move => &*MOVE_PATTERN,
        }
    }
}

/// Extracts the tokens of one directive kind from text.
#[derive(Debug, Clone, Copy)]
pub struct MarkerExtractor {
    directive: Directive,
}

impl MarkerExtractor {
    pub fn new(directive: Directive) -> Self {
        Self { directive }
    }

    /// Extractor for `<!-- MOOD: … -->`.
    pub fn mood() -> Self {
        Self::new(Directive::Mood)
    }

    /// Extractor for `<!-- MOVE: … -->`.
    pub fn moves() -> Self {
        Self::new(Directive::Move)
    }

    /// Token of the first directive in `text`.
    pub fn first(&self, text: &str) -> Option<String> {
        self.directive
            .pattern()
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Tokens of the first `limit` directives in `text`, in order.
    /// Repeated tokens are kept.
    pub fn take(&self, text: &str, limit: usize) -> Vec<String> {
        self.directive
            .pattern()
            .captures_iter(text)
            .take(limit)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

/// The mood requested by `text`, case-normalized.
pub fn extract_mood(text: &str) -> Option<MoodId> {
    MarkerExtractor::mood().first(text).map(|m| MoodId::new(&m))
}

/// The move names requested by `text`, at most [`MAX_DISCRETE_MOVES`].
pub fn extract_moves(text: &str) -> Vec<String> {
    MarkerExtractor::moves().take(text, MAX_DISCRETE_MOVES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_mood_marker() {
        assert_eq!(
            MarkerExtractor::mood().first("<!-- MOOD: energetic -->"),
            Some("energetic".to_string())
        );
    }

    #[test]
    fn whitespace_inside_marker_is_optional() {
        let ex = MarkerExtractor::mood();
        assert_eq!(ex.first("<!--MOOD:calm-->").as_deref(), Some("calm"));
        assert_eq!(ex.first("<!--   MOOD:\tsad_2   -->").as_deref(), Some("sad_2"));
    }

    #[test]
    fn first_of_several_moods_wins() {
        let text = "a <!-- MOOD: calm --> b <!-- MOOD: angry -->";
        assert_eq!(extract_mood(text), Some(MoodId::new("calm")));
    }

    #[test]
    fn mood_token_is_normalized() {
        assert_eq!(
            extract_mood("<!-- MOOD: Energetic -->").unwrap().as_str(),
            "energetic"
        );
    }

    #[test]
    fn text_without_marker_yields_nothing() {
        let ex = MarkerExtractor::mood();
        for text in [
            "",
            "Just a plain answer.",
            "<!-- MOOD: -->",
            "<!-- MOOD energetic -->",
            "<!-- mood: energetic -->",
            "<!-- MOOD: ener-getic -->",
            "<-- MOOD: energetic -->",
            "<!-- MOVE: yes1 -->",
        ] {
            assert_eq!(ex.first(text), None, "unexpected match in {text:?}");
        }
    }

    #[test]
    fn move_markers_capped_at_two() {
        let text = "<!-- MOVE: yes1 --> <!-- MOVE: cheerful1 --> <!-- MOVE: dance1 -->";
        assert_eq!(extract_moves(text), vec!["yes1", "cheerful1"]);
    }

    #[test]
    fn duplicate_moves_are_kept() {
        let text = "<!-- MOVE: yes1 --><!-- MOVE: yes1 -->";
        assert_eq!(extract_moves(text), vec!["yes1", "yes1"]);
    }

    #[test]
    fn move_and_mood_markers_do_not_mix() {
        let text = "<!-- MOOD: calm --> <!-- MOVE: shy1 -->";
        assert_eq!(extract_moves(text), vec!["shy1"]);
        assert_eq!(extract_mood(text), Some(MoodId::new("calm")));
    }

    #[test]
    fn multiline_text_is_scanned() {
        let text = "Line one.\nLine two.\n\n<!-- MOOD: playful -->\n";
        assert_eq!(extract_mood(text), Some(MoodId::new("playful")));
    }
}
