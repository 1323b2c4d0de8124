//! Generic `PlaybackStatusSource` trait for anything that can say whether
//! synthesized speech is currently audible.
//!
//! The mood loop only ever talks to the trait, so the HTTP client in
//! [`tts`][crate::tts] can be swapped for the fakes in [`sim`][crate::sim].

/// A read-only view of the speech service's playback state.
pub trait PlaybackStatusSource {
    /// Return `true` while audio is playing.
    ///
    /// Implementations must answer `false` whenever the state cannot be
    /// determined, so an unreachable service stops the loop instead of
    /// keeping it alive.
    fn is_playing(&mut self) -> bool;
}
