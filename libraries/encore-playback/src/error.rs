//! Error types for player commands
//!
//! `Display` is the message reported to the listener.

use encore_core::EncoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// `load` without a playable selection
    #[error("Please select a source before attempting to load.")]
    NoSelection,

    /// Selected collection has no songs
    #[error("You can't load an empty audio collection!")]
    EmptyCollection,

    #[error("Please load a source before attempting to pause or resume playback.")]
    NothingToPause,

    #[error("Please load a source before setting the repeat status.")]
    NothingToRepeat,

    #[error("Please load a source before using the shuffle function.")]
    NothingToShuffle,

    #[error("The loaded source is not a playlist or an album.")]
    NotShuffleable,

    #[error("Please load a source before attempting to forward.")]
    NothingToForward,

    #[error("Please select a source before rewinding.")]
    NothingToRewind,

    /// Forward/backward on anything but a podcast
    #[error("The loaded source is not a podcast.")]
    NotAPodcast,

    #[error("Please load a source before skipping to the next track.")]
    NothingToSkip,

    #[error("Please load a source before returning to the previous track.")]
    NothingToReturnTo,

    /// Ad break requested while nothing plays
    #[error("{0} is not playing any music.")]
    NotPlaying(String),

    /// Ad break requested while one is already armed
    #[error("{0} already has an ad break scheduled.")]
    AdBreakAlreadyScheduled(String),

    /// Library-level failure (unknown user, wrong account kind)
    #[error(transparent)]
    Library(#[from] EncoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_keep_their_message() {
        let err: PlaybackError = EncoreError::NotAListener("band".into()).into();
        assert_eq!(err.to_string(), "band is not a normal user.");
    }

    #[test]
    fn ad_break_messages_name_the_user() {
        assert_eq!(
            PlaybackError::NotPlaying("alice".into()).to_string(),
            "alice is not playing any music."
        );
    }
}
