//! Snapshot of what a player shows to its listener

use crate::types::{RepeatMode, AD_BREAK_NAME};
use serde::{Deserialize, Serialize};

/// Playback status
///
/// With nothing loaded the status is always [`PlaybackStatus::empty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Name of the current song, episode or ad
    pub name: String,

    /// Seconds left in the current file
    pub remaining_time: i64,

    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub paused: bool,
}

impl PlaybackStatus {
    /// Nothing loaded
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            remaining_time: 0,
            repeat: RepeatMode::NoRepeat,
            shuffle: false,
            paused: true,
        }
    }

    /// Fresh status for a newly loaded item
    pub fn loaded() -> Self {
        Self {
            paused: false,
            ..Self::empty()
        }
    }

    /// Status shown while an ad plays
    pub fn ad_break(remaining_time: i64) -> Self {
        Self {
            name: AD_BREAK_NAME.to_string(),
            remaining_time,
            ..Self::loaded()
        }
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::empty()
    }
}
