//! Core types for playback resolution

use serde::{Deserialize, Serialize};

/// Display name of the synthetic ad item
pub const AD_BREAK_NAME: &str = "Ad Break";

/// Repeat mode
///
/// Single items (songs, podcasts) cycle `NoRepeat -> RepeatOnce ->
/// RepeatInfinite`; collections cycle `NoRepeat -> RepeatAll ->
/// RepeatCurrentSong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the item ends
    #[default]
    #[serde(rename = "No Repeat")]
    NoRepeat,

    /// Play a single item one extra time
    #[serde(rename = "Repeat Once")]
    RepeatOnce,

    /// Loop a single item forever
    #[serde(rename = "Repeat Infinite")]
    RepeatInfinite,

    /// Loop the whole collection
    #[serde(rename = "Repeat All")]
    RepeatAll,

    /// Loop the current song of a collection
    #[serde(rename = "Repeat Current Song")]
    RepeatCurrentSong,
}

impl RepeatMode {
    /// Next mode in the cycle for the loaded item kind
    pub fn next(self, collection: bool) -> Self {
        match (self, collection) {
            (Self::NoRepeat, false) => Self::RepeatOnce,
            (Self::RepeatOnce, false) => Self::RepeatInfinite,
            (Self::NoRepeat, true) => Self::RepeatAll,
            (Self::RepeatAll, true) => Self::RepeatCurrentSong,
            _ => Self::NoRepeat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoRepeat => "No Repeat",
            Self::RepeatOnce => "Repeat Once",
            Self::RepeatInfinite => "Repeat Infinite",
            Self::RepeatAll => "Repeat All",
            Self::RepeatCurrentSong => "Repeat Current Song",
        }
    }
}

/// Player settings that are fixed for a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Seconds skipped by `forward` (default: 90)
    pub forward_step: u32,

    /// Seconds rewound by `backward` (default: 90)
    pub backward_step: u32,

    /// Length of an ad break in seconds (default: 10)
    pub ad_break_duration: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            forward_step: 90,
            backward_step: 90,
            ad_break_duration: 10,
        }
    }
}
