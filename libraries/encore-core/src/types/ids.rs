/// ID types for Encore entities
///
/// Entities live in the [`Library`](crate::Library) arena and are never removed,
/// so an id is simply the entity's index in its arena vector.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Song identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(usize);

impl SongId {
    /// Create a song ID from an arena index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "song#{}", self.0)
    }
}

/// Album identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(usize);

impl AlbumId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "album#{}", self.0)
    }
}

/// Playlist identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(usize);

impl PlaylistId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playlist#{}", self.0)
    }
}

/// Podcast identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodcastId(usize);

impl PodcastId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "podcast#{}", self.0)
    }
}

/// Address of a single episode: the podcast plus its position in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub podcast: PodcastId,
    pub index: usize,
}

impl EpisodeRef {
    pub fn new(podcast: PodcastId, index: usize) -> Self {
        Self { podcast, index }
    }
}

impl fmt::Display for EpisodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/episode#{}", self.podcast, self.index)
    }
}
