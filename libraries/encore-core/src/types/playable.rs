/// What a player can have loaded, and what it resolves to on a given tick
use super::ids::{AlbumId, EpisodeRef, PlaylistId, PodcastId, SongId};
use serde::{Deserialize, Serialize};

/// A loadable item. The ad break is a synthetic item only the player itself loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayableRef {
    Song(SongId),
    Podcast(PodcastId),
    Album(AlbumId),
    Playlist(PlaylistId),
    AdBreak,
}

impl PlayableRef {
    /// Albums and playlists
    pub fn is_collection(self) -> bool {
        matches!(self, Self::Album(_) | Self::Playlist(_))
    }

    pub fn can_be_shuffled(self) -> bool {
        self.is_collection()
    }

    /// Only podcasts can be skipped forward/backward in fixed steps
    pub fn allows_forward_backward(self) -> bool {
        matches!(self, Self::Podcast(_))
    }

    /// Podcasts remember where the listener left off
    pub fn saves_progress(self) -> bool {
        matches!(self, Self::Podcast(_))
    }
}

/// The concrete file under the play head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayingFile {
    Song(SongId),
    Episode(EpisodeRef),
    AdBreak,
}

impl PlayingFile {
    pub fn as_song(self) -> Option<SongId> {
        match self {
            Self::Song(id) => Some(id),
            _ => None,
        }
    }

    /// Ad plays never count as listens
    pub fn is_creditable(self) -> bool {
        !matches!(self, Self::AdBreak)
    }
}
