/// Audio domain types: songs, podcasts and the collections that group songs
use super::ids::{AlbumId, PlaylistId, PodcastId, SongId};
use serde::{Deserialize, Serialize};

/// Song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    /// Duration in seconds
    pub duration: u32,
    pub album: String,
    pub artist: String,
    pub genre: String,
    pub tags: Vec<String>,
    pub lyrics: String,
    pub release_year: i32,
    /// Number of listeners that currently like this song
    pub likes: u32,
    /// Unlisted by an album or artist removal; still resolvable by id
    #[serde(default)]
    pub removed: bool,
}

/// Song fields as they arrive from input, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub name: String,
    pub duration: u32,
    pub album: String,
    pub artist: String,
    pub genre: String,
    pub tags: Vec<String>,
    pub lyrics: String,
    pub release_year: i32,
}

impl NewSong {
    pub(crate) fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            name: self.name,
            duration: self.duration,
            album: self.album,
            artist: self.artist,
            genre: self.genre,
            tags: self.tags,
            lyrics: self.lyrics,
            release_year: self.release_year,
            likes: 0,
            removed: false,
        }
    }
}

/// Podcast episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub duration: u32,
    pub description: String,
}

impl Episode {
    pub fn new(name: impl Into<String>, duration: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration,
            description: description.into(),
        }
    }
}

/// Podcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub name: String,
    pub owner: String,
    pub episodes: Vec<Episode>,
    #[serde(default)]
    pub removed: bool,
}

/// Album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub owner: String,
    pub description: String,
    pub release_year: i32,
    pub songs: Vec<SongId>,
    #[serde(default)]
    pub removed: bool,
}

/// Playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Self::Public => Self::Private,
            Self::Private => Self::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub owner: String,
    pub songs: Vec<SongId>,
    /// Usernames of followers, in follow order
    pub followers: Vec<String>,
    pub visibility: Visibility,
    /// Timestamp of the command that created it
    pub created_at: i64,
    /// Unlisted when its owner was deleted
    #[serde(default)]
    pub removed: bool,
}

impl Playlist {
    pub fn new(id: PlaylistId, owner: impl Into<String>, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            name: name.into(),
            owner: owner.into(),
            songs: Vec::new(),
            followers: Vec::new(),
            visibility: Visibility::Public,
            created_at,
            removed: false,
        }
    }

    pub fn is_followed_by(&self, username: &str) -> bool {
        self.followers.iter().any(|f| f == username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_playlist_is_public_and_empty() {
        let playlist = Playlist::new(PlaylistId::new(0), "alice", "road trip", 12);
        assert_eq!(playlist.visibility, Visibility::Public);
        assert!(playlist.songs.is_empty());
        assert!(!playlist.is_followed_by("bob"));
    }

    #[test]
    fn visibility_toggles_both_ways() {
        assert_eq!(Visibility::Public.toggled(), Visibility::Private);
        assert_eq!(Visibility::Private.toggled().as_str(), "public");
    }
}
