//! Core domain types
pub mod audio;
pub mod ids;
pub mod playable;
pub mod user;

pub use audio::{Album, Episode, NewSong, Playlist, Podcast, Song, Visibility};
pub use ids::{AlbumId, EpisodeRef, PlaylistId, PodcastId, SongId};
pub use playable::{PlayableRef, PlayingFile};
pub use user::{
    Announcement, Artist, Event, Host, Listener, Merch, PodcastProgress, UserKind,
};
