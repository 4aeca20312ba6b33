//! Encore - Playback Resolution
//!
//! Nothing here runs on a clock. Every command carries a timestamp, and the
//! [`AudioPlayer`] recomputes what is playing from the time elapsed since the
//! item was loaded.
//!
//! This crate provides:
//! - Lazy status resolution with exactly-once listen attribution
//! - Track selection for single songs, albums/playlists and podcasts
//! - Repeat modes (two three-state cycles) and seeded, reproducible shuffle
//! - Ad breaks spliced in at track boundaries and undone via a memento
//! - Player commands: load, play/pause, repeat, shuffle, seek, next/prev
//!
//! # Architecture
//!
//! Players never own audio items. They hold ids into the
//! [`encore_core::Library`], which is passed in by `&mut` reference on every
//! call. Listen counts and revenue side effects land in the library.
//!
//! # Example
//!
//! ```rust
//! use encore_core::{Library, NewSong, PlayableRef, UserKind};
//! use encore_playback::{AudioPlayer, PlayerConfig};
//!
//! let mut library = Library::new();
//! library.add_user("alice", 21, "Iasi", UserKind::Listener).unwrap();
//! let song = library.insert_song(NewSong {
//!     name: "Intro".into(),
//!     duration: 120,
//!     album: "Debut".into(),
//!     artist: "band".into(),
//!     genre: "rock".into(),
//!     tags: vec![],
//!     lyrics: String::new(),
//!     release_year: 2020,
//! });
//!
//! let mut player = AudioPlayer::new("alice", PlayerConfig::default());
//! player.load(&mut library, PlayableRef::Song(song), 0).unwrap();
//!
//! let status = player.status(&mut library, 30);
//! assert_eq!(status.name, "Intro");
//! assert_eq!(status.remaining_time, 90);
//! ```

pub mod error;
pub mod memento;
pub mod player;
mod selection;
pub mod shuffle;
pub mod status;
pub mod types;

pub use error::{PlaybackError, Result};
pub use memento::AdBreakMemento;
pub use player::AudioPlayer;
pub use status::PlaybackStatus;
pub use types::{PlayerConfig, RepeatMode, AD_BREAK_NAME};
