//! JSON input files
//!
//! The library file seeds the arena; the commands file is the log to replay.

use crate::command::Command;
use crate::error::{CliError, Result};
use encore_core::{Episode, Library, NewSong, UserKind};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    pub name: String,
    pub duration: u32,
    pub album: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lyrics: String,
    pub genre: String,
    pub release_year: i32,
    pub artist: String,
}

impl SongInput {
    pub fn into_new_song(self) -> NewSong {
        NewSong {
            name: self.name,
            duration: self.duration,
            album: self.album,
            artist: self.artist,
            genre: self.genre,
            tags: self.tags,
            lyrics: self.lyrics,
            release_year: self.release_year,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    pub name: String,
    pub duration: u32,
    #[serde(default)]
    pub description: String,
}

impl From<EpisodeInput> for Episode {
    fn from(input: EpisodeInput) -> Self {
        Episode::new(input.name, input.duration, input.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodcastInput {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub episodes: Vec<EpisodeInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub age: u32,
    pub city: String,
}

/// Contents of the library file; every seeded user is a listener
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibraryInput {
    pub songs: Vec<SongInput>,
    pub podcasts: Vec<PodcastInput>,
    pub users: Vec<UserInput>,
}

impl LibraryInput {
    pub fn into_library(self) -> Result<Library> {
        let mut library = Library::new();
        for user in self.users {
            library.add_user(user.username, user.age, user.city, UserKind::Listener)?;
        }
        for song in self.songs {
            library.insert_song(song.into_new_song());
        }
        for podcast in self.podcasts {
            let episodes = podcast.episodes.into_iter().map(Episode::from).collect();
            library.insert_podcast(podcast.owner, podcast.name, episodes);
        }
        debug!(
            songs = library.songs().count(),
            podcasts = library.podcasts().count(),
            listeners = library.listeners().len(),
            "Library seeded"
        );
        Ok(library)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| CliError::Input(format!("cannot open {}: {e}", path.display())))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn read_library(path: &Path) -> Result<LibraryInput> {
    read_json(path)
}

pub fn read_commands(path: &Path) -> Result<Vec<Command>> {
    read_json(path)
}
