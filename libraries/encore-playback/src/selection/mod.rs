//! Track selection
//!
//! One routine per item kind. Each takes the player's elapsed time and modes,
//! credits every file it walks past, and settles on the file under the play
//! head.

mod ad_break;
mod collection;
mod podcast;
mod single;

use crate::player::AudioPlayer;
use encore_core::{Library, PlayableRef, PlayingFile};

/// Outcome of one selection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    /// This file is under the play head
    Playing(PlayingFile),
    /// The item ran out
    Ended,
    /// The loaded item was swapped (ad spliced in or restored); select again
    Reselect,
}

impl AudioPlayer {
    pub(crate) fn select(&mut self, library: &mut Library, item: PlayableRef) -> Selection {
        match item {
            PlayableRef::Song(id) => self.select_single(library, id),
            PlayableRef::Album(_) | PlayableRef::Playlist(_) => {
                self.select_in_collection(library, item)
            }
            PlayableRef::Podcast(id) => self.select_episode(library, id),
            PlayableRef::AdBreak => self.select_ad_break(library),
        }
    }

    /// Attribute `listens` plays of `file` to this player's listener
    pub(crate) fn credit(&self, library: &mut Library, file: PlayingFile, listens: i64) {
        match file {
            PlayingFile::Song(id) => library.add_song_listens(&self.username, id, listens),
            PlayingFile::Episode(episode) => {
                library.add_episode_listens(&self.username, episode, listens);
            }
            PlayingFile::AdBreak => {}
        }
    }

    /// Put `file` under the play head with `duration - elapsed` seconds left
    pub(crate) fn settle(&mut self, name: &str, duration: i64, file: PlayingFile) -> Selection {
        if self.status.name != name {
            tracing::debug!(user = %self.username, track = name, "Track boundary");
            self.status.name = name.to_string();
        }
        self.status.remaining_time = duration - self.elapsed;
        Selection::Playing(file)
    }
}
