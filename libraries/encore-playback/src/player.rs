//! Per-listener player
//!
//! The player keeps no clock. Each command passes its timestamp, and
//! [`AudioPlayer::resolve`] replays the time since the previous command
//! against the loaded item before the command itself is applied.

use crate::error::{PlaybackError, Result};
use crate::memento::AdBreakMemento;
use crate::selection::Selection;
use crate::shuffle;
use crate::status::PlaybackStatus;
use crate::types::{PlayerConfig, RepeatMode};
use encore_core::{EncoreError, Library, PlayableRef, PlayingFile, SongId, UserKind};
use tracing::{debug, warn};

/// Player state for one username
#[derive(Debug, Clone)]
pub struct AudioPlayer {
    pub(crate) username: String,
    pub(crate) config: PlayerConfig,
    pub(crate) status: PlaybackStatus,
    pub(crate) current_item: Option<PlayableRef>,
    pub(crate) current_file: Option<PlayingFile>,
    /// Timestamp up to which `elapsed` has been accounted
    pub(crate) play_timestamp: i64,
    /// Seconds into the current file once resolved
    pub(crate) elapsed: i64,
    /// Unshuffled song index, or episode index for podcasts
    pub(crate) track_id: usize,
    pub(crate) shuffle_seed: u64,
    pub(crate) ad_break_pending: bool,
    pub(crate) ad_memento: Option<AdBreakMemento>,
    /// Listen credited to the file under the play head, retracted and
    /// re-credited on the next resolve
    pub(crate) provisional_listen: Option<PlayingFile>,
}

impl AudioPlayer {
    pub fn new(username: impl Into<String>, config: PlayerConfig) -> Self {
        Self {
            username: username.into(),
            config,
            status: PlaybackStatus::empty(),
            current_item: None,
            current_file: None,
            play_timestamp: 0,
            elapsed: 0,
            track_id: 0,
            shuffle_seed: 0,
            ad_break_pending: false,
            ad_memento: None,
            provisional_listen: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn current_item(&self) -> Option<PlayableRef> {
        self.current_item
    }

    /// File resolved by the most recent command
    pub fn current_file(&self) -> Option<PlayingFile> {
        self.current_file
    }

    /// Status as of the most recent command, without resolving
    pub fn last_status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn is_ad_break_pending(&self) -> bool {
        self.ad_break_pending
    }

    pub fn has_ad_memento(&self) -> bool {
        self.ad_memento.is_some()
    }

    /// Items this player still plays: the loaded one and, during an ad, the
    /// one it resumes afterwards
    pub fn loaded_items(&self) -> impl Iterator<Item = PlayableRef> + '_ {
        self.current_item
            .into_iter()
            .chain(self.ad_memento.as_ref().and_then(AdBreakMemento::item))
            .filter(|&item| item != PlayableRef::AdBreak)
    }

    fn ensure_listener(&self, library: &Library) -> Result<()> {
        match library.user_kind(&self.username) {
            Some(UserKind::Listener) => Ok(()),
            Some(_) => Err(EncoreError::NotAListener(self.username.clone()).into()),
            None => Err(EncoreError::user_not_found(self.username.as_str()).into()),
        }
    }

    // ===== Resolution =====

    /// Bring the player up to `timestamp` and return the file under the play head
    ///
    /// Time only advances while unpaused and online. Resolving twice at the
    /// same timestamp changes neither the status nor any listen count.
    pub fn resolve(&mut self, library: &mut Library, timestamp: i64) -> Option<PlayingFile> {
        let online = library.listener(&self.username)?.online;
        let Some(mut item) = self.current_item else {
            self.status.clear();
            self.current_file = None;
            return None;
        };

        if !self.status.paused && online {
            self.elapsed += timestamp - self.play_timestamp;
            self.play_timestamp = timestamp;
        }
        self.elapsed = self.elapsed.max(0);
        if let Some(file) = self.provisional_listen.take() {
            self.credit(library, file, -1);
        }

        let file = loop {
            match self.select(library, item) {
                Selection::Playing(file) => break Some(file),
                Selection::Ended => break None,
                Selection::Reselect => match self.current_item {
                    Some(next) => item = next,
                    None => break None,
                },
            }
        };

        match file {
            Some(file) => self.provisional_listen = file.is_creditable().then_some(file),
            None => self.stop(),
        }
        self.current_file = file;
        file
    }

    /// Resolve and return a copy of the status
    pub fn status(&mut self, library: &mut Library, timestamp: i64) -> PlaybackStatus {
        self.resolve(library, timestamp);
        self.status.clone()
    }

    /// Unload everything, keeping listens credited so far
    fn stop(&mut self) {
        if self.current_item.is_some() {
            debug!(user = %self.username, "Playback ended");
        }
        self.provisional_listen = None;
        self.current_item = None;
        self.current_file = None;
        self.status.clear();
        self.elapsed = 0;
        self.track_id = 0;
        self.ad_break_pending = false;
        self.ad_memento = None;
    }

    /// Resolve up to `timestamp`, then unload
    pub fn clear(&mut self, library: &mut Library, timestamp: i64) {
        self.resolve(library, timestamp);
        self.stop();
    }

    // ===== Commands =====

    /// Load `item` from the start, or from saved progress for podcasts
    pub fn load(&mut self, library: &mut Library, item: PlayableRef, timestamp: i64) -> Result<()> {
        self.ensure_listener(library)?;
        if !library.is_listed(item) {
            return Err(PlaybackError::NoSelection);
        }
        let empty = match item {
            PlayableRef::Album(_) | PlayableRef::Playlist(_) => {
                library.collection_songs(item).map_or(true, <[SongId]>::is_empty)
            }
            PlayableRef::Podcast(id) => library.podcast(id).map_or(true, |p| p.episodes.is_empty()),
            PlayableRef::Song(id) => library.song(id).is_none(),
            PlayableRef::AdBreak => return Err(PlaybackError::NoSelection),
        };
        if empty {
            return Err(PlaybackError::EmptyCollection);
        }

        self.resolve(library, timestamp);
        self.stop();
        self.status = PlaybackStatus::loaded();
        self.current_item = Some(item);
        self.play_timestamp = timestamp;
        if let PlayableRef::Podcast(id) = item {
            if let Some(progress) = library.podcast_progress(&self.username, id) {
                self.track_id = progress.episode;
                self.elapsed = progress.offset;
            }
        }
        debug!(user = %self.username, ?item, track = self.track_id, "Loaded");
        Ok(())
    }

    /// Toggle pause; returns `true` when now paused
    pub fn play_pause(&mut self, library: &mut Library, timestamp: i64) -> Result<bool> {
        self.resolve(library, timestamp);
        if self.current_item.is_none() {
            return Err(PlaybackError::NothingToPause);
        }
        if self.status.paused {
            self.resume(timestamp);
        } else {
            self.status.paused = true;
        }
        Ok(self.status.paused)
    }

    fn resume(&mut self, timestamp: i64) {
        self.status.paused = false;
        self.play_timestamp = timestamp;
    }

    /// Advance to the next repeat mode for the loaded item kind
    pub fn repeat(&mut self, library: &mut Library, timestamp: i64) -> Result<RepeatMode> {
        self.resolve(library, timestamp);
        let item = self.current_item.ok_or(PlaybackError::NothingToRepeat)?;
        self.status.repeat = self.status.repeat.next(item.is_collection());
        Ok(self.status.repeat)
    }

    /// Toggle shuffle; `seed` fixes the order when turning it on. Returns
    /// `true` when now shuffled.
    pub fn shuffle(&mut self, library: &mut Library, timestamp: i64, seed: u64) -> Result<bool> {
        self.resolve(library, timestamp);
        let item = self.current_item.ok_or(PlaybackError::NothingToShuffle)?;
        if !item.can_be_shuffled() {
            return Err(PlaybackError::NotShuffleable);
        }
        self.status.shuffle = !self.status.shuffle;
        if self.status.shuffle {
            self.shuffle_seed = seed;
        }
        Ok(self.status.shuffle)
    }

    /// Skip ahead inside a podcast, never past the current episode's end
    pub fn forward(&mut self, library: &mut Library, timestamp: i64) -> Result<()> {
        self.resolve(library, timestamp);
        let item = self.current_item.ok_or(PlaybackError::NothingToForward)?;
        if !item.allows_forward_backward() {
            return Err(PlaybackError::NotAPodcast);
        }
        let step = i64::from(self.config.forward_step);
        self.elapsed += self.status.remaining_time.min(step);
        self.resolve(library, timestamp);
        Ok(())
    }

    /// Rewind inside a podcast, never before the current episode's start
    pub fn backward(&mut self, library: &mut Library, timestamp: i64) -> Result<()> {
        self.resolve(library, timestamp)
            .ok_or(PlaybackError::NothingToRewind)?;
        if !self.current_item.is_some_and(PlayableRef::allows_forward_backward) {
            return Err(PlaybackError::NotAPodcast);
        }
        let step = i64::from(self.config.backward_step);
        self.elapsed -= self.elapsed.min(step);
        self.resolve(library, timestamp);
        Ok(())
    }

    /// Jump to the start of the next file; returns its name
    pub fn next(&mut self, library: &mut Library, timestamp: i64) -> Result<String> {
        self.resolve(library, timestamp)
            .ok_or(PlaybackError::NothingToSkip)?;
        self.elapsed += self.status.remaining_time;
        self.resolve(library, timestamp)
            .ok_or(PlaybackError::NothingToSkip)?;
        if self.status.paused {
            self.resume(timestamp);
        }
        Ok(self.status.name.clone())
    }

    /// Restart the current file, or go to the previous one when already at
    /// its start; returns the resulting file's name
    pub fn prev(&mut self, library: &mut Library, timestamp: i64) -> Result<String> {
        self.resolve(library, timestamp)
            .ok_or(PlaybackError::NothingToReturnTo)?;
        if self.elapsed > 0 {
            self.elapsed = 0;
        } else {
            self.step_back(library);
        }
        self.resolve(library, timestamp)
            .ok_or(PlaybackError::NothingToReturnTo)?;
        if self.status.paused {
            self.resume(timestamp);
        }
        Ok(self.status.name.clone())
    }

    /// Move the cursor one track back in play order, staying on the first
    fn step_back(&mut self, library: &Library) {
        let previous = match self.current_item {
            Some(item @ (PlayableRef::Album(_) | PlayableRef::Playlist(_))) => {
                let len = library.collection_songs(item).map_or(0, <[SongId]>::len);
                let order =
                    shuffle::play_order(len, self.status.shuffle.then_some(self.shuffle_seed));
                shuffle::slot_of(&order, self.track_id)
                    .and_then(|slot| slot.checked_sub(1))
                    .map(|slot| order[slot])
            }
            Some(PlayableRef::Podcast(_)) => self.track_id.checked_sub(1),
            _ => None,
        };
        if let Some(track) = previous {
            // the track being left keeps its listen
            self.provisional_listen = None;
            self.track_id = track;
        }
        self.elapsed = 0;
    }

    /// Arm an ad break for the next track boundary; `price` is paid out to
    /// the artists listened to since the last payout once the ad has played
    pub fn ad_break(&mut self, library: &mut Library, timestamp: i64, price: f64) -> Result<()> {
        let file = self.resolve(library, timestamp);
        self.ensure_listener(library)?;
        if file.is_none() {
            return Err(PlaybackError::NotPlaying(self.username.clone()));
        }
        if self.ad_break_pending {
            warn!(user = %self.username, "Ad break already scheduled");
            return Err(PlaybackError::AdBreakAlreadyScheduled(self.username.clone()));
        }
        if let Some(listener) = library.listener_mut(&self.username) {
            listener.ledger.set_pending_revenue(price);
        }
        self.ad_break_pending = true;
        debug!(user = %self.username, price, "Ad break scheduled");
        Ok(())
    }

    /// Toggle online/offline; returns `true` when now online
    pub fn switch_connection_status(&mut self, library: &mut Library, timestamp: i64) -> Result<bool> {
        self.resolve(library, timestamp);
        let listener = library.require_listener_mut(&self.username)?;
        listener.online = !listener.online;
        if listener.online {
            self.play_timestamp = timestamp;
        }
        Ok(listener.online)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{Episode, NewSong, PodcastId};

    fn song(name: &str, duration: u32) -> NewSong {
        NewSong {
            name: name.into(),
            duration,
            album: "LP".into(),
            artist: "band".into(),
            genre: "rock".into(),
            tags: vec![],
            lyrics: String::new(),
            release_year: 2000,
        }
    }

    fn library() -> Library {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        library.add_user("band", 30, "Cluj", UserKind::Artist).unwrap();
        library
    }

    fn podcast(library: &mut Library) -> PodcastId {
        library.insert_podcast(
            "radio",
            "Talk",
            vec![Episode::new("ep1", 300, "a"), Episode::new("ep2", 200, "b")],
        )
    }

    #[test]
    fn new_player_is_empty() {
        let mut library = library();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(player.resolve(&mut library, 10), None);
        assert!(player.status(&mut library, 10).is_empty());
        assert_eq!(player.play_pause(&mut library, 10), Err(PlaybackError::NothingToPause));
    }

    #[test]
    fn non_listeners_cannot_load() {
        let mut library = library();
        let id = library.insert_song(song("x", 10));
        let mut player = AudioPlayer::new("band", PlayerConfig::default());
        let err = player.load(&mut library, PlayableRef::Song(id), 0).unwrap_err();
        assert_eq!(err.to_string(), "band is not a normal user.");
    }

    #[test]
    fn empty_collections_are_rejected() {
        let mut library = library();
        let playlist = library.create_playlist("alice", "empty", 0).unwrap();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(
            player.load(&mut library, PlayableRef::Playlist(playlist), 0),
            Err(PlaybackError::EmptyCollection)
        );
    }

    #[test]
    fn pause_freezes_time() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();

        assert_eq!(player.play_pause(&mut library, 10), Ok(true));
        assert_eq!(player.status(&mut library, 60).remaining_time, 90);
        assert_eq!(player.play_pause(&mut library, 60), Ok(false));
        assert_eq!(player.status(&mut library, 70).remaining_time, 80);
    }

    #[test]
    fn offline_freezes_time() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();

        assert_eq!(player.switch_connection_status(&mut library, 20), Ok(false));
        assert_eq!(player.status(&mut library, 50).remaining_time, 80);
        assert_eq!(player.switch_connection_status(&mut library, 50), Ok(true));
        assert_eq!(player.status(&mut library, 55).remaining_time, 75);
    }

    #[test]
    fn connection_status_needs_a_listener() {
        let mut library = library();
        let mut ghost = AudioPlayer::new("ghost", PlayerConfig::default());
        assert_eq!(
            ghost.switch_connection_status(&mut library, 0).unwrap_err().to_string(),
            "The username ghost doesn't exist."
        );
        let mut band = AudioPlayer::new("band", PlayerConfig::default());
        assert_eq!(
            band.switch_connection_status(&mut library, 0).unwrap_err().to_string(),
            "band is not a normal user."
        );
    }

    #[test]
    fn shuffle_only_for_collections() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(
            player.shuffle(&mut library, 0, 1),
            Err(PlaybackError::NothingToShuffle)
        );
        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();
        assert_eq!(
            player.shuffle(&mut library, 0, 1),
            Err(PlaybackError::NotShuffleable)
        );
    }

    #[test]
    fn forward_and_backward_inside_podcast() {
        let mut library = library();
        let id = podcast(&mut library);
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Podcast(id), 0).unwrap();

        player.forward(&mut library, 10).unwrap();
        assert_eq!(player.status(&mut library, 10).remaining_time, 200);
        player.backward(&mut library, 10).unwrap();
        assert_eq!(player.status(&mut library, 10).remaining_time, 290);
        player.backward(&mut library, 10).unwrap();
        assert_eq!(player.status(&mut library, 10).remaining_time, 300);

        // forwarding near the end lands on the next episode's start
        player.forward(&mut library, 250).unwrap();
        let status = player.status(&mut library, 250);
        assert_eq!(status.name, "ep2");
        assert_eq!(status.remaining_time, 200);
    }

    #[test]
    fn forward_rejects_songs() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();
        assert_eq!(player.forward(&mut library, 1), Err(PlaybackError::NotAPodcast));
        assert_eq!(player.backward(&mut library, 1), Err(PlaybackError::NotAPodcast));
    }

    #[test]
    fn next_unpauses_and_reports_new_track() {
        let mut library = library();
        let album = library
            .add_album("band", "LP", 2000, "", vec![song("a", 30), song("b", 40)])
            .unwrap();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Album(album), 0).unwrap();
        player.play_pause(&mut library, 5).unwrap();

        assert_eq!(player.next(&mut library, 8).unwrap(), "b");
        assert!(!player.last_status().paused);
        assert_eq!(player.status(&mut library, 18).remaining_time, 30);
        assert_eq!(player.next(&mut library, 18), Err(PlaybackError::NothingToSkip));
    }

    #[test]
    fn prev_restarts_then_steps_back() {
        let mut library = library();
        let album = library
            .add_album("band", "LP", 2000, "", vec![song("a", 30), song("b", 40)])
            .unwrap();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Album(album), 0).unwrap();

        assert_eq!(player.prev(&mut library, 35).unwrap(), "b");
        assert_eq!(player.last_status().remaining_time, 40);
        assert_eq!(player.prev(&mut library, 35).unwrap(), "a");
        assert_eq!(player.last_status().remaining_time, 30);
        assert_eq!(player.prev(&mut library, 35).unwrap(), "a");

        let (a, b) = {
            let songs = &library.album(album).unwrap().songs;
            (songs[0], songs[1])
        };
        let alice = library.listener("alice").unwrap();
        assert_eq!(alice.song_listens(a), 2);
        assert_eq!(alice.song_listens(b), 1);
    }

    #[test]
    fn ad_break_preconditions() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(
            player.ad_break(&mut library, 0, 5.0),
            Err(PlaybackError::NotPlaying("alice".into()))
        );
        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();
        player.ad_break(&mut library, 1, 5.0).unwrap();
        assert_eq!(
            player.ad_break(&mut library, 2, 5.0),
            Err(PlaybackError::AdBreakAlreadyScheduled("alice".into()))
        );
        assert_eq!(
            library.listener("alice").unwrap().ledger.pending_revenue(),
            5.0
        );

        player.load(&mut library, PlayableRef::Song(id), 3).unwrap();
        assert!(!player.is_ad_break_pending());
    }

    #[test]
    fn removed_content_cannot_be_loaded() {
        let mut library = library();
        let album = library
            .add_album("band", "LP", 2000, "", vec![song("x", 10)])
            .unwrap();
        library.remove_album("band", "LP", &[]).unwrap();

        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(
            player.load(&mut library, PlayableRef::Album(album), 0),
            Err(PlaybackError::NoSelection)
        );
        assert_eq!(player.current_item(), None);
    }

    #[test]
    fn loaded_items_include_the_item_behind_an_ad() {
        let mut library = library();
        let id = library.insert_song(song("x", 100));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        assert_eq!(player.loaded_items().count(), 0);

        player.load(&mut library, PlayableRef::Song(id), 0).unwrap();
        player.repeat(&mut library, 0).unwrap();
        player.ad_break(&mut library, 0, 5.0).unwrap();
        assert_eq!(player.loaded_items().collect::<Vec<_>>(), vec![PlayableRef::Song(id)]);

        player.resolve(&mut library, 100);
        assert_eq!(player.current_item(), Some(PlayableRef::AdBreak));
        assert_eq!(player.loaded_items().collect::<Vec<_>>(), vec![PlayableRef::Song(id)]);
    }
}
