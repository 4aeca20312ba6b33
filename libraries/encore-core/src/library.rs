//! The library arena
//!
//! Owns every song, collection, podcast and user of a run. Content is only
//! ever appended, so ids handed out stay valid for the whole run. Removing
//! content flags it as removed: it drops out of every listing but still
//! resolves by id for listen history and payouts.

use crate::error::{EncoreError, Result};
use crate::navigation::PageKind;
use crate::types::{
    Album, AlbumId, Announcement, Artist, Episode, EpisodeRef, Event, Host, Listener, Merch,
    NewSong, PlayableRef, PlayingFile, Playlist, PlaylistId, Podcast, PodcastId,
    PodcastProgress, Song, SongId, UserKind, Visibility,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

/// Result of toggling a song in a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistEdit {
    Added,
    Removed,
}

/// Result of toggling a playlist follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    Unfollowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserSlot {
    Listener(usize),
    Artist(usize),
    Host(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    pub(crate) songs: Vec<Song>,
    pub(crate) albums: Vec<Album>,
    pub(crate) playlists: Vec<Playlist>,
    pub(crate) podcasts: Vec<Podcast>,
    pub(crate) listeners: Vec<Listener>,
    pub(crate) artists: Vec<Artist>,
    pub(crate) hosts: Vec<Host>,
    pub(crate) users: HashMap<String, UserSlot>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Seeding =====

    /// Add a song that belongs to no album of a registered artist
    pub fn insert_song(&mut self, song: NewSong) -> SongId {
        let id = SongId::new(self.songs.len());
        self.songs.push(song.into_song(id));
        id
    }

    /// Add a podcast, attaching it to its host when the host is registered
    pub fn insert_podcast(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        episodes: Vec<Episode>,
    ) -> PodcastId {
        let id = PodcastId::new(self.podcasts.len());
        let owner = owner.into();
        if let Some(UserSlot::Host(index)) = self.users.get(&owner) {
            self.hosts[*index].podcasts.push(id);
        }
        self.podcasts.push(Podcast {
            id,
            name: name.into(),
            owner,
            episodes,
            removed: false,
        });
        id
    }

    // ===== Lookups =====

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.get(id.index())
    }

    /// Songs still listed, in insertion order
    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter().filter(|song| !song.removed)
    }

    pub fn find_song_by_name(&self, name: &str) -> Option<&Song> {
        self.songs().find(|song| song.name == name)
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.get(id.index())
    }

    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.iter().filter(|album| !album.removed)
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id.index())
    }

    pub fn playlists(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.iter().filter(|playlist| !playlist.removed)
    }

    pub fn podcast(&self, id: PodcastId) -> Option<&Podcast> {
        self.podcasts.get(id.index())
    }

    pub fn podcasts(&self) -> impl Iterator<Item = &Podcast> {
        self.podcasts.iter().filter(|podcast| !podcast.removed)
    }

    pub fn listener(&self, username: &str) -> Option<&Listener> {
        match self.users.get(username) {
            Some(UserSlot::Listener(index)) => self.listeners.get(*index),
            _ => None,
        }
    }

    pub fn listener_mut(&mut self, username: &str) -> Option<&mut Listener> {
        match self.users.get(username) {
            Some(UserSlot::Listener(index)) => self.listeners.get_mut(*index),
            _ => None,
        }
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn artist(&self, username: &str) -> Option<&Artist> {
        match self.users.get(username) {
            Some(UserSlot::Artist(index)) => self.artists.get(*index),
            _ => None,
        }
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn host(&self, username: &str) -> Option<&Host> {
        match self.users.get(username) {
            Some(UserSlot::Host(index)) => self.hosts.get(*index),
            _ => None,
        }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn user_kind(&self, username: &str) -> Option<UserKind> {
        self.users.get(username).map(|slot| match slot {
            UserSlot::Listener(_) => UserKind::Listener,
            UserSlot::Artist(_) => UserKind::Artist,
            UserSlot::Host(_) => UserKind::Host,
        })
    }

    pub fn is_listener(&self, username: &str) -> bool {
        matches!(self.users.get(username), Some(UserSlot::Listener(_)))
    }

    /// Listener by name, distinguishing unknown users from other account kinds
    pub fn require_listener_mut(&mut self, username: &str) -> Result<&mut Listener> {
        match self.users.get(username) {
            None => Err(EncoreError::user_not_found(username)),
            Some(UserSlot::Listener(index)) => Ok(&mut self.listeners[*index]),
            Some(_) => Err(EncoreError::NotAListener(username.to_string())),
        }
    }

    /// All usernames: listeners, then artists, then hosts
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.listeners
            .iter()
            .map(|l| l.username.as_str())
            .chain(self.artists.iter().map(|a| a.username.as_str()))
            .chain(self.hosts.iter().map(|h| h.username.as_str()))
    }

    /// Songs of an album or playlist, in play order
    pub fn collection_songs(&self, item: PlayableRef) -> Option<&[SongId]> {
        match item {
            PlayableRef::Album(id) => self.album(id).map(|a| a.songs.as_slice()),
            PlayableRef::Playlist(id) => self.playlist(id).map(|p| p.songs.as_slice()),
            _ => None,
        }
    }

    pub fn episode(&self, episode: EpisodeRef) -> Option<&Episode> {
        self.podcast(episode.podcast)
            .and_then(|p| p.episodes.get(episode.index))
    }

    /// Display name of a song or episode
    pub fn file_name(&self, file: PlayingFile) -> Option<&str> {
        match file {
            PlayingFile::Song(id) => self.song(id).map(|s| s.name.as_str()),
            PlayingFile::Episode(episode) => self.episode(episode).map(|e| e.name.as_str()),
            PlayingFile::AdBreak => None,
        }
    }

    /// Whether `username` owns the item or, for playlists, any song on it
    pub fn is_owned_by(&self, item: PlayableRef, username: &str) -> bool {
        match item {
            PlayableRef::Song(id) => self.song(id).is_some_and(|s| s.artist == username),
            PlayableRef::Podcast(id) => self.podcast(id).is_some_and(|p| p.owner == username),
            PlayableRef::Album(id) => self.album(id).is_some_and(|a| a.owner == username),
            PlayableRef::Playlist(id) => self.playlist(id).is_some_and(|p| {
                p.owner == username
                    || p.songs
                        .iter()
                        .any(|&s| self.song(s).is_some_and(|song| song.artist == username))
            }),
            PlayableRef::AdBreak => false,
        }
    }

    // ===== Listens and revenue =====

    /// Attribute `listens` plays of `song` to `listener` (negative retracts)
    pub fn add_song_listens(&mut self, listener: &str, song: SongId, listens: i64) {
        let Some(entry) = self.songs.get(song.index()) else {
            return;
        };
        if let Some(UserSlot::Artist(index)) = self.users.get(&entry.artist) {
            self.artists[*index].plays += listens;
        }
        if let Some(UserSlot::Listener(index)) = self.users.get(listener) {
            let listener = &mut self.listeners[*index];
            let premium = listener.premium;
            listener.ledger.record(premium, song, listens);
            *listener.song_listens.entry(song).or_insert(0) += listens;
        }
    }

    pub fn add_episode_listens(&mut self, listener: &str, episode: EpisodeRef, listens: i64) {
        if let Some(listener) = self.listener_mut(listener) {
            *listener.episode_listens.entry(episode).or_insert(0) += listens;
        }
    }

    /// Pay the listener's pending revenue out to the artists of the songs
    /// in the active bucket
    pub fn split_money(&mut self, listener: &str) {
        let Some(UserSlot::Listener(index)) = self.users.get(listener) else {
            return;
        };
        let listener = &mut self.listeners[*index];
        let premium = listener.premium;
        let payouts = listener.ledger.drain(premium);
        debug!(listener = %listener.username, premium, songs = payouts.len(), "Splitting revenue");

        for (song, amount) in payouts {
            let Some(song) = self.songs.get(song.index()) else {
                continue;
            };
            if let Some(UserSlot::Artist(index)) = self.users.get(&song.artist) {
                *self.artists[*index]
                    .song_profits
                    .entry(song.name.clone())
                    .or_insert(0.0) += amount;
            }
        }
    }

    pub fn podcast_progress(&self, listener: &str, podcast: PodcastId) -> Option<PodcastProgress> {
        self.listener(listener)
            .and_then(|l| l.podcast_progress.get(&podcast).copied())
    }

    pub fn save_podcast_progress(
        &mut self,
        listener: &str,
        podcast: PodcastId,
        progress: PodcastProgress,
    ) {
        if let Some(listener) = self.listener_mut(listener) {
            listener.podcast_progress.insert(podcast, progress);
        }
    }

    pub fn clear_podcast_progress(&mut self, listener: &str, podcast: PodcastId) {
        if let Some(listener) = self.listener_mut(listener) {
            listener.podcast_progress.remove(&podcast);
        }
    }

    // ===== Accounts and content =====

    pub fn add_user(
        &mut self,
        username: impl Into<String>,
        age: u32,
        city: impl Into<String>,
        kind: UserKind,
    ) -> Result<()> {
        let username = username.into();
        if self.users.contains_key(&username) {
            return Err(EncoreError::UsernameTaken(username));
        }
        let slot = match kind {
            UserKind::Listener => {
                self.listeners
                    .push(Listener::new(username.clone(), age, city));
                UserSlot::Listener(self.listeners.len() - 1)
            }
            UserKind::Artist => {
                self.artists.push(Artist::new(username.clone(), age, city));
                UserSlot::Artist(self.artists.len() - 1)
            }
            UserKind::Host => {
                self.hosts.push(Host::new(username.clone(), age, city));
                UserSlot::Host(self.hosts.len() - 1)
            }
        };
        debug!(%username, ?kind, "Added user");
        self.users.insert(username, slot);
        Ok(())
    }

    pub(crate) fn artist_index(&self, username: &str) -> Result<usize> {
        match self.users.get(username) {
            None => Err(EncoreError::user_not_found(username)),
            Some(UserSlot::Artist(index)) => Ok(*index),
            Some(_) => Err(EncoreError::NotAnArtist(username.to_string())),
        }
    }

    pub(crate) fn host_index(&self, username: &str) -> Result<usize> {
        match self.users.get(username) {
            None => Err(EncoreError::user_not_found(username)),
            Some(UserSlot::Host(index)) => Ok(*index),
            Some(_) => Err(EncoreError::NotAHost(username.to_string())),
        }
    }

    pub fn add_album(
        &mut self,
        artist: &str,
        name: impl Into<String>,
        release_year: i32,
        description: impl Into<String>,
        songs: Vec<NewSong>,
    ) -> Result<AlbumId> {
        let index = self.artist_index(artist)?;
        let name = name.into();
        let owned = &self.artists[index].albums;
        if owned
            .iter()
            .any(|&id| self.album(id).is_some_and(|a| a.name == name))
        {
            return Err(EncoreError::DuplicateAlbum(artist.to_string()));
        }
        let mut seen = HashSet::new();
        if !songs.iter().all(|song| seen.insert(song.name.as_str())) {
            return Err(EncoreError::DuplicateSongInAlbum(artist.to_string()));
        }

        let song_ids = songs.into_iter().map(|song| self.insert_song(song)).collect();
        let id = AlbumId::new(self.albums.len());
        self.albums.push(Album {
            id,
            name,
            owner: artist.to_string(),
            description: description.into(),
            release_year,
            songs: song_ids,
            removed: false,
        });
        self.artists[index].albums.push(id);
        Ok(id)
    }

    pub fn add_podcast(
        &mut self,
        host: &str,
        name: impl Into<String>,
        episodes: Vec<Episode>,
    ) -> Result<PodcastId> {
        let index = self.host_index(host)?;
        let name = name.into();
        if self.hosts[index]
            .podcasts
            .iter()
            .any(|&id| self.podcast(id).is_some_and(|p| p.name == name))
        {
            return Err(EncoreError::DuplicatePodcast(host.to_string()));
        }
        let mut seen = HashSet::new();
        if !episodes.iter().all(|e| seen.insert(e.name.as_str())) {
            return Err(EncoreError::DuplicateEpisode(host.to_string()));
        }
        Ok(self.insert_podcast(host, name, episodes))
    }

    pub fn add_event(
        &mut self,
        artist: &str,
        name: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<()> {
        let index = self.artist_index(artist)?;
        let (name, date) = (name.into(), date.into());
        let owner = &mut self.artists[index];
        if owner.events.iter().any(|e| e.name == name) {
            return Err(EncoreError::DuplicateEvent(artist.to_string()));
        }
        if !Event::is_valid_date(&date) {
            return Err(EncoreError::InvalidEventDate(artist.to_string()));
        }
        owner.events.push(Event {
            name,
            description: description.into(),
            date,
        });
        Ok(())
    }

    pub fn add_merch(
        &mut self,
        artist: &str,
        name: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Result<()> {
        let index = self.artist_index(artist)?;
        let name = name.into();
        let owner = &mut self.artists[index];
        if owner.merch.iter().any(|m| m.name == name) {
            return Err(EncoreError::DuplicateMerch(artist.to_string()));
        }
        if price < 0 {
            return Err(EncoreError::NegativeMerchPrice);
        }
        owner.merch.push(Merch {
            name,
            description: description.into(),
            price,
        });
        Ok(())
    }

    pub fn add_announcement(
        &mut self,
        host: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let index = self.host_index(host)?;
        let name = name.into();
        let owner = &mut self.hosts[index];
        if owner.announcements.iter().any(|a| a.name == name) {
            return Err(EncoreError::DuplicateAnnouncement(host.to_string()));
        }
        owner.announcements.push(Announcement {
            name,
            description: description.into(),
        });
        Ok(())
    }

    // ===== Playlists, likes, follows =====

    pub fn create_playlist(
        &mut self,
        listener: &str,
        name: impl Into<String>,
        timestamp: i64,
    ) -> Result<PlaylistId> {
        let name = name.into();
        let id = PlaylistId::new(self.playlists.len());
        let playlists = &self.playlists;
        let owner = match self.users.get(listener) {
            Some(UserSlot::Listener(index)) => &mut self.listeners[*index],
            _ => return Err(EncoreError::user_not_found(listener)),
        };
        if owner
            .playlists
            .iter()
            .any(|p| playlists.get(p.index()).is_some_and(|p| p.name == name))
        {
            return Err(EncoreError::DuplicatePlaylist);
        }
        owner.playlists.push(id);
        self.playlists
            .push(Playlist::new(id, listener, name, timestamp));
        Ok(id)
    }

    /// The listener's own playlist by its 1-based position
    pub fn own_playlist(&self, listener: &str, number: usize) -> Option<PlaylistId> {
        let listener = self.listener(listener)?;
        number
            .checked_sub(1)
            .and_then(|i| listener.playlists.get(i))
            .copied()
    }

    /// Add `song` to the listener's playlist `number` (1-based), or remove it
    /// when already present
    pub fn add_remove_in_playlist(
        &mut self,
        listener: &str,
        number: usize,
        song: SongId,
    ) -> Result<PlaylistEdit> {
        let id = self
            .own_playlist(listener, number)
            .ok_or(EncoreError::PlaylistNotFound)?;
        let playlist = &mut self.playlists[id.index()];
        if let Some(position) = playlist.songs.iter().position(|&s| s == song) {
            playlist.songs.remove(position);
            Ok(PlaylistEdit::Removed)
        } else {
            playlist.songs.push(song);
            Ok(PlaylistEdit::Added)
        }
    }

    pub fn switch_visibility(&mut self, listener: &str, number: usize) -> Result<Visibility> {
        let id = self
            .own_playlist(listener, number)
            .ok_or(EncoreError::PlaylistIdTooHigh)?;
        let playlist = &mut self.playlists[id.index()];
        playlist.visibility = playlist.visibility.toggled();
        Ok(playlist.visibility)
    }

    pub fn like(&mut self, listener: &str, song: SongId) -> Result<LikeOutcome> {
        let Some(entry) = self.songs.get_mut(song.index()) else {
            return Err(EncoreError::not_found("Song", song.to_string()));
        };
        let listener = match self.users.get(listener) {
            Some(UserSlot::Listener(index)) => &mut self.listeners[*index],
            _ => return Err(EncoreError::user_not_found(listener)),
        };
        if let Some(position) = listener.liked_songs.iter().position(|&s| s == song) {
            listener.liked_songs.remove(position);
            entry.likes = entry.likes.saturating_sub(1);
            Ok(LikeOutcome::Unliked)
        } else {
            listener.liked_songs.push(song);
            entry.likes += 1;
            Ok(LikeOutcome::Liked)
        }
    }

    pub fn follow(&mut self, listener: &str, playlist: PlaylistId) -> Result<FollowOutcome> {
        if !self.is_listener(listener) {
            return Err(EncoreError::user_not_found(listener));
        }
        let Some(entry) = self.playlists.get_mut(playlist.index()) else {
            return Err(EncoreError::PlaylistNotFound);
        };
        if entry.owner == listener {
            return Err(EncoreError::OwnPlaylist);
        }
        if let Some(position) = entry.followers.iter().position(|f| f == listener) {
            entry.followers.remove(position);
            Ok(FollowOutcome::Unfollowed)
        } else {
            entry.followers.push(listener.to_string());
            Ok(FollowOutcome::Followed)
        }
    }

    /// Playlists followed by the listener, in creation order
    pub fn followed_playlists<'a>(&'a self, listener: &'a str) -> impl Iterator<Item = &'a Playlist> {
        self.playlists()
            .filter(move |p| p.is_followed_by(listener))
    }

    // ===== Purchases =====

    /// Buy merch from the artist whose page the listener is browsing
    pub fn buy_merch(&mut self, listener: &str, merch: &str) -> Result<()> {
        let page = self
            .listener(listener)
            .ok_or_else(|| EncoreError::user_not_found(listener))?
            .pages
            .current()
            .clone();
        if page.kind() != PageKind::Artist {
            return Err(EncoreError::NotOnArtistPage);
        }
        let index = self.artist_index(page.owner())?;
        let artist = &mut self.artists[index];
        let price = artist
            .merch
            .iter()
            .find(|m| m.name == merch)
            .map(|m| m.price)
            .ok_or_else(|| EncoreError::MerchNotFound(merch.to_string()))?;
        artist.merch_revenue += price as f64;
        Ok(())
    }

    /// Flush ad-supported listens, then switch to premium at `revenue`
    pub fn buy_premium(&mut self, listener: &str, revenue: f64) -> Result<()> {
        let entry = self.require_listener_mut(listener)?;
        if entry.premium {
            return Err(EncoreError::AlreadyPremium(listener.to_string()));
        }
        self.split_money(listener);
        let entry = self.require_listener_mut(listener)?;
        entry.premium = true;
        entry.ledger.set_pending_revenue(revenue);
        Ok(())
    }

    /// Flush premium listens, then return to the ad-supported tier
    pub fn cancel_premium(&mut self, listener: &str) -> Result<()> {
        let entry = self.require_listener_mut(listener)?;
        if !entry.premium {
            return Err(EncoreError::NotPremium(listener.to_string()));
        }
        self.split_money(listener);
        let entry = self.require_listener_mut(listener)?;
        entry.premium = false;
        entry.ledger.set_pending_revenue(0.0);
        Ok(())
    }
}
