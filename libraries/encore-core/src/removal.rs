//! Content and account removal
//!
//! Every removal takes `loaded`, the items currently loaded across all
//! players (including items waiting behind an ad break), and is refused
//! while any of them would lose content.
use crate::error::{EncoreError, Result};
use crate::library::{Library, UserSlot};
use crate::types::{AlbumId, PlayableRef, PodcastId, SongId, UserKind};
use tracing::{debug, info};

impl Library {
    /// Whether `item` would play any song of `album`
    pub fn plays_from_album(&self, item: PlayableRef, album: AlbumId) -> bool {
        let Some(album) = self.album(album) else {
            return false;
        };
        match item {
            PlayableRef::Song(id) => album.songs.contains(&id),
            PlayableRef::Album(_) | PlayableRef::Playlist(_) => self
                .collection_songs(item)
                .is_some_and(|songs| songs.iter().any(|id| album.songs.contains(id))),
            PlayableRef::Podcast(_) | PlayableRef::AdBreak => false,
        }
    }

    /// Whether `item` is still listed in the library
    pub fn is_listed(&self, item: PlayableRef) -> bool {
        match item {
            PlayableRef::Song(id) => self.song(id).is_some_and(|s| !s.removed),
            PlayableRef::Album(id) => self.album(id).is_some_and(|a| !a.removed),
            PlayableRef::Playlist(id) => self.playlist(id).is_some_and(|p| !p.removed),
            PlayableRef::Podcast(id) => self.podcast(id).is_some_and(|p| !p.removed),
            PlayableRef::AdBreak => true,
        }
    }

    pub fn remove_album(&mut self, artist: &str, name: &str, loaded: &[PlayableRef]) -> Result<()> {
        let index = self.artist_index(artist)?;
        let id = self.artists[index]
            .albums
            .iter()
            .copied()
            .find(|&id| self.album(id).is_some_and(|a| a.name == name))
            .ok_or_else(|| EncoreError::AlbumNotFound(artist.to_string()))?;
        if loaded.iter().any(|&item| self.plays_from_album(item, id)) {
            return Err(EncoreError::AlbumInUse(artist.to_string()));
        }

        self.artists[index].albums.retain(|&album| album != id);
        let album = &mut self.albums[id.index()];
        album.removed = true;
        let songs = album.songs.clone();
        self.unlist_songs(&songs);
        debug!(artist, album = name, songs = songs.len(), "Removed album");
        Ok(())
    }

    pub fn remove_podcast(&mut self, host: &str, name: &str, loaded: &[PlayableRef]) -> Result<()> {
        let index = self.host_index(host)?;
        let id = self.hosts[index]
            .podcasts
            .iter()
            .copied()
            .find(|&id| self.podcast(id).is_some_and(|p| p.name == name))
            .ok_or_else(|| EncoreError::PodcastNotFound(host.to_string()))?;
        if loaded.contains(&PlayableRef::Podcast(id)) {
            return Err(EncoreError::PodcastInUse(host.to_string()));
        }

        self.hosts[index].podcasts.retain(|&podcast| podcast != id);
        self.unlist_podcasts(&[id]);
        debug!(host, podcast = name, "Removed podcast");
        Ok(())
    }

    pub fn remove_event(&mut self, artist: &str, name: &str) -> Result<()> {
        let index = self.artist_index(artist)?;
        let events = &mut self.artists[index].events;
        let position = events
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| EncoreError::EventNotFound(artist.to_string()))?;
        events.remove(position);
        Ok(())
    }

    pub fn remove_announcement(&mut self, host: &str, name: &str) -> Result<()> {
        let index = self.host_index(host)?;
        let announcements = &mut self.hosts[index].announcements;
        let position = announcements
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| EncoreError::AnnouncementNotFound(host.to_string()))?;
        announcements.remove(position);
        Ok(())
    }

    /// Delete an account along with everything it owns
    ///
    /// A listener is refused while one of their playlists is loaded. An artist
    /// or host is refused while a loaded item is owned by them, or while a
    /// listener is browsing their page.
    pub fn delete_user(&mut self, username: &str, loaded: &[PlayableRef]) -> Result<UserKind> {
        let slot = *self
            .users
            .get(username)
            .ok_or_else(|| EncoreError::user_not_found(username))?;

        let in_use = match slot {
            UserSlot::Listener(_) => loaded.iter().any(|&item| match item {
                PlayableRef::Playlist(id) => self.playlist(id).is_some_and(|p| p.owner == username),
                _ => false,
            }),
            UserSlot::Artist(_) | UserSlot::Host(_) => {
                loaded.iter().any(|&item| self.is_owned_by(item, username))
                    || self
                        .listeners
                        .iter()
                        .any(|l| l.pages.current().owner() == username)
            }
        };
        if in_use {
            return Err(EncoreError::UserInUse(username.to_string()));
        }

        let kind = match slot {
            UserSlot::Listener(index) => {
                self.drop_listener_content(index);
                self.listeners.remove(index);
                UserKind::Listener
            }
            UserSlot::Artist(index) => {
                for &id in &self.artists[index].albums {
                    self.albums[id.index()].removed = true;
                }
                let songs: Vec<SongId> = self
                    .songs()
                    .filter(|s| s.artist == username)
                    .map(|s| s.id)
                    .collect();
                self.unlist_songs(&songs);
                self.artists.remove(index);
                UserKind::Artist
            }
            UserSlot::Host(index) => {
                let podcasts: Vec<PodcastId> = self
                    .podcasts()
                    .filter(|p| p.owner == username)
                    .map(|p| p.id)
                    .collect();
                self.unlist_podcasts(&podcasts);
                self.hosts.remove(index);
                UserKind::Host
            }
        };

        self.users.remove(username);
        self.shift_user_slots(slot);
        info!(username, ?kind, "Deleted user");
        Ok(kind)
    }

    /// Unlist the listener's playlists and withdraw their likes and follows
    fn drop_listener_content(&mut self, index: usize) {
        let listener = &self.listeners[index];
        for &id in &listener.playlists {
            self.playlists[id.index()].removed = true;
        }
        for &id in &listener.liked_songs {
            if let Some(song) = self.songs.get_mut(id.index()) {
                song.likes = song.likes.saturating_sub(1);
            }
        }
        let username = listener.username.clone();
        for playlist in &mut self.playlists {
            playlist.followers.retain(|f| *f != username);
        }
    }

    /// Flag `songs` as removed and take them out of playlists and likes
    fn unlist_songs(&mut self, songs: &[SongId]) {
        for &id in songs {
            if let Some(song) = self.songs.get_mut(id.index()) {
                song.removed = true;
            }
        }
        for playlist in &mut self.playlists {
            playlist.songs.retain(|id| !songs.contains(id));
        }
        for listener in &mut self.listeners {
            listener.liked_songs.retain(|id| !songs.contains(id));
        }
    }

    /// Flag `podcasts` as removed and forget saved progress in them
    fn unlist_podcasts(&mut self, podcasts: &[PodcastId]) {
        for &id in podcasts {
            if let Some(podcast) = self.podcasts.get_mut(id.index()) {
                podcast.removed = true;
            }
        }
        for listener in &mut self.listeners {
            listener
                .podcast_progress
                .retain(|id, _| !podcasts.contains(id));
        }
    }

    /// Close the gap left in the per-kind user table by `removed`
    fn shift_user_slots(&mut self, removed: UserSlot) {
        for slot in self.users.values_mut() {
            match (slot, removed) {
                (UserSlot::Listener(index), UserSlot::Listener(gap))
                | (UserSlot::Artist(index), UserSlot::Artist(gap))
                | (UserSlot::Host(index), UserSlot::Host(gap))
                    if *index > gap =>
                {
                    *index -= 1;
                }
                _ => {}
            }
        }
    }
}
