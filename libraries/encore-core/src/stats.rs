//! Library charts and per-user wrapped summaries
use crate::error::{EncoreError, Result};
use crate::library::{Library, UserSlot};
use crate::types::{Album, Artist, Host, Listener};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

const CHART_SIZE: usize = 5;

/// Ranked names with their listen counts, serialized as an ordered map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chart(pub Vec<(String, i64)>);

impl Chart {
    /// Top entries by count, highest first, ties by name
    fn rank(counts: HashMap<String, i64>) -> Self {
        let mut entries: Vec<_> = counts.into_iter().filter(|&(_, n)| n > 0).collect();
        entries.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));
        entries.truncate(CHART_SIZE);
        Self(entries)
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Serialize for Chart {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

fn tally(counts: &mut HashMap<String, i64>, key: &str, listens: i64) {
    *counts.entry(key.to_string()).or_insert(0) += listens;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerWrapped {
    pub top_artists: Chart,
    pub top_genres: Chart,
    pub top_songs: Chart,
    pub top_albums: Chart,
    pub top_episodes: Chart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistWrapped {
    pub top_albums: Chart,
    pub top_songs: Chart,
    pub top_fans: Vec<String>,
    pub listeners: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostWrapped {
    pub top_episodes: Chart,
    pub listeners: usize,
}

/// Year-in-review summary, shaped by the kind of account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Wrapped {
    Listener(ListenerWrapped),
    Artist(ArtistWrapped),
    Host(HostWrapped),
}

impl Library {
    /// Most liked songs; equally liked songs keep library order
    pub fn top_songs(&self) -> Vec<String> {
        let mut songs: Vec<_> = self.songs().collect();
        songs.sort_by(|a, b| b.likes.cmp(&a.likes));
        songs
            .into_iter()
            .take(CHART_SIZE)
            .map(|s| s.name.clone())
            .collect()
    }

    /// Most followed playlists; ties go to the one created first
    pub fn top_playlists(&self) -> Vec<String> {
        let mut playlists: Vec<_> = self.playlists().collect();
        playlists.sort_by(|a, b| {
            b.followers
                .len()
                .cmp(&a.followers.len())
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        playlists
            .into_iter()
            .take(CHART_SIZE)
            .map(|p| p.name.clone())
            .collect()
    }

    fn album_likes(&self, album: &Album) -> u64 {
        album
            .songs
            .iter()
            .filter_map(|&id| self.song(id))
            .map(|s| u64::from(s.likes))
            .sum()
    }

    /// Albums with the most likes over their songs; ties by name
    pub fn top_albums(&self) -> Vec<String> {
        let mut albums: Vec<_> = self
            .albums()
            .map(|album| (album, self.album_likes(album)))
            .collect();
        albums.sort_by(|(a, a_likes), (b, b_likes)| {
            b_likes.cmp(a_likes).then_with(|| a.name.cmp(&b.name))
        });
        albums
            .into_iter()
            .take(CHART_SIZE)
            .map(|(album, _)| album.name.clone())
            .collect()
    }

    /// Artists with the most likes over all their albums; ties keep
    /// registration order
    pub fn top_artists(&self) -> Vec<String> {
        let mut artists: Vec<_> = self
            .artists()
            .iter()
            .map(|artist| {
                let likes: u64 = artist
                    .albums
                    .iter()
                    .filter_map(|&id| self.album(id))
                    .map(|album| self.album_likes(album))
                    .sum();
                (artist, likes)
            })
            .collect();
        artists.sort_by(|(_, a), (_, b)| b.cmp(a));
        artists
            .into_iter()
            .take(CHART_SIZE)
            .map(|(artist, _)| artist.username.clone())
            .collect()
    }

    /// Summary for `wrapped`
    ///
    /// Callers settle players first so that the song under each play head is
    /// counted.
    pub fn wrapped(&self, username: &str) -> Result<Wrapped> {
        match self.users.get(username) {
            None => Err(EncoreError::user_not_found(username)),
            Some(UserSlot::Listener(index)) => self.listener_wrapped(&self.listeners[*index]),
            Some(UserSlot::Artist(index)) => self.artist_wrapped(&self.artists[*index]),
            Some(UserSlot::Host(index)) => self.host_wrapped(&self.hosts[*index]),
        }
    }

    fn listener_wrapped(&self, listener: &Listener) -> Result<Wrapped> {
        let mut artists = HashMap::new();
        let mut genres = HashMap::new();
        let mut songs = HashMap::new();
        let mut albums = HashMap::new();
        for (&id, &listens) in &listener.song_listens {
            let Some(song) = self.song(id).filter(|_| listens > 0) else {
                continue;
            };
            tally(&mut artists, &song.artist, listens);
            tally(&mut genres, &song.genre, listens);
            tally(&mut songs, &song.name, listens);
            tally(&mut albums, &song.album, listens);
        }

        let mut episodes = HashMap::new();
        for (&episode, &listens) in &listener.episode_listens {
            if let Some(episode) = self.episode(episode).filter(|_| listens > 0) {
                tally(&mut episodes, &episode.name, listens);
            }
        }

        if songs.is_empty() && episodes.is_empty() {
            return Err(EncoreError::NoWrappedData {
                role: "user",
                username: listener.username.clone(),
            });
        }
        Ok(Wrapped::Listener(ListenerWrapped {
            top_artists: Chart::rank(artists),
            top_genres: Chart::rank(genres),
            top_songs: Chart::rank(songs),
            top_albums: Chart::rank(albums),
            top_episodes: Chart::rank(episodes),
        }))
    }

    fn artist_wrapped(&self, artist: &Artist) -> Result<Wrapped> {
        let mut albums = HashMap::new();
        let mut songs = HashMap::new();
        let mut fans = HashMap::new();
        for listener in &self.listeners {
            for (&id, &listens) in &listener.song_listens {
                let Some(song) = self
                    .song(id)
                    .filter(|s| listens > 0 && s.artist == artist.username)
                else {
                    continue;
                };
                tally(&mut albums, &song.album, listens);
                tally(&mut songs, &song.name, listens);
                tally(&mut fans, &listener.username, listens);
            }
        }

        if artist.albums.is_empty() || fans.is_empty() {
            return Err(EncoreError::NoWrappedData {
                role: "artist",
                username: artist.username.clone(),
            });
        }
        let listeners = fans.len();
        let top_fans = Chart::rank(fans)
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(Wrapped::Artist(ArtistWrapped {
            top_albums: Chart::rank(albums),
            top_songs: Chart::rank(songs),
            top_fans,
            listeners,
        }))
    }

    fn host_wrapped(&self, host: &Host) -> Result<Wrapped> {
        let mut episodes = HashMap::new();
        let mut listeners = 0;
        for listener in &self.listeners {
            let mut listened = false;
            for (&episode, &listens) in &listener.episode_listens {
                let owned = self
                    .podcast(episode.podcast)
                    .is_some_and(|p| p.owner == host.username);
                let Some(episode) = self.episode(episode).filter(|_| owned && listens > 0) else {
                    continue;
                };
                tally(&mut episodes, &episode.name, listens);
                listened = true;
            }
            if listened {
                listeners += 1;
            }
        }

        if host.podcasts.is_empty() || listeners == 0 {
            return Err(EncoreError::NoWrappedData {
                role: "host",
                username: host.username.clone(),
            });
        }
        Ok(Wrapped::Host(HostWrapped {
            top_episodes: Chart::rank(episodes),
            listeners,
        }))
    }
}
