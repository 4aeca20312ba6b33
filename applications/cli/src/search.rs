//! Search bar
//!
//! A search fills the bar with up to [`MAX_RESULTS`] matches; `select` picks
//! one of them and `load`/`follow` consume the selection.

use crate::error::{CliError, Result};
use encore_core::{Album, Library, PlayableRef, Playlist, Podcast, Song, Visibility};
use serde::Deserialize;
use tracing::debug;

pub const MAX_RESULTS: usize = 5;

/// Search filters; unset filters match everything
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub name: Option<String>,
    pub album: Option<String>,
    pub tags: Option<Vec<String>>,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
    /// Exact year, or `<year` / `>year`
    pub release_year: Option<String>,
    pub artist: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Song,
    Album,
    Playlist,
    Podcast,
    Artist,
    Host,
}

impl SearchType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "song" => Some(Self::Song),
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            "podcast" => Some(Self::Podcast),
            "artist" => Some(Self::Artist),
            "host" => Some(Self::Host),
            _ => None,
        }
    }
}

/// Something a search can return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Searchable {
    Item(PlayableRef),
    Artist(String),
    Host(String),
}

impl Searchable {
    pub fn is_playable(&self) -> bool {
        matches!(self, Searchable::Item(_))
    }
}

/// Parsed `releaseYear` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearFilter {
    Before(i32),
    After(i32),
    Exactly(i32),
}

impl YearFilter {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(year) = value.strip_prefix('<') {
            year.trim().parse().ok().map(Self::Before)
        } else if let Some(year) = value.strip_prefix('>') {
            year.trim().parse().ok().map(Self::After)
        } else {
            value.parse().ok().map(Self::Exactly)
        }
    }

    fn matches(self, year: i32) -> bool {
        match self {
            Self::Before(bound) => year < bound,
            Self::After(bound) => year > bound,
            Self::Exactly(bound) => year == bound,
        }
    }
}

impl Filters {
    fn matches_song(&self, song: &Song) -> bool {
        if let Some(name) = &self.name {
            if !song.name.to_lowercase().starts_with(&name.to_lowercase()) {
                return false;
            }
        }
        if self.album.as_ref().is_some_and(|album| song.album != *album) {
            return false;
        }
        if self.artist.as_ref().is_some_and(|artist| song.artist != *artist) {
            return false;
        }
        if self
            .genre
            .as_ref()
            .is_some_and(|genre| !song.genre.eq_ignore_ascii_case(genre))
        {
            return false;
        }
        if let Some(tags) = &self.tags {
            if !tags.iter().all(|tag| song.tags.contains(tag)) {
                return false;
            }
        }
        if let Some(lyrics) = &self.lyrics {
            if !song.lyrics.to_lowercase().contains(&lyrics.to_lowercase()) {
                return false;
            }
        }
        match self.release_year.as_deref() {
            // an unparseable year matches nothing
            Some(year) => YearFilter::parse(year).is_some_and(|f| f.matches(song.release_year)),
            None => true,
        }
    }

    fn matches_album(&self, album: &Album) -> bool {
        let prefix = |filter: &Option<String>, value: &str| {
            filter.as_ref().map_or(true, |f| value.starts_with(f.as_str()))
        };
        prefix(&self.name, &album.name)
            && prefix(&self.owner, &album.owner)
            && prefix(&self.description, &album.description)
    }

    fn matches_playlist(&self, playlist: &Playlist) -> bool {
        self.name
            .as_ref()
            .map_or(true, |name| playlist.name.starts_with(name.as_str()))
            && self.owner.as_ref().map_or(true, |owner| playlist.owner == *owner)
    }

    fn matches_podcast(&self, podcast: &Podcast) -> bool {
        self.name
            .as_ref()
            .map_or(true, |name| podcast.name.starts_with(name.as_str()))
            && self.owner.as_ref().map_or(true, |owner| podcast.owner == *owner)
    }

    fn matches_username(&self, username: &str) -> bool {
        self.name
            .as_ref()
            .map_or(true, |name| username.starts_with(name.as_str()))
    }
}

/// One listener's search state
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    results: Option<Vec<(String, Searchable)>>,
    selection: Option<Searchable>,
}

impl SearchBar {
    /// Run a fresh search, dropping earlier results and any selection;
    /// returns the matched names
    pub fn search(
        &mut self,
        library: &Library,
        username: &str,
        kind: Option<SearchType>,
        filters: &Filters,
    ) -> Vec<String> {
        let results = kind.map_or_else(Vec::new, |kind| Self::find(library, username, kind, filters));
        debug!(user = username, ?kind, found = results.len(), "Search");
        let names = results.iter().map(|(name, _)| name.clone()).collect();
        self.results = Some(results);
        self.selection = None;
        names
    }

    fn find(
        library: &Library,
        username: &str,
        kind: SearchType,
        filters: &Filters,
    ) -> Vec<(String, Searchable)> {
        let item = |item: PlayableRef, name: &str| (name.to_string(), Searchable::Item(item));
        match kind {
            SearchType::Song => library
                .songs()
                .filter(|s| filters.matches_song(s))
                .map(|s| item(PlayableRef::Song(s.id), &s.name))
                .take(MAX_RESULTS)
                .collect(),
            SearchType::Album => library
                .albums()
                .filter(|a| filters.matches_album(a))
                .map(|a| item(PlayableRef::Album(a.id), &a.name))
                .take(MAX_RESULTS)
                .collect(),
            SearchType::Podcast => library
                .podcasts()
                .filter(|p| filters.matches_podcast(p))
                .map(|p| item(PlayableRef::Podcast(p.id), &p.name))
                .take(MAX_RESULTS)
                .collect(),
            SearchType::Playlist => {
                // own playlists first, then other listeners' public ones
                let own = library
                    .listener(username)
                    .map(|l| l.playlists.clone())
                    .unwrap_or_default();
                let others = library
                    .listeners()
                    .iter()
                    .filter(|l| l.username != username)
                    .flat_map(|l| l.playlists.iter().copied())
                    .filter(|&id| {
                        library
                            .playlist(id)
                            .is_some_and(|p| p.visibility == Visibility::Public)
                    });
                own.into_iter()
                    .chain(others)
                    .filter_map(|id| library.playlist(id))
                    .filter(|p| filters.matches_playlist(p))
                    .map(|p| item(PlayableRef::Playlist(p.id), &p.name))
                    .take(MAX_RESULTS)
                    .collect()
            }
            SearchType::Artist => library
                .artists()
                .iter()
                .filter(|a| filters.matches_username(&a.username))
                .map(|a| (a.username.clone(), Searchable::Artist(a.username.clone())))
                .take(MAX_RESULTS)
                .collect(),
            SearchType::Host => library
                .hosts()
                .iter()
                .filter(|h| filters.matches_username(&h.username))
                .map(|h| (h.username.clone(), Searchable::Host(h.username.clone())))
                .take(MAX_RESULTS)
                .collect(),
        }
    }

    /// Pick result `item_number` (1-based); returns its name
    pub fn select(&mut self, item_number: i64) -> Result<String> {
        let Some(results) = self.results.as_mut() else {
            return Err(CliError::rejected(
                "Please conduct a search before making a selection.",
            ));
        };
        let index = usize::try_from(item_number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < results.len())
            .ok_or_else(|| CliError::rejected("The selected ID is too high."))?;

        let (name, selection) = results.swap_remove(index);
        self.results = None;
        self.selection = Some(selection);
        Ok(name)
    }

    pub fn selection(&self) -> Option<&Searchable> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }
}
