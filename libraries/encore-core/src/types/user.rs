/// User domain types
///
/// Only listeners hold play state. Artists and hosts own content and a public
/// page that listeners can browse.
use super::ids::{AlbumId, EpisodeRef, PlaylistId, PodcastId, SongId};
use crate::ledger::RevenueLedger;
use crate::navigation::NavigationHistory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Which kind of account a username belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    #[serde(rename = "user")]
    Listener,
    Artist,
    Host,
}

impl UserKind {
    /// Parse the `type` field of an `addUser` command
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::Listener),
            "artist" => Some(Self::Artist),
            "host" => Some(Self::Host),
            _ => None,
        }
    }
}

/// Saved position inside a podcast, restored on the next load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PodcastProgress {
    /// Episode index
    pub episode: usize,
    /// Seconds already played inside that episode
    pub offset: i64,
}

/// Listener account
#[derive(Debug, Clone)]
pub struct Listener {
    pub username: String,
    pub age: u32,
    pub city: String,
    pub online: bool,
    pub premium: bool,
    /// Playlists created by this listener, in creation order
    pub playlists: Vec<PlaylistId>,
    pub liked_songs: Vec<SongId>,
    pub podcast_progress: HashMap<PodcastId, PodcastProgress>,
    pub song_listens: BTreeMap<SongId, i64>,
    pub episode_listens: BTreeMap<EpisodeRef, i64>,
    pub ledger: RevenueLedger,
    pub pages: NavigationHistory,
}

impl Listener {
    pub fn new(username: impl Into<String>, age: u32, city: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            pages: NavigationHistory::new(username.clone()),
            username,
            age,
            city: city.into(),
            online: true,
            premium: false,
            playlists: Vec::new(),
            liked_songs: Vec::new(),
            podcast_progress: HashMap::new(),
            song_listens: BTreeMap::new(),
            episode_listens: BTreeMap::new(),
            ledger: RevenueLedger::default(),
        }
    }

    pub fn likes(&self, song: SongId) -> bool {
        self.liked_songs.contains(&song)
    }

    pub fn song_listens(&self, song: SongId) -> i64 {
        self.song_listens.get(&song).copied().unwrap_or(0)
    }

    pub fn episode_listens(&self, episode: EpisodeRef) -> i64 {
        self.episode_listens.get(&episode).copied().unwrap_or(0)
    }
}

/// Concert or other dated event announced by an artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub description: String,
    /// `dd-mm-yyyy`
    pub date: String,
}

impl Event {
    const MIN_YEAR: i32 = 1900;
    const MAX_YEAR: i32 = 2024;

    /// Check a `dd-mm-yyyy` date: month at most 12, day at most 31 (28 in
    /// February) and a year strictly between 1900 and 2024.
    pub fn is_valid_date(date: &str) -> bool {
        let parts: Vec<&str> = date.split('-').collect();
        let [day, month, year] = parts.as_slice() else {
            return false;
        };
        let (Ok(day), Ok(month), Ok(year)) = (
            day.parse::<u32>(),
            month.parse::<u32>(),
            year.parse::<i32>(),
        ) else {
            return false;
        };

        if month > 12 || day > 31 || (month == 2 && day > 28) {
            return false;
        }
        Self::MIN_YEAR < year && year < Self::MAX_YEAR
    }
}

/// Merchandise item sold on an artist page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merch {
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Host announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub name: String,
    pub description: String,
}

/// Artist account
#[derive(Debug, Clone, Default)]
pub struct Artist {
    pub username: String,
    pub age: u32,
    pub city: String,
    pub albums: Vec<AlbumId>,
    pub events: Vec<Event>,
    pub merch: Vec<Merch>,
    pub merch_revenue: f64,
    /// Song revenue by song name
    pub song_profits: BTreeMap<String, f64>,
    /// Total listens attributed to this artist's songs
    pub plays: i64,
}

impl Artist {
    pub fn new(username: impl Into<String>, age: u32, city: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            age,
            city: city.into(),
            ..Self::default()
        }
    }

    pub fn song_revenue(&self) -> f64 {
        self.song_profits.values().sum()
    }

    /// Best earning song; ties go to the name that sorts first
    pub fn most_profitable_song(&self) -> Option<&str> {
        let mut best: Option<(&String, f64)> = None;
        for (name, &amount) in &self.song_profits {
            if best.map_or(true, |(_, top)| amount > top) {
                best = Some((name, amount));
            }
        }
        best.map(|(name, _)| name.as_str())
    }
}

/// Host account
#[derive(Debug, Clone, Default)]
pub struct Host {
    pub username: String,
    pub age: u32,
    pub city: String,
    pub podcasts: Vec<PodcastId>,
    pub announcements: Vec<Announcement>,
}

impl Host {
    pub fn new(username: impl Into<String>, age: u32, city: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            age,
            city: city.into(),
            ..Self::default()
        }
    }
}
