//! Replayed commands
//!
//! A command record carries `command`, `username` and `timestamp` plus
//! whatever fields its kind needs; absent fields deserialize to their
//! defaults.

use crate::input::{EpisodeInput, SongInput};
use crate::search::Filters;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Command {
    pub command: String,
    pub username: String,
    pub timestamp: i64,

    /// Search type for `search`, user type for `addUser`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub filters: Filters,
    pub item_number: i64,
    pub playlist_name: Option<String>,
    pub playlist_id: i64,
    pub seed: i64,
    pub age: u32,
    pub city: Option<String>,
    pub name: Option<String>,
    pub release_year: Option<Year>,
    pub description: Option<String>,
    pub songs: Vec<SongInput>,
    pub date: Option<String>,
    pub price: i64,
    pub episodes: Vec<EpisodeInput>,
    pub next_page: Option<String>,
}

/// A year given either as a number or as a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i32),
    Text(String),
}

impl Year {
    pub fn value(&self) -> Option<i32> {
        match self {
            Year::Number(year) => Some(*year),
            Year::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    // Search and playback
    Search,
    Select,
    Load,
    PlayPause,
    Status,
    Repeat,
    Shuffle,
    Forward,
    Backward,
    Next,
    Prev,
    SwitchConnectionStatus,
    AdBreak,

    // Playlists and likes
    CreatePlaylist,
    AddRemoveInPlaylist,
    SwitchVisibility,
    ShowPlaylists,
    Like,
    ShowPreferredSongs,
    Follow,

    // Accounts and content
    AddUser,
    AddAlbum,
    ShowAlbums,
    AddPodcast,
    ShowPodcasts,
    AddEvent,
    AddMerch,
    AddAnnouncement,
    GetAllUsers,
    GetOnlineUsers,
    RemoveAlbum,
    RemovePodcast,
    RemoveEvent,
    RemoveAnnouncement,
    DeleteUser,

    // Statistics
    GetTop5Songs,
    GetTop5Playlists,
    GetTop5Albums,
    GetTop5Artists,
    Wrapped,

    // Pages
    ChangePage,
    PreviousPage,
    NextPage,
    PrintCurrentPage,

    // Monetization
    BuyMerch,
    BuyPremium,
    CancelPremium,
}

impl CommandKind {
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            "search" => Self::Search,
            "select" => Self::Select,
            "load" => Self::Load,
            "playPause" => Self::PlayPause,
            "status" => Self::Status,
            "repeat" => Self::Repeat,
            "shuffle" => Self::Shuffle,
            "forward" => Self::Forward,
            "backward" => Self::Backward,
            "next" => Self::Next,
            "prev" => Self::Prev,
            "switchConnectionStatus" => Self::SwitchConnectionStatus,
            "adBreak" => Self::AdBreak,
            "createPlaylist" => Self::CreatePlaylist,
            "addRemoveInPlaylist" => Self::AddRemoveInPlaylist,
            "switchVisibility" => Self::SwitchVisibility,
            "showPlaylists" => Self::ShowPlaylists,
            "like" => Self::Like,
            "showPreferredSongs" => Self::ShowPreferredSongs,
            "follow" => Self::Follow,
            "addUser" => Self::AddUser,
            "addAlbum" => Self::AddAlbum,
            "showAlbums" => Self::ShowAlbums,
            "addPodcast" => Self::AddPodcast,
            "showPodcasts" => Self::ShowPodcasts,
            "addEvent" => Self::AddEvent,
            "addMerch" => Self::AddMerch,
            "addAnnouncement" => Self::AddAnnouncement,
            "getAllUsers" => Self::GetAllUsers,
            "getOnlineUsers" => Self::GetOnlineUsers,
            "removeAlbum" => Self::RemoveAlbum,
            "removePodcast" => Self::RemovePodcast,
            "removeEvent" => Self::RemoveEvent,
            "removeAnnouncement" => Self::RemoveAnnouncement,
            "deleteUser" => Self::DeleteUser,
            "getTop5Songs" => Self::GetTop5Songs,
            "getTop5Playlists" => Self::GetTop5Playlists,
            "getTop5Albums" => Self::GetTop5Albums,
            "getTop5Artists" => Self::GetTop5Artists,
            "wrapped" => Self::Wrapped,
            "changePage" => Self::ChangePage,
            "previousPage" => Self::PreviousPage,
            "nextPage" => Self::NextPage,
            "printCurrentPage" => Self::PrintCurrentPage,
            "buyMerch" => Self::BuyMerch,
            "buyPremium" => Self::BuyPremium,
            "cancelPremium" => Self::CancelPremium,
            _ => return None,
        };
        Some(kind)
    }

    /// Commands whose output record has no `user` field
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Self::GetAllUsers
                | Self::GetOnlineUsers
                | Self::GetTop5Songs
                | Self::GetTop5Playlists
                | Self::GetTop5Albums
                | Self::GetTop5Artists
        )
    }
}

impl Command {
    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::parse(&self.command)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}
