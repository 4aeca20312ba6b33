//! Output records, one per replayed command

use crate::command::Command;
use encore_core::{Album, ArtistRevenue, Library, Playlist, Podcast, Wrapped};
use encore_playback::PlaybackStatus;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatusView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
}

impl CommandOutput {
    /// Record for `command`, attributed to its user
    pub fn new(command: &Command) -> Self {
        Self {
            command: command.command.clone(),
            user: Some(command.username.clone()),
            timestamp: Some(command.timestamp),
            message: None,
            results: None,
            stats: None,
            result: None,
        }
    }

    /// Record that belongs to no user
    pub fn global(command: &Command) -> Self {
        Self {
            user: None,
            ..Self::new(command)
        }
    }

    /// Final record carrying the monetization report
    pub fn end_program(report: Vec<ArtistRevenue>) -> Self {
        Self {
            command: "endProgram".to_string(),
            user: None,
            timestamp: None,
            message: None,
            results: None,
            stats: None,
            result: Some(CommandResult::Revenue(RevenueReport(report))),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_results(mut self, results: Vec<String>) -> Self {
        self.results = Some(results);
        self
    }

    #[must_use]
    pub fn with_stats(mut self, status: &PlaybackStatus) -> Self {
        self.stats = Some(StatusView::from(status));
        self
    }

    #[must_use]
    pub fn with_result(mut self, result: CommandResult) -> Self {
        self.result = Some(result);
        self
    }
}

/// Player status as reported by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub name: String,
    #[serde(rename = "remainedTime")]
    pub remaining_time: i64,
    pub repeat: String,
    pub shuffle: bool,
    pub paused: bool,
}

impl From<&PlaybackStatus> for StatusView {
    fn from(status: &PlaybackStatus) -> Self {
        Self {
            name: status.name.clone(),
            remaining_time: status.remaining_time,
            repeat: status.repeat.as_str().to_string(),
            shuffle: status.shuffle,
            paused: status.paused,
        }
    }
}

/// Payload of the `result` field
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Names(Vec<String>),
    Playlists(Vec<PlaylistView>),
    Albums(Vec<AlbumView>),
    Podcasts(Vec<PodcastView>),
    Wrapped(Wrapped),
    Revenue(RevenueReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistView {
    pub name: String,
    pub songs: Vec<String>,
    pub visibility: String,
    pub followers: usize,
}

impl PlaylistView {
    pub fn new(library: &Library, playlist: &Playlist) -> Self {
        Self {
            name: playlist.name.clone(),
            songs: song_names(library, &playlist.songs),
            visibility: playlist.visibility.as_str().to_string(),
            followers: playlist.followers.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumView {
    pub name: String,
    pub songs: Vec<String>,
}

impl AlbumView {
    pub fn new(library: &Library, album: &Album) -> Self {
        Self {
            name: album.name.clone(),
            songs: song_names(library, &album.songs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodcastView {
    pub name: String,
    pub episodes: Vec<String>,
}

impl From<&Podcast> for PodcastView {
    fn from(podcast: &Podcast) -> Self {
        Self {
            name: podcast.name.clone(),
            episodes: podcast.episodes.iter().map(|e| e.name.clone()).collect(),
        }
    }
}

fn song_names(library: &Library, songs: &[encore_core::SongId]) -> Vec<String> {
    songs
        .iter()
        .filter_map(|&id| library.song(id))
        .map(|s| s.name.clone())
        .collect()
}

/// Ranked artists, serialized as an object keyed by artist name in rank order
#[derive(Debug, Clone)]
pub struct RevenueReport(pub Vec<ArtistRevenue>);

impl Serialize for RevenueReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.artist, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{Chart, HostWrapped};
    use encore_playback::RepeatMode;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let command = Command {
            command: "playPause".to_string(),
            username: "alice".to_string(),
            timestamp: 12,
            ..Command::default()
        };
        let output = CommandOutput::new(&command).with_message("Playback paused successfully.");
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "command": "playPause",
                "user": "alice",
                "timestamp": 12,
                "message": "Playback paused successfully."
            })
        );
    }

    #[test]
    fn status_uses_display_names() {
        let status = PlaybackStatus {
            name: "Shine".to_string(),
            remaining_time: 40,
            repeat: RepeatMode::RepeatAll,
            shuffle: true,
            paused: false,
        };
        assert_eq!(
            serde_json::to_value(StatusView::from(&status)).unwrap(),
            json!({
                "name": "Shine",
                "remainedTime": 40,
                "repeat": "Repeat All",
                "shuffle": true,
                "paused": false
            })
        );
    }

    #[test]
    fn report_is_keyed_by_artist_in_rank_order() {
        let report = vec![
            ArtistRevenue {
                artist: "zed".to_string(),
                song_revenue: 10.5,
                merch_revenue: 0.0,
                ranking: 1,
                most_profitable_song: "Z".to_string(),
            },
            ArtistRevenue {
                artist: "abe".to_string(),
                song_revenue: 0.0,
                merch_revenue: 0.0,
                ranking: 2,
                most_profitable_song: "N/A".to_string(),
            },
        ];
        let text = serde_json::to_string(&CommandOutput::end_program(report)).unwrap();
        assert!(text.starts_with(r#"{"command":"endProgram","result":{"zed":{"songRevenue":10.5"#));
        assert!(text.find("\"zed\"") < text.find("\"abe\""));
    }

    #[test]
    fn wrapped_charts_keep_rank_order() {
        let wrapped = Wrapped::Host(HostWrapped {
            top_episodes: Chart(vec![("zeta".to_string(), 4), ("alpha".to_string(), 2)]),
            listeners: 2,
        });
        let command = Command {
            command: "wrapped".to_string(),
            username: "radio".to_string(),
            timestamp: 9,
            ..Command::default()
        };
        let out = CommandOutput::new(&command).with_result(CommandResult::Wrapped(wrapped));
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"command":"wrapped","user":"radio","timestamp":9,"result":{"topEpisodes":{"zeta":4,"alpha":2},"listeners":2}}"#
        );
    }
}
