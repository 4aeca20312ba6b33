//! Command replay session
//!
//! The session owns the [`Library`] and one [`PlayerSlot`] per listener that
//! has issued a command. Every command is turned into exactly one
//! [`CommandOutput`]; rejected commands carry the rejection as their message
//! and never stop the replay.

use crate::command::{Command, CommandKind};
use crate::config::EncoreConfig;
use crate::error::{CliError, Result};
use crate::output::{AlbumView, CommandOutput, CommandResult, PlaylistView, PodcastView};
use crate::search::{SearchBar, SearchType, Searchable};
use encore_core::{
    EncoreError, Episode, FollowOutcome, LikeOutcome, Library, Page, PageKind, PlayableRef,
    PlayingFile, PlaylistEdit, SongId, UserKind,
};
use encore_playback::{AudioPlayer, PlaybackError, PlayerConfig, RepeatMode};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A listener's player and search bar
#[derive(Debug)]
pub struct PlayerSlot {
    pub player: AudioPlayer,
    pub search: SearchBar,
}

impl PlayerSlot {
    fn new(username: &str, config: PlayerConfig) -> Self {
        Self {
            player: AudioPlayer::new(username, config),
            search: SearchBar::default(),
        }
    }
}

pub struct Session {
    library: Library,
    players: HashMap<String, PlayerSlot>,
    player_config: PlayerConfig,
    premium_revenue: f64,
    last_timestamp: i64,
}

/// The listener's slot, created on first use
fn player_slot<'a>(
    players: &'a mut HashMap<String, PlayerSlot>,
    library: &Library,
    config: &PlayerConfig,
    username: &str,
) -> Result<&'a mut PlayerSlot> {
    match library.user_kind(username) {
        Some(UserKind::Listener) => Ok(players
            .entry(username.to_string())
            .or_insert_with(|| PlayerSlot::new(username, config.clone()))),
        Some(_) => Err(EncoreError::NotAListener(username.to_string()).into()),
        None => Err(EncoreError::user_not_found(username).into()),
    }
}

fn number(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn repeat_message(mode: RepeatMode) -> String {
    format!("Repeat mode changed to {}.", mode.as_str().to_lowercase())
}

impl Session {
    pub fn new(library: Library, config: &EncoreConfig) -> Self {
        Self {
            library,
            players: HashMap::new(),
            player_config: config.player_config(),
            premium_revenue: config.playback.premium_revenue,
            last_timestamp: 0,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn player(&self, username: &str) -> Option<&AudioPlayer> {
        self.players.get(username).map(|slot| &slot.player)
    }

    /// Replay `commands` in order, then append the `endProgram` record
    pub fn replay(&mut self, commands: &[Command]) -> Vec<CommandOutput> {
        let mut outputs: Vec<_> = commands
            .iter()
            .filter_map(|command| self.execute(command))
            .collect();
        outputs.push(self.finish());
        outputs
    }

    /// Run one command; unknown commands produce no record
    pub fn execute(&mut self, command: &Command) -> Option<CommandOutput> {
        self.last_timestamp = command.timestamp;
        let Some(kind) = command.kind() else {
            warn!(command = %command.command, user = %command.username, "Unknown command");
            return None;
        };

        let base = if kind.is_global() {
            CommandOutput::global(command)
        } else {
            CommandOutput::new(command)
        };
        match self.dispatch(kind, command, base.clone()) {
            Ok(output) => Some(output),
            Err(err) => {
                debug!(?kind, user = %command.username, %err, "Command rejected");
                Some(base.with_message(err.to_string()))
            }
        }
    }

    /// Settle every player at the last timestamp, flush the ledgers and
    /// build the monetization report
    pub fn finish(&mut self) -> CommandOutput {
        let timestamp = self.last_timestamp;
        let mut listeners: Vec<_> = self.players.keys().cloned().collect();
        listeners.sort();
        for username in &listeners {
            if let Some(slot) = self.players.get_mut(username) {
                slot.player.resolve(&mut self.library, timestamp);
            }
            self.library.split_money(username);
        }

        let report = self.library.revenue_report();
        info!(timestamp, artists = report.len(), "Replay finished");
        CommandOutput::end_program(report)
    }

    /// Bring every player up to `timestamp`
    fn settle_players(&mut self, timestamp: i64) {
        for slot in self.players.values_mut() {
            slot.player.resolve(&mut self.library, timestamp);
        }
    }

    /// Everything loaded across all players at `timestamp`
    fn loaded_items(&mut self, timestamp: i64) -> Vec<PlayableRef> {
        self.settle_players(timestamp);
        self.players
            .values()
            .flat_map(|slot| slot.player.loaded_items())
            .collect()
    }

    fn slot(&mut self, username: &str) -> Result<(&mut Library, &mut PlayerSlot)> {
        let slot = player_slot(
            &mut self.players,
            &self.library,
            &self.player_config,
            username,
        )?;
        Ok((&mut self.library, slot))
    }

    fn dispatch(
        &mut self,
        kind: CommandKind,
        command: &Command,
        out: CommandOutput,
    ) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let ts = command.timestamp;

        match kind {
            // ===== Search and playback =====
            CommandKind::Search => self.search(command, out),
            CommandKind::Select => self.select(command, out),
            CommandKind::Load => {
                let (library, slot) = self.slot(user)?;
                let Some(Searchable::Item(item)) = slot.search.selection().cloned() else {
                    return Err(PlaybackError::NoSelection.into());
                };
                slot.player.load(library, item, ts)?;
                slot.search.clear_selection();
                Ok(out.with_message("Playback loaded successfully."))
            }
            CommandKind::PlayPause => {
                let (library, slot) = self.slot(user)?;
                let message = if slot.player.play_pause(library, ts)? {
                    "Playback paused successfully."
                } else {
                    "Playback resumed successfully."
                };
                Ok(out.with_message(message))
            }
            CommandKind::Status => {
                let (library, slot) = self.slot(user)?;
                let status = slot.player.status(library, ts);
                Ok(out.with_stats(&status))
            }
            CommandKind::Repeat => {
                let (library, slot) = self.slot(user)?;
                let mode = slot.player.repeat(library, ts)?;
                Ok(out.with_message(repeat_message(mode)))
            }
            CommandKind::Shuffle => {
                let (library, slot) = self.slot(user)?;
                let message = if slot.player.shuffle(library, ts, command.seed as u64)? {
                    "Shuffle function activated successfully."
                } else {
                    "Shuffle function deactivated successfully."
                };
                Ok(out.with_message(message))
            }
            CommandKind::Forward => {
                let (library, slot) = self.slot(user)?;
                slot.player.forward(library, ts)?;
                Ok(out.with_message("Skipped forward successfully."))
            }
            CommandKind::Backward => {
                let (library, slot) = self.slot(user)?;
                slot.player.backward(library, ts)?;
                Ok(out.with_message("Rewound successfully."))
            }
            CommandKind::Next => {
                let (library, slot) = self.slot(user)?;
                let name = slot.player.next(library, ts)?;
                Ok(out.with_message(format!(
                    "Skipped to next track successfully. The current track is {name}."
                )))
            }
            CommandKind::Prev => {
                let (library, slot) = self.slot(user)?;
                let name = slot.player.prev(library, ts)?;
                Ok(out.with_message(format!(
                    "Returned to previous track successfully. The current track is {name}."
                )))
            }
            CommandKind::SwitchConnectionStatus => {
                let (library, slot) = self.slot(user)?;
                let online = slot.player.switch_connection_status(library, ts)?;
                debug!(user, online, "Connection status switched");
                Ok(out.with_message(format!("{user} has changed status successfully.")))
            }
            CommandKind::AdBreak => {
                let (library, slot) = self.slot(user)?;
                slot.player.ad_break(library, ts, command.price as f64)?;
                Ok(out.with_message("Ad inserted successfully."))
            }

            // ===== Playlists and likes =====
            CommandKind::CreatePlaylist => {
                let name = command.playlist_name.clone().unwrap_or_default();
                self.library.create_playlist(user, name, ts)?;
                Ok(out.with_message("Playlist created successfully."))
            }
            CommandKind::AddRemoveInPlaylist => self.add_remove_in_playlist(command, out),
            CommandKind::SwitchVisibility => {
                let visibility = self
                    .library
                    .switch_visibility(user, number(command.playlist_id))?;
                Ok(out.with_message(format!(
                    "Visibility status updated successfully to {}.",
                    visibility.as_str()
                )))
            }
            CommandKind::ShowPlaylists => {
                let listener = self
                    .library
                    .listener(user)
                    .ok_or_else(|| EncoreError::user_not_found(user))?;
                let playlists = listener
                    .playlists
                    .iter()
                    .filter_map(|&id| self.library.playlist(id))
                    .map(|p| PlaylistView::new(&self.library, p))
                    .collect();
                Ok(out.with_result(CommandResult::Playlists(playlists)))
            }
            CommandKind::Like => self.like(command, out),
            CommandKind::ShowPreferredSongs => {
                let listener = self
                    .library
                    .listener(user)
                    .ok_or_else(|| EncoreError::user_not_found(user))?;
                let songs = listener
                    .liked_songs
                    .iter()
                    .filter_map(|&id| self.library.song(id))
                    .map(|s| s.name.clone())
                    .collect();
                Ok(out.with_result(CommandResult::Names(songs)))
            }
            CommandKind::Follow => self.follow(command, out),

            // ===== Accounts and content =====
            CommandKind::AddUser => {
                let kind = command
                    .kind
                    .as_deref()
                    .and_then(UserKind::parse)
                    .ok_or_else(|| CliError::rejected("Invalid user type."))?;
                let city = command.city.clone().unwrap_or_default();
                self.library.add_user(user, command.age, city, kind)?;
                info!(user, ?kind, "User added");
                Ok(out.with_message(format!("The username {user} has been added successfully.")))
            }
            CommandKind::AddAlbum => {
                let songs = command
                    .songs
                    .iter()
                    .cloned()
                    .map(|song| song.into_new_song())
                    .collect();
                let year = command
                    .release_year
                    .as_ref()
                    .and_then(|year| year.value())
                    .unwrap_or_default();
                self.library
                    .add_album(user, command.name(), year, command.description(), songs)?;
                Ok(out.with_message(format!("{user} has added new album successfully.")))
            }
            CommandKind::ShowAlbums => {
                let artist = self
                    .library
                    .artist(user)
                    .ok_or_else(|| EncoreError::NotAnArtist(user.to_string()))?;
                let albums = artist
                    .albums
                    .iter()
                    .filter_map(|&id| self.library.album(id))
                    .map(|a| AlbumView::new(&self.library, a))
                    .collect();
                Ok(out.with_result(CommandResult::Albums(albums)))
            }
            CommandKind::AddPodcast => {
                let episodes = command
                    .episodes
                    .iter()
                    .cloned()
                    .map(Episode::from)
                    .collect();
                self.library.add_podcast(user, command.name(), episodes)?;
                Ok(out.with_message(format!("{user} has added new podcast successfully.")))
            }
            CommandKind::ShowPodcasts => {
                let host = self
                    .library
                    .host(user)
                    .ok_or_else(|| EncoreError::NotAHost(user.to_string()))?;
                let podcasts = host
                    .podcasts
                    .iter()
                    .filter_map(|&id| self.library.podcast(id))
                    .map(PodcastView::from)
                    .collect();
                Ok(out.with_result(CommandResult::Podcasts(podcasts)))
            }
            CommandKind::AddEvent => {
                let date = command.date.clone().unwrap_or_default();
                self.library
                    .add_event(user, command.name(), command.description(), date)?;
                Ok(out.with_message(format!("{user} has added new event successfully.")))
            }
            CommandKind::AddMerch => {
                self.library
                    .add_merch(user, command.name(), command.description(), command.price)?;
                Ok(out.with_message(format!("{user} has added new merchandise successfully.")))
            }
            CommandKind::AddAnnouncement => {
                self.library
                    .add_announcement(user, command.name(), command.description())?;
                Ok(out.with_message(format!("{user} has successfully added new announcement.")))
            }
            CommandKind::GetAllUsers => {
                let users = self.library.usernames().map(str::to_string).collect();
                Ok(out.with_result(CommandResult::Names(users)))
            }
            CommandKind::GetOnlineUsers => {
                let users = self
                    .library
                    .listeners()
                    .iter()
                    .filter(|l| l.online)
                    .map(|l| l.username.clone())
                    .collect();
                Ok(out.with_result(CommandResult::Names(users)))
            }
            CommandKind::RemoveAlbum => {
                let loaded = self.loaded_items(ts);
                self.library.remove_album(user, command.name(), &loaded)?;
                Ok(out.with_message(format!("{user} deleted the album successfully.")))
            }
            CommandKind::RemovePodcast => {
                let loaded = self.loaded_items(ts);
                self.library.remove_podcast(user, command.name(), &loaded)?;
                Ok(out.with_message(format!("{user} deleted the podcast successfully.")))
            }
            CommandKind::RemoveEvent => {
                self.library.remove_event(user, command.name())?;
                Ok(out.with_message(format!("{user} deleted the event successfully.")))
            }
            CommandKind::RemoveAnnouncement => {
                self.library.remove_announcement(user, command.name())?;
                Ok(out.with_message(format!("{user} has successfully deleted the announcement.")))
            }
            CommandKind::DeleteUser => {
                let loaded = self.loaded_items(ts);
                self.library.delete_user(user, &loaded)?;
                self.players.remove(user);
                Ok(out.with_message(format!("{user} was successfully deleted.")))
            }

            // ===== Statistics =====
            CommandKind::GetTop5Songs => {
                Ok(out.with_result(CommandResult::Names(self.library.top_songs())))
            }
            CommandKind::GetTop5Playlists => {
                Ok(out.with_result(CommandResult::Names(self.library.top_playlists())))
            }
            CommandKind::GetTop5Albums => {
                Ok(out.with_result(CommandResult::Names(self.library.top_albums())))
            }
            CommandKind::GetTop5Artists => {
                Ok(out.with_result(CommandResult::Names(self.library.top_artists())))
            }
            CommandKind::Wrapped => {
                self.settle_players(ts);
                let wrapped = self.library.wrapped(user)?;
                Ok(out.with_result(CommandResult::Wrapped(wrapped)))
            }

            // ===== Pages =====
            CommandKind::ChangePage => self.change_page(command, out),
            CommandKind::PreviousPage => {
                self.library.require_listener_mut(user)?.pages.go_back()?;
                Ok(out.with_message(format!(
                    "The user {user} has navigated successfully to the previous page."
                )))
            }
            CommandKind::NextPage => {
                self.library.require_listener_mut(user)?.pages.go_forward()?;
                Ok(out.with_message(format!(
                    "The user {user} has navigated successfully to the next page."
                )))
            }
            CommandKind::PrintCurrentPage => {
                let listener = self.library.require_listener_mut(user)?;
                if !listener.online {
                    return Err(EncoreError::Offline(user.to_string()).into());
                }
                let page = listener.pages.current().clone();
                let content = self
                    .library
                    .render_page(&page)
                    .ok_or_else(|| EncoreError::PageNotFound(user.to_string()))?;
                Ok(out.with_message(content))
            }

            // ===== Monetization =====
            CommandKind::BuyMerch => {
                self.library.buy_merch(user, command.name())?;
                Ok(out.with_message(format!("{user} has added new merch successfully.")))
            }
            CommandKind::BuyPremium => {
                let revenue = self.premium_revenue;
                let (library, slot) = self.slot(user)?;
                slot.player.resolve(library, ts);
                library.buy_premium(user, revenue)?;
                info!(user, "Premium subscription started");
                Ok(out.with_message(format!("{user} bought the subscription successfully.")))
            }
            CommandKind::CancelPremium => {
                let (library, slot) = self.slot(user)?;
                slot.player.resolve(library, ts);
                library.cancel_premium(user)?;
                info!(user, "Premium subscription cancelled");
                Ok(out.with_message(format!("{user} cancelled the subscription successfully.")))
            }
        }
    }

    fn search(&mut self, command: &Command, out: CommandOutput) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let (library, slot) = self.slot(user)?;
        slot.player.resolve(library, command.timestamp);
        if library.listener(user).is_some_and(|l| !l.online) {
            return Ok(out
                .with_message(format!("{user} is offline."))
                .with_results(Vec::new()));
        }

        slot.player.clear(library, command.timestamp);
        let kind = command.kind.as_deref().and_then(SearchType::parse);
        if kind.is_none() {
            warn!(user, kind = ?command.kind, "Unknown search type");
        }
        let results = slot.search.search(library, user, kind, &command.filters);
        Ok(out
            .with_message(format!("Search returned {} results", results.len()))
            .with_results(results))
    }

    fn select(&mut self, command: &Command, out: CommandOutput) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let (library, slot) = self.slot(user)?;
        let name = slot.search.select(command.item_number)?;

        let page = match slot.search.selection() {
            Some(Searchable::Artist(owner)) => Page::new(PageKind::Artist, owner.as_str()),
            Some(Searchable::Host(owner)) => Page::new(PageKind::Host, owner.as_str()),
            _ => return Ok(out.with_message(format!("Successfully selected {name}."))),
        };
        debug!(user, page = page.kind().as_str(), owner = page.owner(), "Navigating");
        library.require_listener_mut(user)?.pages.navigate_to(page);
        Ok(out.with_message(format!("Successfully selected {name}'s page.")))
    }

    /// The song under the play head, if the listener has one loaded
    fn loaded_song(
        library: &mut Library,
        slot: &mut PlayerSlot,
        timestamp: i64,
    ) -> Result<SongId> {
        slot.player
            .resolve(library, timestamp)
            .and_then(PlayingFile::as_song)
            .ok_or_else(|| CliError::rejected("The loaded source is not a song."))
    }

    fn like(&mut self, command: &Command, out: CommandOutput) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let (library, slot) = self.slot(user)?;
        if library.listener(user).is_some_and(|l| !l.online) {
            return Err(EncoreError::Offline(user.to_string()).into());
        }
        if slot.player.current_item().is_none() {
            return Err(CliError::rejected(
                "Please load a source before liking or unliking.",
            ));
        }

        let song = Self::loaded_song(library, slot, command.timestamp)?;
        let message = match library.like(user, song)? {
            LikeOutcome::Liked => "Like registered successfully.",
            LikeOutcome::Unliked => "Unlike registered successfully.",
        };
        Ok(out.with_message(message))
    }

    fn add_remove_in_playlist(
        &mut self,
        command: &Command,
        out: CommandOutput,
    ) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let playlist = number(command.playlist_id);
        let (library, slot) = self.slot(user)?;
        if slot.player.current_item().is_none() {
            return Err(CliError::rejected(
                "Please load a source before adding to or removing from the playlist.",
            ));
        }
        if library.own_playlist(user, playlist).is_none() {
            return Err(EncoreError::PlaylistNotFound.into());
        }

        let song = Self::loaded_song(library, slot, command.timestamp)?;
        let message = match library.add_remove_in_playlist(user, playlist, song)? {
            PlaylistEdit::Added => "Successfully added to playlist.",
            PlaylistEdit::Removed => "Successfully removed from playlist.",
        };
        Ok(out.with_message(message))
    }

    fn follow(&mut self, command: &Command, out: CommandOutput) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let (library, slot) = self.slot(user)?;
        let playlist = match slot.search.selection() {
            None => {
                return Err(CliError::rejected(
                    "Please select a source before following or unfollowing.",
                ))
            }
            Some(Searchable::Item(PlayableRef::Playlist(id))) => *id,
            Some(_) => return Err(CliError::rejected("The selected source is not a playlist.")),
        };

        let message = match library.follow(user, playlist)? {
            FollowOutcome::Followed => "Playlist followed successfully.",
            FollowOutcome::Unfollowed => "Playlist unfollowed successfully.",
        };
        Ok(out.with_message(message))
    }

    fn change_page(&mut self, command: &Command, out: CommandOutput) -> Result<CommandOutput> {
        let user = command.username.as_str();
        let requested = command.next_page.as_deref().unwrap_or_default();
        let (library, slot) = self.slot(user)?;
        let not_found = || EncoreError::PageNotFound(user.to_string());
        let kind = PageKind::parse(requested).ok_or_else(not_found)?;

        let owner = match kind {
            PageKind::Home | PageKind::LikedContent => user.to_string(),
            PageKind::Artist => slot
                .player
                .resolve(library, command.timestamp)
                .and_then(PlayingFile::as_song)
                .and_then(|id| library.song(id))
                .map(|song| song.artist.clone())
                .filter(|artist| library.artist(artist).is_some())
                .ok_or_else(not_found)?,
            PageKind::Host => {
                slot.player.resolve(library, command.timestamp);
                match slot.player.current_item() {
                    Some(PlayableRef::Podcast(id)) => library
                        .podcast(id)
                        .map(|podcast| podcast.owner.clone())
                        .filter(|owner| library.host(owner).is_some())
                        .ok_or_else(not_found)?,
                    _ => return Err(not_found().into()),
                }
            }
        };

        debug!(user, page = kind.as_str(), %owner, "Navigating");
        library
            .require_listener_mut(user)?
            .pages
            .navigate_to(Page::new(kind, owner));
        Ok(out.with_message(format!("{user} accessed {} successfully.", kind.as_str())))
    }
}
