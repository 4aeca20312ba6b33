use super::Selection;
use crate::player::AudioPlayer;
use crate::shuffle;
use crate::types::RepeatMode;
use encore_core::{Library, PlayableRef, PlayingFile, SongId};

impl AudioPlayer {
    /// Album or playlist, honouring shuffle and the collection repeat modes
    ///
    /// `track_id` stays in unshuffled space; the walk happens over play-order
    /// slots.
    pub(crate) fn select_in_collection(
        &mut self,
        library: &mut Library,
        item: PlayableRef,
    ) -> Selection {
        let Some(song_ids) = library.collection_songs(item) else {
            return Selection::Ended;
        };
        let songs: Vec<(SongId, i64)> = song_ids
            .iter()
            .filter_map(|&id| library.song(id).map(|s| (id, i64::from(s.duration))))
            .collect();
        let len = songs.len();
        if len == 0 || self.track_id >= len {
            return Selection::Ended;
        }

        let order = shuffle::play_order(len, self.status.shuffle.then_some(self.shuffle_seed));
        let start = shuffle::slot_of(&order, self.track_id).unwrap_or(0);
        let (current, current_duration) = songs[order[start]];

        if self.ad_break_pending && self.elapsed >= current_duration {
            self.elapsed -= current_duration;
            self.credit(library, PlayingFile::Song(current), 1);
            let resume = match self.status.repeat {
                RepeatMode::RepeatAll => {
                    self.track_id = order[(start + 1) % len];
                    Some(item)
                }
                RepeatMode::RepeatCurrentSong => Some(item),
                _ if start + 1 < len => {
                    self.track_id = order[start + 1];
                    Some(item)
                }
                _ => None,
            };
            return self.splice_ad_break(resume);
        }

        match self.status.repeat {
            RepeatMode::RepeatCurrentSong => {
                if current_duration == 0 {
                    return Selection::Ended;
                }
                let file = PlayingFile::Song(current);
                self.credit(library, file, self.elapsed / current_duration + 1);
                self.elapsed %= current_duration;
                let name = song_name(library, current);
                self.settle(name, current_duration, file)
            }
            RepeatMode::RepeatAll => {
                let total: i64 = songs.iter().map(|&(_, duration)| duration).sum();
                if total == 0 {
                    return Selection::Ended;
                }
                let cycles = self.elapsed / total;
                if cycles > 0 {
                    for &(id, _) in &songs {
                        self.credit(library, PlayingFile::Song(id), cycles);
                    }
                    self.elapsed %= total;
                }
                let slots = (0..len).map(|step| order[(start + step) % len]);
                self.walk(library, &songs, slots)
            }
            _ => {
                self.walk(library, &songs, order[start..].iter().copied())
            }
        }
    }

    /// Credit songs in `slots` order until the elapsed time falls inside one
    fn walk(
        &mut self,
        library: &mut Library,
        songs: &[(SongId, i64)],
        slots: impl IntoIterator<Item = usize>,
    ) -> Selection {
        for index in slots {
            let (id, duration) = songs[index];
            let file = PlayingFile::Song(id);
            self.credit(library, file, 1);
            if self.elapsed < duration {
                self.track_id = index;
                let name = song_name(library, id);
                return self.settle(name, duration, file);
            }
            self.elapsed -= duration;
        }
        Selection::Ended
    }
}

fn song_name(library: &Library, id: SongId) -> &str {
    library.song(id).map(|s| s.name.as_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::player::AudioPlayer;
    use crate::shuffle;
    use crate::types::{PlayerConfig, RepeatMode};
    use encore_core::{AlbumId, Library, NewSong, PlayableRef, SongId, UserKind};

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

    fn setup(durations: &[u32]) -> (Library, AudioPlayer, AlbumId) {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        library.add_user("band", 30, "Cluj", UserKind::Artist).unwrap();
        let songs = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| song(&format!("t{i}"), d))
            .collect();
        let album = library.add_album("band", "LP", 2000, "", songs).unwrap();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Album(album), 0).unwrap();
        (library, player, album)
    }

    fn listens(library: &Library, album: AlbumId, index: usize) -> i64 {
        let id: SongId = library.album(album).unwrap().songs[index];
        library.listener("alice").unwrap().song_listens(id)
    }

    #[test]
    fn walks_into_second_track() {
        let (mut library, mut player, album) = setup(&[200, 150]);
        let status = player.status(&mut library, 210);
        assert_eq!(status.name, "t1");
        assert_eq!(status.remaining_time, 140);
        assert_eq!(listens(&library, album, 0), 1);
        assert_eq!(listens(&library, album, 1), 1);

        player.status(&mut library, 210);
        assert_eq!(listens(&library, album, 0), 1);
        assert_eq!(listens(&library, album, 1), 1);
    }

    #[test]
    fn no_repeat_runs_out() {
        let (mut library, mut player, album) = setup(&[10, 20]);
        assert!(player.status(&mut library, 30).is_empty());
        assert_eq!(listens(&library, album, 1), 1);
    }

    #[test]
    fn repeat_all_wraps_and_counts_cycles() {
        let (mut library, mut player, album) = setup(&[10, 20]);
        player.repeat(&mut library, 0).unwrap();
        assert_eq!(player.status(&mut library, 0).repeat, RepeatMode::RepeatAll);

        let status = player.status(&mut library, 65);
        assert_eq!(status.name, "t0");
        assert_eq!(status.remaining_time, 5);
        assert_eq!(listens(&library, album, 0), 3);
        assert_eq!(listens(&library, album, 1), 2);
    }

    #[test]
    fn repeat_current_song_loops_one_track() {
        let (mut library, mut player, album) = setup(&[10, 20]);
        player.status(&mut library, 12);
        player.repeat(&mut library, 12).unwrap();
        player.repeat(&mut library, 12).unwrap();

        let status = player.status(&mut library, 52);
        assert_eq!(status.name, "t1");
        assert_eq!(status.remaining_time, 18);
        assert_eq!(listens(&library, album, 1), 3);
        assert_eq!(listens(&library, album, 0), 1);
    }

    #[test]
    fn shuffle_follows_seeded_order() {
        let (mut library, mut player, album) = setup(&[10, 10, 10, 10, 10]);
        player.shuffle(&mut library, 0, 9).unwrap();
        assert_eq!(shuffle::play_order(5, Some(9)), vec![2, 1, 0, 4, 3]);

        // t0 sits in slot 2, so t4 then t3 follow and the album ends there
        let status = player.status(&mut library, 10);
        assert_eq!(status.name, "t4");
        assert_eq!(status.remaining_time, 10);
        assert_eq!(listens(&library, album, 2), 0);

        assert_eq!(player.status(&mut library, 25).name, "t3");
        assert!(player.status(&mut library, 30).is_empty());
    }

    #[test]
    fn playlist_emptied_under_the_player_ends_playback() {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        let id = library.insert_song(song("only", 30));
        let playlist = library.create_playlist("alice", "mix", 0).unwrap();
        library.add_remove_in_playlist("alice", 1, id).unwrap();

        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Playlist(playlist), 0).unwrap();
        library.add_remove_in_playlist("alice", 1, id).unwrap();

        assert!(player.status(&mut library, 5).is_empty());
        assert_eq!(player.current_item(), None);
    }
}
