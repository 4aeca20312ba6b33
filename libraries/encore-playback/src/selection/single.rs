use super::Selection;
use crate::player::AudioPlayer;
use crate::types::RepeatMode;
use encore_core::{Library, PlayableRef, PlayingFile, SongId};

impl AudioPlayer {
    /// Single song under repeat none/once/infinite
    pub(crate) fn select_single(&mut self, library: &mut Library, id: SongId) -> Selection {
        let Some(duration) = library.song(id).map(|s| i64::from(s.duration)) else {
            return Selection::Ended;
        };
        if duration == 0 {
            return Selection::Ended;
        }
        let file = PlayingFile::Song(id);

        if self.ad_break_pending && self.elapsed >= duration {
            self.elapsed -= duration;
            self.credit(library, file, 1);
            let resume = match self.status.repeat {
                RepeatMode::RepeatOnce => {
                    self.status.repeat = RepeatMode::NoRepeat;
                    Some(PlayableRef::Song(id))
                }
                RepeatMode::RepeatInfinite => Some(PlayableRef::Song(id)),
                _ => None,
            };
            return self.splice_ad_break(resume);
        }

        if self.status.repeat == RepeatMode::RepeatOnce && self.elapsed >= duration {
            self.credit(library, file, 1);
            self.elapsed -= duration;
            self.status.repeat = RepeatMode::NoRepeat;
        }

        if self.status.repeat == RepeatMode::RepeatInfinite {
            self.credit(library, file, self.elapsed / duration + 1);
            self.elapsed %= duration;
        } else {
            self.credit(library, file, 1);
            if self.elapsed >= duration {
                return Selection::Ended;
            }
        }

        let name = library.song(id).map(|s| s.name.as_str()).unwrap_or_default();
        self.settle(name, duration, file)
    }
}

#[cfg(test)]
mod tests {
    use crate::player::AudioPlayer;
    use crate::types::{PlayerConfig, RepeatMode, AD_BREAK_NAME};
    use encore_core::{Library, NewSong, PlayableRef, SongId, UserKind};

    fn setup(duration: u32) -> (Library, AudioPlayer, SongId) {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        let song = library.insert_song(NewSong {
            name: "solo".into(),
            duration,
            album: "x".into(),
            artist: "band".into(),
            genre: "pop".into(),
            tags: vec![],
            lyrics: String::new(),
            release_year: 2000,
        });
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Song(song), 0).unwrap();
        (library, player, song)
    }

    fn listens(library: &Library, song: SongId) -> i64 {
        library.listener("alice").unwrap().song_listens(song)
    }

    #[test]
    fn no_repeat_ends_at_duration() {
        let (mut library, mut player, song) = setup(100);
        assert_eq!(player.status(&mut library, 99).remaining_time, 1);
        assert!(player.status(&mut library, 100).is_empty());
        assert_eq!(listens(&library, song), 1);
        assert_eq!(player.current_item(), None);
    }

    #[test]
    fn repeat_once_plays_twice_then_stops() {
        let (mut library, mut player, song) = setup(100);
        player.repeat(&mut library, 0).unwrap();

        let status = player.status(&mut library, 150);
        assert_eq!(status.remaining_time, 50);
        assert_eq!(status.repeat, RepeatMode::NoRepeat);
        assert_eq!(listens(&library, song), 2);

        assert!(player.status(&mut library, 200).is_empty());
        assert_eq!(listens(&library, song), 2);
    }

    #[test]
    fn repeat_infinite_follows_modulo() {
        let (mut library, mut player, song) = setup(100);
        player.repeat(&mut library, 0).unwrap();
        player.repeat(&mut library, 0).unwrap();

        let status = player.status(&mut library, 345);
        assert_eq!(status.remaining_time, 55);
        assert_eq!(status.repeat, RepeatMode::RepeatInfinite);
        assert_eq!(listens(&library, song), 4);
    }

    /// Arm an ad at 0 under `repeat_presses`, let it splice at 105 and finish at 115
    fn ad_after_single_song(repeat_presses: usize) -> (Library, AudioPlayer) {
        let (mut library, mut player, _) = setup(100);
        library.add_user("band", 30, "Cluj", UserKind::Artist).unwrap();
        for _ in 0..repeat_presses {
            player.repeat(&mut library, 0).unwrap();
        }
        player.ad_break(&mut library, 0, 10.0).unwrap();

        let status = player.status(&mut library, 105);
        assert_eq!(status.name, AD_BREAK_NAME);
        assert_eq!(status.remaining_time, 5);

        player.status(&mut library, 115);
        assert_eq!(library.artist("band").unwrap().song_profits.get("solo"), Some(&10.0));
        (library, player)
    }

    #[test]
    fn ad_after_unrepeated_song_ends_playback() {
        let (mut library, mut player) = ad_after_single_song(0);
        let status = player.status(&mut library, 115);
        assert!(status.is_empty());
        assert_eq!(status.name, "");
        assert_eq!(status.remaining_time, 0);
        assert_eq!(player.current_item(), None);
    }

    #[test]
    fn ad_after_repeat_once_resumes_without_repeat() {
        let (mut library, mut player) = ad_after_single_song(1);
        let status = player.status(&mut library, 115);
        assert_eq!(status.name, "solo");
        assert_eq!(status.remaining_time, 95);
        assert_eq!(status.repeat, RepeatMode::NoRepeat);
        assert!(!player.has_ad_memento());
    }

    #[test]
    fn ad_after_repeat_infinite_keeps_the_mode() {
        let (mut library, mut player) = ad_after_single_song(2);
        let status = player.status(&mut library, 115);
        assert_eq!(status.name, "solo");
        assert_eq!(status.remaining_time, 95);
        assert_eq!(status.repeat, RepeatMode::RepeatInfinite);
    }

    #[test]
    fn zero_duration_song_ends_at_once() {
        let (mut library, mut player, _) = setup(0);
        assert!(player.status(&mut library, 0).is_empty());
    }
}
