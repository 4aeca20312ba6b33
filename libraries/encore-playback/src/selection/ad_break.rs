use super::Selection;
use crate::memento::AdBreakMemento;
use crate::player::AudioPlayer;
use crate::status::PlaybackStatus;
use crate::types::AD_BREAK_NAME;
use encore_core::{Library, PlayableRef, PlayingFile};
use tracing::debug;

impl AudioPlayer {
    /// Swap the ad in at a track boundary
    ///
    /// `resume` is the item to go back to afterwards, already advanced past the
    /// finished track, or `None` if nothing is left to play.
    pub(crate) fn splice_ad_break(&mut self, resume: Option<PlayableRef>) -> Selection {
        let saved = if resume.is_some() {
            self.status.clone()
        } else {
            PlaybackStatus::empty()
        };
        debug!(user = %self.username, ?resume, carry = self.elapsed, "Splicing in ad break");

        self.ad_memento = Some(AdBreakMemento::capture(saved, resume));
        self.status = PlaybackStatus::ad_break(i64::from(self.config.ad_break_duration));
        self.current_item = Some(PlayableRef::AdBreak);
        self.ad_break_pending = false;
        Selection::Reselect
    }

    /// Play the ad; once over, pay artists and restore the interrupted item
    pub(crate) fn select_ad_break(&mut self, library: &mut Library) -> Selection {
        let duration = i64::from(self.config.ad_break_duration);
        if self.elapsed < duration {
            return self.settle(AD_BREAK_NAME, duration, PlayingFile::AdBreak);
        }

        library.split_money(&self.username);
        self.elapsed -= duration;
        let Some(memento) = self.ad_memento.take() else {
            return Selection::Ended;
        };
        let (status, item) = memento.restore();
        debug!(user = %self.username, ?item, carry = self.elapsed, "Ad break over, restoring");
        self.status = status;
        self.current_item = item;
        Selection::Reselect
    }
}

#[cfg(test)]
mod tests {
    use crate::player::AudioPlayer;
    use crate::types::{PlayerConfig, AD_BREAK_NAME};
    use encore_core::{Library, NewSong, PlayableRef, PlayingFile, UserKind};

    fn setup() -> (Library, AudioPlayer) {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        library.add_user("band", 30, "Cluj", UserKind::Artist).unwrap();
        let song = |name: &str, duration| NewSong {
            name: name.into(),
            duration,
            album: "LP".into(),
            artist: "band".into(),
            genre: "rock".into(),
            tags: vec![],
            lyrics: String::new(),
            release_year: 2000,
        };
        let album = library
            .add_album("band", "LP", 2000, "", vec![song("a", 30), song("b", 40)])
            .unwrap();
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Album(album), 0).unwrap();
        (library, player)
    }

    #[test]
    fn ad_plays_between_tracks_then_resumes() {
        let (mut library, mut player) = setup();
        player.ad_break(&mut library, 5, 100.0).unwrap();
        assert!(player.is_ad_break_pending());

        let status = player.status(&mut library, 33);
        assert_eq!(status.name, AD_BREAK_NAME);
        assert_eq!(status.remaining_time, 7);
        assert_eq!(player.current_file(), Some(PlayingFile::AdBreak));
        assert!(!player.is_ad_break_pending());
        assert!(player.has_ad_memento());

        let status = player.status(&mut library, 45);
        assert_eq!(status.name, "b");
        assert_eq!(status.remaining_time, 35);
        assert!(!player.has_ad_memento());
        assert_eq!(library.artist("band").unwrap().song_profits.get("a"), Some(&100.0));
    }

    #[test]
    fn ad_after_last_track_ends_playback() {
        let (mut library, mut player) = setup();
        player.status(&mut library, 35);
        player.ad_break(&mut library, 35, 10.0).unwrap();

        assert_eq!(player.status(&mut library, 75).name, AD_BREAK_NAME);
        assert!(player.status(&mut library, 80).is_empty());
        assert_eq!(player.current_item(), None);
    }
}
