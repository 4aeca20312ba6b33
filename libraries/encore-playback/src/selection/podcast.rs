use super::Selection;
use crate::player::AudioPlayer;
use encore_core::{EpisodeRef, Library, PlayingFile, PodcastId, PodcastProgress};

impl AudioPlayer {
    /// Episodes in order from the saved episode; repeat and shuffle do not apply
    pub(crate) fn select_episode(&mut self, library: &mut Library, id: PodcastId) -> Selection {
        let Some(durations) = library.podcast(id).map(|p| {
            p.episodes
                .iter()
                .map(|e| i64::from(e.duration))
                .collect::<Vec<_>>()
        }) else {
            return Selection::Ended;
        };

        for (index, &duration) in durations.iter().enumerate().skip(self.track_id) {
            let file = PlayingFile::Episode(EpisodeRef::new(id, index));
            self.credit(library, file, 1);
            if self.elapsed < duration {
                self.track_id = index;
                library.save_podcast_progress(
                    &self.username,
                    id,
                    PodcastProgress {
                        episode: index,
                        offset: self.elapsed,
                    },
                );
                let name = library.file_name(file).unwrap_or_default();
                return self.settle(name, duration, file);
            }
            self.elapsed -= duration;
        }

        library.clear_podcast_progress(&self.username, id);
        Selection::Ended
    }
}

#[cfg(test)]
mod tests {
    use crate::player::AudioPlayer;
    use crate::types::PlayerConfig;
    use encore_core::{Episode, EpisodeRef, Library, PlayableRef, PodcastId, UserKind};

    fn setup() -> (Library, AudioPlayer, PodcastId) {
        let mut library = Library::new();
        library.add_user("alice", 20, "Iasi", UserKind::Listener).unwrap();
        let podcast = library.insert_podcast(
            "radio",
            "Talk",
            vec![
                Episode::new("ep1", 100, "first"),
                Episode::new("ep2", 50, "second"),
            ],
        );
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Podcast(podcast), 0).unwrap();
        (library, player, podcast)
    }

    #[test]
    fn walks_episodes_and_saves_progress() {
        let (mut library, mut player, podcast) = setup();
        let status = player.status(&mut library, 120);
        assert_eq!(status.name, "ep2");
        assert_eq!(status.remaining_time, 30);

        let progress = library.podcast_progress("alice", podcast).unwrap();
        assert_eq!((progress.episode, progress.offset), (1, 20));
        let alice = library.listener("alice").unwrap();
        assert_eq!(alice.episode_listens(EpisodeRef::new(podcast, 0)), 1);
        assert_eq!(alice.episode_listens(EpisodeRef::new(podcast, 1)), 1);
    }

    #[test]
    fn reload_resumes_where_it_left_off() {
        let (mut library, mut player, podcast) = setup();
        player.clear(&mut library, 30);
        player.load(&mut library, PlayableRef::Podcast(podcast), 500).unwrap();

        let status = player.status(&mut library, 510);
        assert_eq!(status.name, "ep1");
        assert_eq!(status.remaining_time, 60);
    }

    #[test]
    fn finishing_forgets_progress() {
        let (mut library, mut player, podcast) = setup();
        assert!(player.status(&mut library, 150).is_empty());
        assert_eq!(library.podcast_progress("alice", podcast), None);
    }
}
