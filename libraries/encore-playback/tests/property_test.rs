//! Property-based tests for playback resolution
//!
//! Uses proptest to check the timing and listen-count laws across random
//! durations and timestamps.

use encore_core::{Library, NewSong, PlayableRef, SongId, UserKind};
use encore_playback::{shuffle, AudioPlayer, PlayerConfig};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn new_song(index: usize, duration: u32) -> NewSong {
    NewSong {
        name: format!("track {index}"),
        duration,
        album: "Album".into(),
        artist: "band".into(),
        genre: "jazz".into(),
        tags: vec![],
        lyrics: String::new(),
        release_year: 1999,
    }
}

fn library() -> Library {
    let mut library = Library::new();
    library.add_user("alice", 30, "Iasi", UserKind::Listener).unwrap();
    library.add_user("band", 40, "Cluj", UserKind::Artist).unwrap();
    library
}

/// Album of the given durations, loaded at timestamp 0
fn loaded_album(durations: &[u32]) -> (Library, AudioPlayer, Vec<SongId>) {
    let mut library = library();
    let songs = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| new_song(i, d))
        .collect();
    let album = library.add_album("band", "Album", 1999, "", songs).unwrap();
    let ids = library.album(album).unwrap().songs.clone();
    let mut player = AudioPlayer::new("alice", PlayerConfig::default());
    player.load(&mut library, PlayableRef::Album(album), 0).unwrap();
    (library, player, ids)
}

fn total_listens(library: &Library, ids: &[SongId]) -> i64 {
    let alice = library.listener("alice").unwrap();
    ids.iter().map(|&id| alice.song_listens(id)).sum()
}

// ===== Property Tests =====

proptest! {
    /// Property: an infinitely repeated song sits at `t mod d` and has been
    /// heard `t / d + 1` times
    #[test]
    fn repeat_infinite_follows_modulo(duration in 1u32..600, t in 0i64..20_000) {
        let mut library = library();
        let song = library.insert_song(new_song(0, duration));
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Song(song), 0).unwrap();
        player.repeat(&mut library, 0).unwrap();
        player.repeat(&mut library, 0).unwrap();

        let d = i64::from(duration);
        let status = player.status(&mut library, t);
        prop_assert_eq!(status.remaining_time, d - t % d);
        prop_assert_eq!(
            library.listener("alice").unwrap().song_listens(song),
            t / d + 1
        );
    }

    /// Property: without repeat, every song up to and including the current
    /// one is heard exactly once
    #[test]
    fn album_walk_credits_each_boundary_once(
        durations in prop::collection::vec(1u32..300, 1..12),
        fraction in 0.0f64..1.0,
    ) {
        let total: i64 = durations.iter().map(|&d| i64::from(d)).sum();
        // truncation keeps t strictly below the album's end
        let t = (total as f64 * fraction) as i64;
        let (mut library, mut player, ids) = loaded_album(&durations);

        let status = player.status(&mut library, t);
        let mut end = 0;
        let current = durations
            .iter()
            .position(|&d| {
                end += i64::from(d);
                t < end
            })
            .unwrap();

        prop_assert_eq!(status.name, format!("track {current}"));
        prop_assert_eq!(status.remaining_time, end - t);
        prop_assert_eq!(total_listens(&library, &ids), current as i64 + 1);
    }

    /// Property: resolving at intermediate timestamps lands on the same
    /// status and listen counts as a single resolve at the end
    #[test]
    fn resolution_is_path_independent(
        durations in prop::collection::vec(1u32..200, 1..8),
        checkpoints in prop::collection::vec(0i64..1500, 0..10),
        end in 0i64..1500,
    ) {
        let (mut direct_library, mut direct, ids) = loaded_album(&durations);
        let (mut stepped_library, mut stepped, _) = loaded_album(&durations);

        let mut checkpoints: Vec<i64> = checkpoints.into_iter().filter(|&c| c <= end).collect();
        checkpoints.sort_unstable();
        for ts in checkpoints {
            stepped.status(&mut stepped_library, ts);
        }

        prop_assert_eq!(
            stepped.status(&mut stepped_library, end),
            direct.status(&mut direct_library, end)
        );
        let stepped_alice = stepped_library.listener("alice").unwrap();
        let direct_alice = direct_library.listener("alice").unwrap();
        for &id in &ids {
            prop_assert_eq!(stepped_alice.song_listens(id), direct_alice.song_listens(id));
        }
    }

    /// Property: the same seed always gives the same permutation
    #[test]
    fn shuffle_order_is_reproducible(len in 0usize..64, seed in any::<u64>()) {
        let order = shuffle::play_order(len, Some(seed));
        prop_assert_eq!(&order, &shuffle::play_order(len, Some(seed)));

        let distinct: HashSet<usize> = order.iter().copied().collect();
        prop_assert_eq!(distinct.len(), len);
        prop_assert!(order.iter().all(|&track| track < len));
    }

    /// Property: the elapsed position never goes negative, whatever
    /// sequence of seeks is applied
    #[test]
    fn seeks_stay_inside_the_episode(ops in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut library = library();
        let podcast = library.insert_podcast(
            "radio",
            "Show",
            vec![encore_core::Episode::new("only", 1_000, "one")],
        );
        let mut player = AudioPlayer::new("alice", PlayerConfig::default());
        player.load(&mut library, PlayableRef::Podcast(podcast), 0).unwrap();
        player.play_pause(&mut library, 0).unwrap();

        for forward in ops {
            let result = if forward {
                player.forward(&mut library, 0)
            } else {
                player.backward(&mut library, 0)
            };
            if result.is_err() || player.current_item().is_none() {
                // the episode was skipped to its end
                prop_assert!(player.current_item().is_none());
                prop_assert!(player.last_status().is_empty());
                break;
            }
            let status = player.last_status();
            prop_assert!(status.remaining_time <= 1_000);
            prop_assert!(status.remaining_time > 0);
        }
    }
}
