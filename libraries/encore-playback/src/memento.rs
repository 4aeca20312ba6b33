//! Pre-ad snapshot
use crate::status::PlaybackStatus;
use encore_core::PlayableRef;

/// What the player was doing when an ad break was spliced in
///
/// `item` is `None` when the interrupted item had nothing left to play, in
/// which case playback ends once the ad is over. The memento is consumed by
/// its single [`restore`](Self::restore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdBreakMemento {
    status: PlaybackStatus,
    item: Option<PlayableRef>,
}

impl AdBreakMemento {
    pub fn capture(status: PlaybackStatus, item: Option<PlayableRef>) -> Self {
        Self { status, item }
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn item(&self) -> Option<PlayableRef> {
        self.item
    }

    /// Hand back the saved status and item
    pub fn restore(self) -> (PlaybackStatus, Option<PlayableRef>) {
        (self.status, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepeatMode;
    use encore_core::AlbumId;

    #[test]
    fn restore_returns_what_was_captured() {
        let status = PlaybackStatus {
            name: "two".into(),
            remaining_time: 40,
            repeat: RepeatMode::RepeatAll,
            shuffle: true,
            paused: false,
        };
        let item = Some(PlayableRef::Album(AlbumId::new(3)));
        let memento = AdBreakMemento::capture(status.clone(), item);

        assert_eq!(memento.item(), item);
        assert_eq!(memento.status(), &status);
        assert_eq!(memento.restore(), (status, item));
    }
}
