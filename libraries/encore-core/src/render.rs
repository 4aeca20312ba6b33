//! Text rendering of listener pages
use crate::library::Library;
use crate::navigation::{Page, PageKind};
use crate::types::Song;

const HOME_PAGE_LIMIT: usize = 5;

impl Library {
    /// Render `page` for `printCurrentPage`
    ///
    /// Returns `None` when the page owner no longer resolves to a user of the
    /// expected kind.
    pub fn render_page(&self, page: &Page) -> Option<String> {
        match page.kind() {
            PageKind::Home => self.render_home(page.owner()),
            PageKind::LikedContent => self.render_liked_content(page.owner()),
            PageKind::Artist => self.render_artist(page.owner()),
            PageKind::Host => self.render_host(page.owner()),
        }
    }

    fn liked_songs(&self, listener: &str) -> Option<Vec<&Song>> {
        let listener = self.listener(listener)?;
        Some(
            listener
                .liked_songs
                .iter()
                .filter_map(|&id| self.song(id))
                .collect(),
        )
    }

    fn render_home(&self, owner: &str) -> Option<String> {
        let mut liked = self.liked_songs(owner)?;
        liked.sort_by(|a, b| b.likes.cmp(&a.likes));
        let songs = liked
            .iter()
            .take(HOME_PAGE_LIMIT)
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>();
        let playlists = self
            .followed_playlists(owner)
            .take(HOME_PAGE_LIMIT)
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>();

        Some(format!(
            "Liked songs:\n\t[{}]\n\nFollowed playlists:\n\t[{}]",
            songs.join(", "),
            playlists.join(", ")
        ))
    }

    fn render_liked_content(&self, owner: &str) -> Option<String> {
        let songs = self
            .liked_songs(owner)?
            .iter()
            .map(|s| format!("{} - {}", s.name, s.artist))
            .collect::<Vec<_>>();
        let playlists = self
            .followed_playlists(owner)
            .map(|p| format!("{} - {}", p.name, p.owner))
            .collect::<Vec<_>>();

        Some(format!(
            "Liked songs:\n\t[{}]\n\nFollowed playlists:\n\t[{}]",
            songs.join(", "),
            playlists.join(", ")
        ))
    }

    fn render_artist(&self, owner: &str) -> Option<String> {
        let artist = self.artist(owner)?;
        let albums = artist
            .albums
            .iter()
            .filter_map(|&id| self.album(id))
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>();
        let merch = artist
            .merch
            .iter()
            .map(|m| format!("{} - {}:\n\t{}", m.name, m.price, m.description))
            .collect::<Vec<_>>();
        let events = artist
            .events
            .iter()
            .map(|e| format!("{} - {}:\n\t{}", e.name, e.date, e.description))
            .collect::<Vec<_>>();

        Some(format!(
            "Albums:\n\t[{}]\n\nMerch:\n\t[{}]\n\nEvents:\n\t[{}]",
            albums.join(", "),
            merch.join(", "),
            events.join(", ")
        ))
    }

    fn render_host(&self, owner: &str) -> Option<String> {
        let host = self.host(owner)?;
        let podcasts = host
            .podcasts
            .iter()
            .filter_map(|&id| self.podcast(id))
            .map(|p| {
                let episodes = p
                    .episodes
                    .iter()
                    .map(|e| format!("{} - {}", e.name, e.description))
                    .collect::<Vec<_>>();
                format!("{}:\n\t[{}]\n", p.name, episodes.join(", "))
            })
            .collect::<Vec<_>>();
        let announcements = host
            .announcements
            .iter()
            .map(|a| format!("{}:\n\t{}\n", a.name, a.description))
            .collect::<Vec<_>>();

        Some(format!(
            "Podcasts:\n\t[{}]\n\nAnnouncements:\n\t[{}]",
            podcasts.join(", "),
            announcements.join(", ")
        ))
    }
}
