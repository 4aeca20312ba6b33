/// Core error types for Encore
///
/// Every variant's `Display` output is the exact message reported back to the
/// user in the command output, so the dispatcher never formats errors itself.
use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Core error type for Encore
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncoreError {
    /// No user with this name exists
    #[error("The username {0} doesn't exist.")]
    UserNotFound(String),

    /// A user with this name already exists
    #[error("The username {0} is already taken.")]
    UsernameTaken(String),

    /// The user exists but cannot hold play state
    #[error("{0} is not a normal user.")]
    NotAListener(String),

    #[error("{0} is not an artist.")]
    NotAnArtist(String),

    #[error("{0} is not a host.")]
    NotAHost(String),

    #[error("{0} has another album with the same name.")]
    DuplicateAlbum(String),

    #[error("{0} has the same song at least twice in this album.")]
    DuplicateSongInAlbum(String),

    #[error("{0} has another podcast with the same name.")]
    DuplicatePodcast(String),

    #[error("{0} has the same episode twice in this podcast.")]
    DuplicateEpisode(String),

    #[error("{0} has another event with the same name.")]
    DuplicateEvent(String),

    /// Event date is not a plausible `dd-mm-yyyy`
    #[error("Event for {0} does not have a valid date.")]
    InvalidEventDate(String),

    #[error("{0} has merchandise with the same name.")]
    DuplicateMerch(String),

    #[error("Price for merchandise can not be negative.")]
    NegativeMerchPrice,

    #[error("{0} has already added an announcement with this name")]
    DuplicateAnnouncement(String),

    #[error("{0} doesn't have an album with the given name.")]
    AlbumNotFound(String),

    /// Some player has a song of the album loaded
    #[error("{0} can't delete this album.")]
    AlbumInUse(String),

    #[error("{0} doesn't have a podcast with the given name.")]
    PodcastNotFound(String),

    #[error("{0} can't delete this podcast.")]
    PodcastInUse(String),

    #[error("{0} doesn't have an event with the given name")]
    EventNotFound(String),

    #[error("{0} has no announcement with the given name.")]
    AnnouncementNotFound(String),

    /// Some player or browsed page still depends on the user's content
    #[error("{0} can't be deleted.")]
    UserInUse(String),

    /// Nothing to summarize for `wrapped`
    #[error("No data to show for {role} {username}.")]
    NoWrappedData { role: &'static str, username: String },

    #[error("A playlist with the same name already exists.")]
    DuplicatePlaylist,

    /// Playlist id outside the listener's own playlists
    #[error("The specified playlist does not exist.")]
    PlaylistNotFound,

    /// Same as `PlaylistNotFound`, worded for visibility switches
    #[error("The specified playlist ID is too high.")]
    PlaylistIdTooHigh,

    #[error("You cannot follow or unfollow your own playlist.")]
    OwnPlaylist,

    /// Merch can only be bought while browsing an artist page
    #[error("Cannot buy merch from this page.")]
    NotOnArtistPage,

    #[error("The merch {0} doesn't exist.")]
    MerchNotFound(String),

    #[error("{0} is already a premium user.")]
    AlreadyPremium(String),

    #[error("{0} is not a premium user.")]
    NotPremium(String),

    #[error("{0} is offline.")]
    Offline(String),

    /// Navigation history has nothing behind the current page
    #[error("There are no pages left to go back.")]
    NoPreviousPage,

    /// Navigation history has nothing ahead of the current page
    #[error("There are no pages left to go forward.")]
    NoNextPage,

    #[error("{0} is trying to access a non-existent page.")]
    PageNotFound(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl EncoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an unknown user error
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound(username.into())
    }
}
