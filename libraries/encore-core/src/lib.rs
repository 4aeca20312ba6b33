//! Encore Core
//!
//! Shared domain model for the Encore replay engine: stable arena ids, songs,
//! podcasts and collections, the three kinds of users, the revenue ledger and
//! the per-listener page navigation history.
//!
//! The [`Library`] is the single owner of every entity. Players and sessions
//! hold ids into it and receive it by reference for every operation.

pub mod error;
pub mod ledger;
pub mod library;
pub mod navigation;
pub mod removal;
pub mod render;
pub mod report;
pub mod stats;
pub mod types;

pub use error::{EncoreError, Result};
pub use ledger::RevenueLedger;
pub use library::{FollowOutcome, LikeOutcome, Library, PlaylistEdit};
pub use navigation::{NavigationHistory, Page, PageKind, PageSnapshot};
pub use report::ArtistRevenue;
pub use stats::{ArtistWrapped, Chart, HostWrapped, ListenerWrapped, Wrapped};
pub use types::*;
