//! Page navigation history
//!
//! Every listener browses exactly one page at a time. Leaving a page pushes a
//! snapshot of it so that `previousPage`/`nextPage` can walk back and forth.

use crate::error::{EncoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of page a listener can be looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    Home,
    LikedContent,
    Artist,
    Host,
}

impl PageKind {
    /// Parse the `nextPage` field of a `changePage` command
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Home" => Some(Self::Home),
            "LikedContent" => Some(Self::LikedContent),
            "Artist" => Some(Self::Artist),
            "Host" => Some(Self::Host),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::LikedContent => "LikedContent",
            Self::Artist => "Artist",
            Self::Host => "Host",
        }
    }
}

/// A page: its kind plus the user whose content it shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    kind: PageKind,
    owner: String,
}

impl Page {
    pub fn new(kind: PageKind, owner: impl Into<String>) -> Self {
        Self {
            kind,
            owner: owner.into(),
        }
    }

    pub fn home(owner: impl Into<String>) -> Self {
        Self::new(PageKind::Home, owner)
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Freeze this page for the history stacks
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot(self.clone())
    }
}

/// Immutable copy of a page kept on a history stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot(Page);

impl PageSnapshot {
    pub fn page(&self) -> &Page {
        &self.0
    }

    fn restore(self) -> Page {
        self.0
    }
}

/// Back/forward history over the current page
///
/// Two stacks, most recent on top. Navigating somewhere new clears the forward
/// stack; moving back or forward never clears the opposite one.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    current: Page,
    previous: Vec<PageSnapshot>,
    next: Vec<PageSnapshot>,
}

impl NavigationHistory {
    /// Start on the owner's home page with empty stacks
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            current: Page::home(owner),
            previous: Vec::new(),
            next: Vec::new(),
        }
    }

    pub fn current(&self) -> &Page {
        &self.current
    }

    /// Move to `page`, remembering the current one
    pub fn navigate_to(&mut self, page: Page) {
        debug!(from = ?self.current, to = ?page, "Navigating to page");
        self.previous.push(self.current.snapshot());
        self.next.clear();
        self.current = page;
    }

    /// Return to the page visited before the current one
    pub fn go_back(&mut self) -> Result<&Page> {
        let snapshot = self.previous.pop().ok_or(EncoreError::NoPreviousPage)?;
        self.next.push(self.current.snapshot());
        self.current = snapshot.restore();
        Ok(&self.current)
    }

    /// Redo a navigation undone by [`go_back`](Self::go_back)
    pub fn go_forward(&mut self) -> Result<&Page> {
        let snapshot = self.next.pop().ok_or(EncoreError::NoNextPage)?;
        self.previous.push(self.current.snapshot());
        self.current = snapshot.restore();
        Ok(&self.current)
    }

    pub fn can_go_back(&self) -> bool {
        !self.previous.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.next.is_empty()
    }

    /// Number of pages behind the current one
    pub fn depth(&self) -> usize {
        self.previous.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(name: &str) -> Page {
        Page::new(PageKind::Artist, name)
    }

    #[test]
    fn starts_home_with_nowhere_to_go() {
        let mut history = NavigationHistory::new("alice");
        assert_eq!(history.current(), &Page::home("alice"));
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
        assert_eq!(history.go_back(), Err(EncoreError::NoPreviousPage));
        assert_eq!(history.go_forward(), Err(EncoreError::NoNextPage));
    }

    #[test]
    fn back_then_forward() {
        let mut history = NavigationHistory::new("alice");
        history.navigate_to(artist("band"));

        assert_eq!(history.go_back().unwrap(), &Page::home("alice"));
        assert!(history.can_go_forward());
        assert_eq!(history.go_forward().unwrap(), &artist("band"));
        assert!(!history.can_go_forward());
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn navigating_clears_forward_stack() {
        let mut history = NavigationHistory::new("alice");
        history.navigate_to(artist("band"));
        history.go_back().unwrap();

        history.navigate_to(Page::new(PageKind::LikedContent, "alice"));
        assert!(!history.can_go_forward());
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn going_back_keeps_earlier_pages() {
        let mut history = NavigationHistory::new("alice");
        history.navigate_to(artist("one"));
        history.navigate_to(artist("two"));
        history.navigate_to(Page::new(PageKind::Host, "radio"));

        history.go_back().unwrap();
        history.go_back().unwrap();
        assert_eq!(history.current(), &artist("one"));
        assert!(history.can_go_back());
        history.go_forward().unwrap();
        assert_eq!(history.current(), &artist("two"));
    }

    #[test]
    fn page_kind_parses_change_page_targets() {
        assert_eq!(PageKind::parse("LikedContent"), Some(PageKind::LikedContent));
        assert_eq!(PageKind::parse("Settings"), None);
        assert_eq!(PageKind::Host.as_str(), "Host");
    }
}
