//! Property-based tests for page navigation history
//!
//! Drives the history with random operation sequences and checks it against a
//! plain two-stack model.

use encore_core::{EncoreError, NavigationHistory, Page, PageKind};
use proptest::prelude::*;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Navigate(Page),
    Back,
    Forward,
}

fn arbitrary_page() -> impl Strategy<Value = Page> {
    (
        prop_oneof![
            Just(PageKind::Home),
            Just(PageKind::LikedContent),
            Just(PageKind::Artist),
            Just(PageKind::Host),
        ],
        "[a-z]{1,6}",
    )
        .prop_map(|(kind, owner)| Page::new(kind, owner))
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => arbitrary_page().prop_map(Op::Navigate),
        1 => Just(Op::Back),
        1 => Just(Op::Forward),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: back after navigate(X) from P returns to P, forward returns to X
    #[test]
    fn back_and_forward_undo_each_other(
        prefix in prop::collection::vec(arbitrary_page(), 0..10),
        target in arbitrary_page(),
    ) {
        let mut history = NavigationHistory::new("alice");
        for page in prefix {
            history.navigate_to(page);
        }
        let origin = history.current().clone();

        history.navigate_to(target.clone());
        prop_assert!(!history.can_go_forward());

        prop_assert_eq!(history.go_back().unwrap(), &origin);
        prop_assert_eq!(history.go_forward().unwrap(), &target);
        prop_assert!(!history.can_go_forward());
    }

    /// Property: history behaves exactly like a two-stack model
    #[test]
    fn matches_two_stack_model(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let mut history = NavigationHistory::new("alice");
        let mut current = Page::home("alice");
        let mut back: Vec<Page> = Vec::new();
        let mut forward: Vec<Page> = Vec::new();

        for op in ops {
            match op {
                Op::Navigate(page) => {
                    history.navigate_to(page.clone());
                    back.push(std::mem::replace(&mut current, page));
                    forward.clear();
                }
                Op::Back => match back.pop() {
                    Some(page) => {
                        prop_assert_eq!(history.go_back().unwrap(), &page);
                        forward.push(std::mem::replace(&mut current, page));
                    }
                    None => {
                        prop_assert_eq!(history.go_back(), Err(EncoreError::NoPreviousPage));
                    }
                },
                Op::Forward => match forward.pop() {
                    Some(page) => {
                        prop_assert_eq!(history.go_forward().unwrap(), &page);
                        back.push(std::mem::replace(&mut current, page));
                    }
                    None => {
                        prop_assert_eq!(history.go_forward(), Err(EncoreError::NoNextPage));
                    }
                },
            }
            prop_assert_eq!(history.current(), &current);
            prop_assert_eq!(history.depth(), back.len());
            prop_assert_eq!(history.can_go_forward(), !forward.is_empty());
        }
    }
}
