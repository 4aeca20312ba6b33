//! Seeded shuffle for song collections
//!
//! The shuffled order is never stored. It is rebuilt from the seed and the
//! collection size whenever it is needed, so the same seed and size always
//! give the same play order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Play order of a collection of `len` songs
///
/// Slot `k` of the result is the unshuffled index of the song played `k`-th.
/// Without a seed the order is the identity.
pub fn play_order(len: usize, seed: Option<u64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }
    order
}

/// Slot in `order` holding the unshuffled index `track`
pub fn slot_of(order: &[usize], track: usize) -> Option<usize> {
    order.iter().position(|&index| index == track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unseeded_order_is_identity() {
        assert_eq!(play_order(4, None), vec![0, 1, 2, 3]);
    }

    #[test]
    fn seeded_order_is_a_permutation() {
        let order = play_order(50, Some(7));
        let unique: HashSet<_> = order.iter().copied().collect();
        assert_eq!(order.len(), 50);
        assert_eq!(unique.len(), 50);
        assert!(order.iter().all(|&i| i < 50));
    }

    #[test]
    fn same_seed_same_order() {
        assert_eq!(play_order(20, Some(42)), play_order(20, Some(42)));
    }

    #[test]
    fn different_seeds_usually_differ() {
        let orders: HashSet<Vec<usize>> = (0..10).map(|seed| play_order(20, Some(seed))).collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn slot_lookup() {
        let order = vec![2, 0, 1];
        assert_eq!(slot_of(&order, 0), Some(1));
        assert_eq!(slot_of(&order, 3), None);
    }

    #[test]
    fn empty_collection() {
        assert!(play_order(0, Some(1)).is_empty());
    }
}
