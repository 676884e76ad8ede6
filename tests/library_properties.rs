//! Property tests for library draws and shuffles.
//!
//! Every operation must conserve cards: whatever leaves the library ends up
//! in the hand, exactly once.

use std::collections::HashSet;

use mulligan_tool::{Card, DeckRng, Library};
use proptest::prelude::*;

fn library_of(n: usize) -> Library {
    Library::new(
        "Props",
        None,
        (0..n).map(|i| Card::new(format!("Card {}", i % 7)).with_id(format!("id-{i}"))),
    )
}

fn id_set<'a>(cards: impl Iterator<Item = &'a Card>) -> Vec<String> {
    let mut ids: Vec<String> = cards.map(|c| c.id.clone()).collect();
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn prop_draw_conserves_cards(n in 0usize..120, k in 0usize..200) {
        let library = library_of(n);
        let drawn = library.draw(k);

        prop_assert_eq!(drawn.hand.len(), k.min(n));
        prop_assert_eq!(drawn.hand.len() + drawn.library.len(), n);

        let after = id_set(drawn.hand.iter().chain(drawn.library.cards()));
        prop_assert_eq!(after, id_set(library.cards()));
    }

    #[test]
    fn prop_shuffle_is_permutation(n in 0usize..120, seed in any::<u64>()) {
        let library = library_of(n);
        let shuffled = library.shuffled(&mut DeckRng::new(seed));

        prop_assert_eq!(shuffled.len(), n);
        prop_assert_eq!(id_set(shuffled.cards()), id_set(library.cards()));
        prop_assert_eq!(shuffled.name(), library.name());
    }

    #[test]
    fn prop_draw_random_is_exclusive(n in 0usize..80, seed in any::<u64>()) {
        let library = library_of(n);
        let drawn = library.draw_random(&mut DeckRng::new(seed));

        if n == 0 {
            prop_assert!(drawn.hand.is_empty());
            prop_assert!(drawn.library.is_empty());
        } else {
            prop_assert_eq!(drawn.hand.len(), 1);
            prop_assert_eq!(drawn.library.len(), n - 1);
            let picked = &drawn.hand[0].id;
            prop_assert!(drawn.library.cards().all(|c| &c.id != picked));
        }
    }

    #[test]
    fn prop_opening_hand_size(n in 0usize..100, seed in any::<u64>()) {
        let library = library_of(n);
        let opening = library.draw_opening_hand(7, &mut DeckRng::new(seed));

        prop_assert_eq!(opening.hand.len(), n.min(7));
        prop_assert_eq!(opening.library.len(), n.saturating_sub(7));
        let unique: HashSet<_> = opening.hand.iter().map(|c| c.id.clone()).collect();
        prop_assert_eq!(unique.len(), opening.hand.len());
    }
}

/// Every card should land in every position about equally often.
#[test]
fn test_shuffle_uniformity() {
    const N: usize = 5;
    const TRIALS: usize = 20_000;

    let library = library_of(N);
    let mut rng = DeckRng::new(2024);
    let mut counts = [[0usize; N]; N];

    for _ in 0..TRIALS {
        let shuffled = library.shuffled(&mut rng);
        for (position, card) in shuffled.cards().enumerate() {
            let index: usize = card.id.trim_start_matches("id-").parse().unwrap();
            counts[index][position] += 1;
        }
    }

    let expected = TRIALS / N;
    for row in &counts {
        for &count in row {
            let deviation = count.abs_diff(expected);
            assert!(deviation < expected / 10, "count {count} too far from {expected}");
        }
    }
}

/// `draw_random` has no bias toward the top of the library.
#[test]
fn test_draw_random_uniformity() {
    const N: usize = 4;
    const TRIALS: usize = 8_000;

    let library = library_of(N);
    let mut rng = DeckRng::new(77);
    let mut hits = [0usize; N];

    for _ in 0..TRIALS {
        let drawn = library.draw_random(&mut rng);
        let index: usize = drawn.hand[0].id.trim_start_matches("id-").parse().unwrap();
        hits[index] += 1;
    }

    let expected = TRIALS / N;
    assert!(hits.iter().all(|&h| h.abs_diff(expected) < expected / 10), "{hits:?}");
}
