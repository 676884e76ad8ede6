//! Library: the shuffleable draw pile of a deck.
//!
//! Every operation is pure. Shuffling or drawing returns a new `Library`
//! (and the drawn cards) and leaves the receiver untouched, so a caller can
//! retry a draw from the same snapshot as often as it likes.
//!
//! Cards live in an `im::Vector`, so each returned snapshot shares
//! structure with its parent and cloning is O(1).
//!
//! ```
//! use mulligan_tool::core::{Card, DeckRng, Library};
//!
//! let library = Library::new("Demo", None, (0..10).map(|i| Card::new(format!("Card {i}"))));
//! let mut rng = DeckRng::new(1);
//!
//! let opening = library.draw_opening_hand(7, &mut rng);
//! assert_eq!(opening.hand.len(), 7);
//! assert_eq!(opening.library.len(), 3);
//!
//! // The original snapshot is unchanged.
//! assert_eq!(library.len(), 10);
//! ```

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::rng::DeckRng;

/// Conventional opening hand size.
pub const OPENING_HAND_SIZE: usize = 7;

/// Attempts made by `draw_opening_hand_checked` before accepting a hand.
pub const MAX_OPENING_HAND_ATTEMPTS: usize = 3;

const DEFAULT_LIBRARY_NAME: &str = "Untitled Library";

/// Copies per card name.
pub type NameCounts = FxHashMap<String, usize>;

/// An ordered draw pile. Index 0 is the top of the library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LibraryData")]
pub struct Library {
    name: String,
    /// Name of the associated commander. Display only.
    commander_id: Option<String>,
    cards: Vector<Card>,
}

/// Wire form of a `Library`; deserialized libraries go through `Library::new`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LibraryData {
    name: String,
    commander_id: Option<String>,
    cards: Vector<Card>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            name: String::new(),
            commander_id: None,
            cards: Vector::new(),
        }
    }
}

impl From<LibraryData> for Library {
    fn from(data: LibraryData) -> Self {
        Library::new(data.name, data.commander_id, data.cards)
    }
}

/// Result of a draw: the drawn cards and the library left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    pub hand: Vec<Card>,
    pub library: Library,
}

impl Library {
    /// Create a library. An empty name becomes "Untitled Library".
    pub fn new(
        name: impl Into<String>,
        commander_id: Option<String>,
        cards: impl IntoIterator<Item = Card>,
    ) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                DEFAULT_LIBRARY_NAME.to_string()
            } else {
                name
            },
            commander_id,
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn commander_id(&self) -> Option<&str> {
        self.commander_id.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from top to bottom.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Same name and commander, different cards.
    fn with_cards(&self, cards: Vector<Card>) -> Self {
        Self {
            name: self.name.clone(),
            commander_id: self.commander_id.clone(),
            cards,
        }
    }

    /// Return a uniformly shuffled copy.
    #[must_use]
    pub fn shuffled(&self, rng: &mut DeckRng) -> Self {
        let mut next: Vec<Card> = self.cards.iter().cloned().collect();
        rng.fisher_yates(&mut next);
        self.with_cards(next.into_iter().collect())
    }

    /// Draw `count` cards from the top, in order.
    ///
    /// Requests larger than the library draw everything; zero draws nothing.
    #[must_use]
    pub fn draw(&self, count: usize) -> Draw {
        let n = count.min(self.cards.len());
        let mut hand = self.cards.clone();
        let rest = hand.split_off(n);

        Draw {
            hand: hand.into_iter().collect(),
            library: self.with_cards(rest),
        }
    }

    /// Shuffle, then draw `size` from the top.
    #[must_use]
    pub fn draw_opening_hand(&self, size: usize, rng: &mut DeckRng) -> Draw {
        self.shuffled(rng).draw(size)
    }

    /// Draw one card at a uniformly random position without shuffling.
    ///
    /// The remaining cards keep their relative order. An empty library
    /// yields an empty hand.
    #[must_use]
    pub fn draw_random(&self, rng: &mut DeckRng) -> Draw {
        if self.cards.is_empty() {
            return Draw {
                hand: Vec::new(),
                library: self.with_cards(Vector::new()),
            };
        }

        let idx = rng.gen_index(self.cards.len());
        let mut rest = self.cards.clone();
        let card = rest.remove(idx);

        Draw {
            hand: vec![card],
            library: self.with_cards(rest),
        }
    }

    /// Number of copies of each card name.
    #[must_use]
    pub fn name_counts(&self) -> NameCounts {
        count_names(self.cards.iter())
    }

    /// Draw an opening hand, retrying when a singleton shows up twice.
    ///
    /// `deck_counts` are the per-name counts of the deck as loaded (see
    /// `name_counts`). A hand is rejected when a name counted at most once
    /// there appears more than once in the hand. That only happens with bad
    /// upstream data, so after `MAX_OPENING_HAND_ATTEMPTS` the last hand is
    /// kept anyway.
    #[must_use]
    pub fn draw_opening_hand_checked(
        &self,
        size: usize,
        deck_counts: &NameCounts,
        rng: &mut DeckRng,
    ) -> Draw {
        let mut attempt = 1;

        loop {
            let opening = self.draw_opening_hand(size, rng);

            match first_duplicated_singleton(&opening.hand, deck_counts) {
                None => return opening,
                Some(name) if attempt >= MAX_OPENING_HAND_ATTEMPTS => {
                    tracing::warn!(card = %name, attempts = attempt, "keeping opening hand with duplicated singleton");
                    return opening;
                }
                Some(name) => {
                    tracing::warn!(card = %name, attempt, "duplicated singleton in opening hand, redrawing");
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new("", None, std::iter::empty())
    }
}

fn count_names<'a>(cards: impl Iterator<Item = &'a Card>) -> NameCounts {
    let mut counts = NameCounts::default();
    for card in cards.filter(|c| !c.name.is_empty()) {
        *counts.entry(card.name.clone()).or_insert(0) += 1;
    }
    counts
}

fn first_duplicated_singleton(hand: &[Card], deck_counts: &NameCounts) -> Option<String> {
    count_names(hand.iter())
        .into_iter()
        .find(|(name, count)| *count > 1 && deck_counts.get(name).copied().unwrap_or(0) <= 1)
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("Card {i}")).with_id(format!("c{i}")))
            .collect()
    }

    fn ids(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    fn library_ids(library: &Library) -> Vec<String> {
        library.cards().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_defaults() {
        let library = Library::default();
        assert_eq!(library.name(), "Untitled Library");
        assert_eq!(library.commander_id(), None);
        assert!(library.is_empty());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let library: Library = serde_json::from_str(r#"{ "name": "", "cards": [] }"#).unwrap();
        assert_eq!(library.name(), "Untitled Library");
        assert_eq!(library.commander_id(), None);

        let bare: Library = serde_json::from_str("{}").unwrap();
        assert_eq!(bare, Library::default());
    }

    #[test]
    fn test_serde_keeps_cards_and_commander() {
        let library = Library::new("Blue Farm", Some("Tymna the Weaver".to_string()), sample_cards(3));
        let json = serde_json::to_string(&library).unwrap();
        assert!(json.contains("\"commanderId\""));

        let back: Library = serde_json::from_str(&json).unwrap();
        assert_eq!(back, library);
    }

    #[test]
    fn test_shuffle_does_not_mutate() {
        let library = Library::new("Test", None, sample_cards(20));
        let before = library_ids(&library);

        let mut rng = DeckRng::new(42);
        let shuffled = library.shuffled(&mut rng);

        assert_eq!(library_ids(&library), before);
        assert_eq!(shuffled.len(), 20);
        assert_ne!(library_ids(&shuffled), before);

        let mut sorted = library_ids(&shuffled);
        sorted.sort();
        let mut expected = before.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_draw_takes_from_top_in_order() {
        let library = Library::new("Test", Some("Tymna".to_string()), sample_cards(3));
        let draw = library.draw(2);

        assert_eq!(ids(&draw.hand), vec!["c0", "c1"]);
        assert_eq!(library_ids(&draw.library), vec!["c2"]);
        assert_eq!(draw.library.name(), "Test");
        assert_eq!(draw.library.commander_id(), Some("Tymna"));
    }

    #[test]
    fn test_draw_caps_at_library_size() {
        let library = Library::new("Test", None, sample_cards(2));
        let draw = library.draw(5);

        assert_eq!(draw.hand.len(), 2);
        assert!(draw.library.is_empty());
    }

    #[test]
    fn test_draw_zero() {
        let library = Library::new("Test", None, sample_cards(4));
        let draw = library.draw(0);

        assert!(draw.hand.is_empty());
        assert_eq!(draw.library, library);
    }

    #[test]
    fn test_draw_random_preserves_order() {
        let library = Library::new("Test", None, sample_cards(6));
        let mut rng = DeckRng::new(9);
        let draw = library.draw_random(&mut rng);

        assert_eq!(draw.hand.len(), 1);
        assert_eq!(draw.library.len(), 5);

        let drawn = &draw.hand[0].id;
        let expected: Vec<String> = library_ids(&library)
            .into_iter()
            .filter(|id| id != drawn)
            .collect();
        assert_eq!(library_ids(&draw.library), expected);
    }

    #[test]
    fn test_draw_random_empty() {
        let library = Library::new("Empty", Some("Kraum".to_string()), Vec::new());
        let mut rng = DeckRng::new(1);
        let draw = library.draw_random(&mut rng);

        assert!(draw.hand.is_empty());
        assert!(draw.library.is_empty());
        assert_eq!(draw.library.name(), "Empty");
        assert_eq!(draw.library.commander_id(), Some("Kraum"));
    }

    #[test]
    fn test_opening_hand_sizes() {
        let mut rng = DeckRng::new(5);

        let big = Library::new("Big", None, sample_cards(10));
        let opening = big.draw_opening_hand(OPENING_HAND_SIZE, &mut rng);
        assert_eq!(opening.hand.len(), 7);
        assert_eq!(opening.library.len(), 3);

        let small = Library::new("Small", None, sample_cards(4));
        let opening = small.draw_opening_hand(OPENING_HAND_SIZE, &mut rng);
        assert_eq!(opening.hand.len(), 4);
        assert!(opening.library.is_empty());
    }

    #[test]
    fn test_name_counts() {
        let cards = vec![
            Card::new("Island").with_id("i0"),
            Card::new("Island").with_id("i1"),
            Card::new("Sol Ring"),
        ];
        let library = Library::new("Counts", None, cards);
        let counts = library.name_counts();

        assert_eq!(counts.get("Island"), Some(&2));
        assert_eq!(counts.get("Sol Ring"), Some(&1));
    }

    #[test]
    fn test_checked_hand_accepts_clean_hand() {
        let library = Library::new("Clean", None, sample_cards(30));
        let counts = library.name_counts();
        let mut rng = DeckRng::new(11);
        let opening = library.draw_opening_hand_checked(OPENING_HAND_SIZE, &counts, &mut rng);

        assert_eq!(opening.hand.len(), 7);
        assert_eq!(opening.library.len(), 23);
    }

    #[test]
    fn test_duplicated_singleton_detection() {
        let library = Library::new(
            "Dupes",
            None,
            vec![
                Card::new("Island").with_id("i0"),
                Card::new("Island").with_id("i1"),
                Card::new("Sol Ring"),
            ],
        );
        let counts = library.name_counts();

        let legal = vec![Card::new("Island").with_id("i0"), Card::new("Island").with_id("i1")];
        assert_eq!(first_duplicated_singleton(&legal, &counts), None);

        let bad = vec![Card::new("Sol Ring"), Card::new("Sol Ring").with_id("again")];
        assert_eq!(first_duplicated_singleton(&bad, &counts), Some("Sol Ring".to_string()));
    }

    #[test]
    fn test_checked_hand_redraws_after_rejection() {
        // Two Sol Rings against counts that allow one: a two-card hand is
        // rejected only when it holds both.
        let library = Library::new(
            "Redraw",
            None,
            vec![
                Card::new("Sol Ring").with_id("s0"),
                Card::new("Sol Ring").with_id("s1"),
                Card::new("Island").with_id("i0"),
            ],
        );
        let mut counts = NameCounts::default();
        counts.insert("Sol Ring".to_string(), 1);
        counts.insert("Island".to_string(), 1);

        // Find a seed whose first hand is rejected and second accepted.
        let (seed, expected) = (0..500u64)
            .find_map(|seed| {
                let mut rng = DeckRng::new(seed);
                let first = library.draw_opening_hand(2, &mut rng);
                let second = library.draw_opening_hand(2, &mut rng);
                let rejected = first_duplicated_singleton(&first.hand, &counts).is_some();
                let accepted = first_duplicated_singleton(&second.hand, &counts).is_none();
                (rejected && accepted).then_some((seed, second))
            })
            .expect("some seed rejects exactly once");

        let mut rng = DeckRng::new(seed);
        let opening = library.draw_opening_hand_checked(2, &counts, &mut rng);

        assert_eq!(opening, expected);
        assert!(opening.hand.iter().any(|c| c.name == "Island"));
        assert_eq!(opening.library.len(), 1);
    }

    #[test]
    fn test_checked_hand_keeps_last_draw_after_retries() {
        // Counts claim a singleton, the library holds two copies.
        let library = Library::new(
            "Broken",
            None,
            vec![Card::new("Sol Ring").with_id("s0"), Card::new("Sol Ring").with_id("s1")],
        );
        let mut counts = NameCounts::default();
        counts.insert("Sol Ring".to_string(), 1);

        let mut rng = DeckRng::new(2);
        let opening = library.draw_opening_hand_checked(OPENING_HAND_SIZE, &counts, &mut rng);

        assert_eq!(opening.hand.len(), 2);
        assert!(opening.library.is_empty());
    }
}
