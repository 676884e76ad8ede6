//! Core draw model: cards, libraries and the RNG that drives them.
//!
//! Nothing in this module performs I/O or returns errors.

pub mod card;
pub mod library;
pub mod rng;

pub use card::{Card, CardFields};
pub use library::{Draw, Library, NameCounts, MAX_OPENING_HAND_ATTEMPTS, OPENING_HAND_SIZE};
pub use rng::DeckRng;
