//! # mulligan-tool
//!
//! Decklist ingestion and opening-hand practice for four-player Commander
//! pods.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: Shuffling and drawing return a new `Library`
//!    and never touch the receiver, so any draw can be retried from the
//!    same snapshot.
//!
//! 2. **Lenient Parsing**: Deck services disagree on payload shape. Parsers
//!    walk fallback chains and skip what they cannot read instead of
//!    failing.
//!
//! 3. **Injected I/O**: Loaders only ever await a `Fetcher`, and every
//!    randomized operation takes a `DeckRng`.
//!
//! ## Modules
//!
//! - `core`: Cards, libraries and the seedable RNG
//! - `decklist`: Plain-text and Archidekt/Moxfield/TopDeck parsers, source
//!   detection
//! - `loaders`: URL-to-deck loaders, the `Fetcher` seam and settings
//! - `pod`: EDHTop16 commander data and pod rolling
//! - `error`: `DeckError`

pub mod core;
pub mod decklist;
pub mod error;
pub mod loaders;
pub mod pod;

// Re-export commonly used types
pub use crate::core::{Card, CardFields, DeckRng, Draw, Library, NameCounts, OPENING_HAND_SIZE};

pub use crate::decklist::{DeckPayload, DeckSource, ParsedDecklist};

pub use crate::error::{DeckError, Result};

pub use crate::loaders::{
    load_archidekt_deck, load_deck_from_url, load_moxfield_deck, load_plain_text_deck, load_topdeck_deck,
    FetchRequest, FetchResponse, Fetcher, LoadOptions, LoadedDeck, LoaderSettings, ReqwestFetcher,
};

pub use crate::pod::{roll_pod, EdhTop16Client, Pod, RankedCommander};
