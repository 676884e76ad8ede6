//! Decklist parsing and normalization.
//!
//! Every input format (pasted text and three deck-service payloads) ends up
//! as a `ParsedDecklist`: the draw pile and the commanders, disjoint.
//!
//! ## Key Types
//!
//! - `DeckSource`: which deck service a URL or payload belongs to
//! - `DeckPayload`: a raw service payload tagged with its source
//! - `ParsedDecklist`: normalized cards, ready to become a `Library`
//!
//! ## Parsers
//!
//! - `plain_text`: "copy as plain text" lists with sideboard/commander blocks
//! - `archidekt`, `moxfield`, `topdeck`: structured JSON per service, plus
//!   deck-id extraction from pasted URLs

pub mod archidekt;
pub mod fields;
pub mod moxfield;
pub mod plain_text;
pub mod topdeck;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Card;

pub use archidekt::{extract_archidekt_id, parse_archidekt_deck};
pub use moxfield::{extract_moxfield_id, parse_moxfield_deck};
pub use plain_text::parse_plain_text;
pub use topdeck::{extract_topdeck_ids, parse_topdeck_deck_obj, parse_topdeck_plain_text, TopdeckIds};

/// Cards parsed out of one decklist.
///
/// `commanders` never overlaps `library`; sideboard and maybeboard cards
/// are in neither.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDecklist {
    pub library: Vec<Card>,
    pub commanders: Vec<Card>,
}

impl ParsedDecklist {
    /// No cards at all in either section.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.library.is_empty() && self.commanders.is_empty()
    }

    /// Name of the first commander, used as the library's commander id.
    #[must_use]
    pub fn first_commander_name(&self) -> Option<String> {
        self.commanders.first().map(|c| c.name.clone())
    }
}

/// Deck-building services a deck can be loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckSource {
    Archidekt,
    Moxfield,
    TopDeck,
}

impl DeckSource {
    /// Sources in the order id extraction is attempted.
    pub const ALL: [DeckSource; 3] = [DeckSource::Archidekt, DeckSource::Moxfield, DeckSource::TopDeck];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DeckSource::Archidekt => "Archidekt",
            DeckSource::Moxfield => "Moxfield",
            DeckSource::TopDeck => "TopDeck",
        }
    }

    /// Title used when the payload carries no deck name.
    #[must_use]
    pub const fn default_deck_name(self) -> &'static str {
        match self {
            DeckSource::Archidekt => "Archidekt Deck",
            DeckSource::Moxfield => "Moxfield Deck",
            DeckSource::TopDeck => "TopDeck Deck",
        }
    }

    /// Does this source recognize a deck id in `input`?
    #[must_use]
    pub fn matches_id(self, input: &str) -> bool {
        match self {
            DeckSource::Archidekt => extract_archidekt_id(input).is_some(),
            DeckSource::Moxfield => extract_moxfield_id(input).is_some(),
            DeckSource::TopDeck => extract_topdeck_ids(input).is_some(),
        }
    }

    /// Guess the source of a pasted URL.
    ///
    /// Known hostnames win; otherwise each source's id extraction is tried
    /// in `ALL` order. Blank input is `None`.
    ///
    /// ```
    /// use mulligan_tool::decklist::DeckSource;
    ///
    /// assert_eq!(DeckSource::detect("https://www.moxfield.com/decks/abc"), Some(DeckSource::Moxfield));
    /// assert_eq!(DeckSource::detect("123456"), Some(DeckSource::Archidekt));
    /// assert_eq!(DeckSource::detect("   "), None);
    /// ```
    #[must_use]
    pub fn detect(input: &str) -> Option<DeckSource> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_lowercase();
        if lower.contains("archidekt") {
            return Some(DeckSource::Archidekt);
        }
        if lower.contains("moxfield") {
            return Some(DeckSource::Moxfield);
        }
        if lower.contains("topdeck.gg/deck") {
            return Some(DeckSource::TopDeck);
        }

        Self::ALL.into_iter().find(|source| source.matches_id(trimmed))
    }
}

impl std::fmt::Display for DeckSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw deck payload tagged with the service it came from.
#[derive(Clone, Debug, PartialEq)]
pub enum DeckPayload {
    /// `/api/decks/{id}/` response.
    Archidekt(Value),
    /// `/v2/decks/all/{id}` (or v3 `boards`) response.
    Moxfield(Value),
    /// A TopDeck `deckObj`.
    TopDeck(Value),
}

impl DeckPayload {
    #[must_use]
    pub fn source(&self) -> DeckSource {
        match self {
            DeckPayload::Archidekt(_) => DeckSource::Archidekt,
            DeckPayload::Moxfield(_) => DeckSource::Moxfield,
            DeckPayload::TopDeck(_) => DeckSource::TopDeck,
        }
    }

    /// Run the parser for this payload's source.
    #[must_use]
    pub fn parse(&self) -> ParsedDecklist {
        match self {
            DeckPayload::Archidekt(value) => parse_archidekt_deck(value),
            DeckPayload::Moxfield(value) => parse_moxfield_deck(value),
            DeckPayload::TopDeck(value) => parse_topdeck_deck_obj(value),
        }
    }
}

/// Most copies a single entry can expand to, whatever its source.
pub const MAX_COPIES: usize = u16::MAX as usize;

/// Push `quantity` copies of `card`, suffixing the id with the copy index.
/// Quantities above `MAX_COPIES` saturate.
pub(crate) fn push_copies(target: &mut Vec<Card>, card: &Card, id_prefix: &str, quantity: usize) {
    for copy in 0..quantity.min(MAX_COPIES) {
        target.push(card.clone().with_id(format!("{id_prefix}-{copy}")));
    }
}
