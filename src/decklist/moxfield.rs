//! Moxfield decks.
//!
//! Two payload shapes are accepted:
//!
//! - v2 (`/v2/decks/all/{id}`): top-level board maps such as `mainboard`,
//!   `sideboard`, `maybeboard` and `commanders`
//! - v3: `boards.{board}.cards`
//!
//! Either way a board maps some key (the card name in v2, an opaque id in v3)
//! to `{ quantity, boardType?, card: { name, scryfall_id, ... } }`.

use serde_json::{Map, Value};

use crate::core::Card;

use super::archidekt::{segment_after, url_segments};
use super::fields::{self, FieldChain};
use super::{push_copies, ParsedDecklist};

const V2_BOARDS: &[&str] = &["commanders", "mainboard", "sideboard", "maybeboard", "companions"];

const NAME_CHAIN: FieldChain = &["/card/faces/0/name", "/card/oracle_name", "/card/name"];
const SCRYFALL_ID_CHAIN: FieldChain = &["/card/scryfall_id", "/card/scryfallId"];
const ILLUSTRATION_ID_CHAIN: FieldChain = &["/card/illustration_id", "/card/illustrationId"];
const IMAGE_URL_CHAIN: FieldChain = &["/card/image_url", "/card/imageUrl"];
const QUANTITY_CHAIN: FieldChain = &["/quantity", "/count"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Board {
    Library,
    Commanders,
    Excluded,
}

fn classify_board(name: &str) -> Board {
    let name = name.trim().to_lowercase();
    if name.contains("commander") {
        Board::Commanders
    } else if matches!(name.as_str(), "mainboard" | "main" | "deck") {
        Board::Library
    } else {
        Board::Excluded
    }
}

/// Extract a Moxfield public deck id from a deck URL or a bare id.
///
/// ```
/// use mulligan_tool::decklist::extract_moxfield_id;
///
/// assert_eq!(extract_moxfield_id("https://moxfield.com/decks/abcd1234"), Some("abcd1234".to_string()));
/// assert_eq!(extract_moxfield_id("abcd1234"), Some("abcd1234".to_string()));
/// assert_eq!(extract_moxfield_id("https://moxfield.com/users/someone"), None);
/// ```
#[must_use]
pub fn extract_moxfield_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if let Some(segments) = url_segments(trimmed) {
        return segment_after(&segments, "decks");
    }

    let looks_like_id = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    looks_like_id.then(|| trimmed.to_string())
}

/// Parse a Moxfield deck payload.
#[must_use]
pub fn parse_moxfield_deck(data: &Value) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();

    for (board_name, entries) in boards(data) {
        for (idx, (key, entry)) in entries.iter().enumerate() {
            if !entry.is_object() {
                continue;
            }
            let board = fields::first_text(entry, &["/boardType"]).unwrap_or(board_name);
            let target = match classify_board(board) {
                Board::Library => &mut parsed.library,
                Board::Commanders => &mut parsed.commanders,
                Board::Excluded => continue,
            };

            let Some(name) = fields::first_text(entry, NAME_CHAIN).or_else(|| non_empty(key)) else {
                continue;
            };
            let Some(quantity) = quantity(entry) else {
                continue;
            };

            let card = Card::new(name).with_printing(
                fields::text_or_empty(entry, SCRYFALL_ID_CHAIN),
                fields::text_or_empty(entry, ILLUSTRATION_ID_CHAIN),
                fields::text_or_empty(entry, IMAGE_URL_CHAIN),
            );
            push_copies(target, &card, &format!("{name}-{board_name}-{idx}"), quantity);
        }
    }

    tracing::debug!(
        library = parsed.library.len(),
        commanders = parsed.commanders.len(),
        "parsed moxfield deck"
    );
    parsed
}

/// Board name and entry map for every board in the payload.
fn boards(data: &Value) -> Vec<(&str, &Map<String, Value>)> {
    if let Some(boards) = data.get("boards").and_then(Value::as_object) {
        return boards
            .iter()
            .filter_map(|(name, board)| {
                let cards = board.get("cards")?.as_object()?;
                Some((name.as_str(), cards))
            })
            .collect();
    }

    V2_BOARDS
        .iter()
        .filter_map(|&name| Some((name, data.get(name)?.as_object()?)))
        .collect()
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Missing quantities count as one copy; zero, negative or unreadable
/// quantities drop the entry.
fn quantity(entry: &Value) -> Option<usize> {
    match fields::first_present(entry, QUANTITY_CHAIN) {
        None => Some(1),
        Some(value) => fields::as_quantity(value)
            .filter(|&n| n > 0)
            .map(|n| n as usize),
    }
}
