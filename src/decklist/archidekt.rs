//! Archidekt decks.
//!
//! `GET /api/decks/{id}/` returns `{ name, cards: [entry] }` where each entry
//! looks like
//!
//! ```json
//! { "quantity": 1, "categories": ["Commander"],
//!   "card": { "uid": "...", "oracleCard": { "name": "Tymna the Weaver" } } }
//! ```
//!
//! Board membership comes from category tags, `board`/`section` strings and
//! explicit `sideboard`/`maybeboard` flags.

use serde_json::Value;

use crate::core::Card;

use super::fields::{self, FieldChain};
use super::{push_copies, ParsedDecklist};

const NAME_CHAIN: FieldChain = &[
    "/card/oracleCard/name",
    "/card/name",
    "/card/frontFace/name",
    "/card/backFace/name",
    "/card/uidName",
];
const SCRYFALL_ID_CHAIN: FieldChain = &["/card/uid", "/card/scryfallId"];
const ILLUSTRATION_ID_CHAIN: FieldChain = &["/card/illustration_id", "/card/illustrationId"];
const IMAGE_URL_CHAIN: FieldChain = &["/card/image_url", "/card/imageUrl"];
const QUANTITY_CHAIN: FieldChain = &["/quantity", "/count"];

/// Extract an Archidekt deck id from a deck URL or a bare numeric id.
///
/// ```
/// use mulligan_tool::decklist::extract_archidekt_id;
///
/// assert_eq!(extract_archidekt_id("https://archidekt.com/decks/123456/pod"), Some("123456".to_string()));
/// assert_eq!(extract_archidekt_id(" 123456 "), Some("123456".to_string()));
/// assert_eq!(extract_archidekt_id("not-a-deck"), None);
/// ```
#[must_use]
pub fn extract_archidekt_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if let Some(segments) = url_segments(trimmed) {
        if let Some(id) = segment_after(&segments, "decks") {
            return Some(id);
        }
    }

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(trimmed.to_string());
    }
    None
}

/// Non-empty path segments of an absolute URL, or `None` if `input` isn't one.
pub(crate) fn url_segments(input: &str) -> Option<Vec<String>> {
    let url = reqwest::Url::parse(input).ok()?;
    Some(
        url.path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// The segment right after the first `marker` (case-insensitive).
pub(crate) fn segment_after(segments: &[String], marker: &str) -> Option<String> {
    let idx = segments.iter().position(|s| s.eq_ignore_ascii_case(marker))?;
    segments.get(idx + 1).cloned()
}

/// Parse an Archidekt deck payload.
#[must_use]
pub fn parse_archidekt_deck(data: &Value) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();
    let Some(entries) = data.get("cards").and_then(Value::as_array) else {
        return parsed;
    };

    for (idx, entry) in entries.iter().enumerate() {
        if !entry.is_object() || is_excluded(entry) {
            continue;
        }
        let Some(name) = fields::first_text(entry, NAME_CHAIN) else {
            continue;
        };

        let card = Card::new(name).with_printing(
            fields::text_or_empty(entry, SCRYFALL_ID_CHAIN),
            fields::text_or_empty(entry, ILLUSTRATION_ID_CHAIN),
            fields::text_or_empty(entry, IMAGE_URL_CHAIN),
        );
        let target = if is_commander(entry) {
            &mut parsed.commanders
        } else {
            &mut parsed.library
        };
        push_copies(target, &card, &format!("{name}-{idx}"), quantity(entry));
    }

    tracing::debug!(
        library = parsed.library.len(),
        commanders = parsed.commanders.len(),
        "parsed archidekt deck"
    );
    parsed
}

/// Missing, zero or unreadable quantities count as one copy; negative
/// quantities add nothing.
fn quantity(entry: &Value) -> usize {
    fields::first_present(entry, QUANTITY_CHAIN)
        .and_then(fields::as_quantity)
        .filter(|&n| n != 0)
        .map_or(1, |n| n.max(0) as usize)
}

fn board_label(entry: &Value) -> String {
    fields::first_text(entry, &["/board", "/section"])
        .unwrap_or_default()
        .to_lowercase()
}

fn is_excluded(entry: &Value) -> bool {
    let categories = fields::lowercase_strings(entry.get("categories"));
    let board = board_label(entry);

    let sideboard = fields::is_truthy(entry.get("sideboard"))
        || categories.iter().any(|c| c.contains("sideboard"))
        || board.contains("sideboard");
    let maybeboard = fields::is_truthy(entry.get("maybeboard"))
        || categories.iter().any(|c| c.contains("maybe"))
        || board.contains("maybe");

    sideboard || maybeboard
}

fn is_commander(entry: &Value) -> bool {
    fields::lowercase_strings(entry.get("categories"))
        .iter()
        .any(|c| c.contains("commander"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decklist::MAX_COPIES;
    use serde_json::json;

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_board_exclusion() {
        let data = json!({
            "name": "Test",
            "cards": [
                { "quantity": 2, "categories": ["Ramp"], "card": { "oracleCard": { "name": "Card A" } } },
                { "quantity": 1, "categories": ["Sideboard"], "card": { "oracleCard": { "name": "Card B" } } },
                { "quantity": 1, "categories": ["Commander"], "card": { "oracleCard": { "name": "Card C" } } }
            ]
        });
        let parsed = parse_archidekt_deck(&data);

        assert_eq!(names(&parsed.library), vec!["Card A", "Card A"]);
        assert_ne!(parsed.library[0].id, parsed.library[1].id);
        assert_eq!(names(&parsed.commanders), vec!["Card C"]);
    }

    #[test]
    fn test_maybeboard_flags_and_boards() {
        let data = json!({
            "cards": [
                { "quantity": 1, "maybeboard": true, "card": { "name": "Flagged" } },
                { "quantity": 1, "board": "Maybeboard", "card": { "name": "Boarded" } },
                { "quantity": 1, "section": "sideboard", "card": { "name": "Sectioned" } },
                { "quantity": 1, "categories": ["Maybe"], "card": { "name": "Tagged" } },
                { "quantity": 1, "card": { "name": "Kept" } }
            ]
        });
        let parsed = parse_archidekt_deck(&data);

        assert_eq!(names(&parsed.library), vec!["Kept"]);
        assert!(parsed.commanders.is_empty());
    }

    #[test]
    fn test_name_fallback_chain() {
        let data = json!({
            "cards": [
                { "card": { "frontFace": { "name": "Front" }, "backFace": { "name": "Back" } } },
                { "card": { "uidName": "Uid Name" } },
                { "card": { "oracleCard": { "name": "" }, "name": "Plain" } },
                { "card": {} },
                null
            ]
        });
        let parsed = parse_archidekt_deck(&data);

        assert_eq!(names(&parsed.library), vec!["Front", "Uid Name", "Plain"]);
    }

    #[test]
    fn test_quantity_defaults() {
        let data = json!({
            "cards": [
                { "card": { "name": "Missing" } },
                { "quantity": 0, "card": { "name": "Zero" } },
                { "count": "3", "card": { "name": "Counted" } },
                { "quantity": "lots", "card": { "name": "Garbage" } }
            ]
        });
        let parsed = parse_archidekt_deck(&data);

        assert_eq!(
            names(&parsed.library),
            vec!["Missing", "Zero", "Counted", "Counted", "Counted", "Garbage"]
        );
    }

    #[test]
    fn test_huge_quantity_is_capped() {
        let data = json!({
            "cards": [
                { "quantity": 1e15, "card": { "name": "Island" } },
                { "quantity": "100000", "card": { "name": "Forest" } }
            ]
        });
        let parsed = parse_archidekt_deck(&data);

        let islands = parsed.library.iter().filter(|c| c.name == "Island").count();
        let forests = parsed.library.iter().filter(|c| c.name == "Forest").count();
        assert_eq!(islands, MAX_COPIES);
        assert_eq!(forests, MAX_COPIES);
    }

    #[test]
    fn test_printing_fields() {
        let data = json!({
            "cards": [{
                "quantity": 1,
                "card": {
                    "uid": "scry-1",
                    "illustration_id": "ill-1",
                    "imageUrl": "https://img.example/1.jpg",
                    "oracleCard": { "name": "Sol Ring" }
                }
            }]
        });
        let parsed = parse_archidekt_deck(&data);
        let card = &parsed.library[0];

        assert_eq!(card.scryfall_id, "scry-1");
        assert_eq!(card.illustration_id, "ill-1");
        assert_eq!(card.custom_image_url, "https://img.example/1.jpg");
        assert_eq!(card.id, "Sol Ring-0-0");
    }

    #[test]
    fn test_missing_cards_array() {
        assert!(parse_archidekt_deck(&json!({})).is_empty());
        assert!(parse_archidekt_deck(&json!(null)).is_empty());
    }

    #[test]
    fn test_extract_id() {
        assert_eq!(
            extract_archidekt_id("https://archidekt.com/decks/4242/tymna"),
            Some("4242".to_string())
        );
        assert_eq!(
            extract_archidekt_id("https://example.com/decks/abcd1234"),
            Some("abcd1234".to_string())
        );
        assert_eq!(extract_archidekt_id("https://archidekt.com/search"), None);
        assert_eq!(extract_archidekt_id("4242"), Some("4242".to_string()));
        assert_eq!(extract_archidekt_id("abcd1234"), None);
        assert_eq!(extract_archidekt_id(""), None);
    }
}
