//! TopDeck.gg decks.
//!
//! A player record carries its list either as a structured `deckObj`
//! (sections mapping to arrays of entries or to `name -> entry` maps) or as
//! a `decklist` string: inline text with `~~Section~~` headers, or a URL
//! that serves that text.

use serde_json::Value;

use crate::core::Card;

use super::archidekt::url_segments;
use super::fields::{self, FieldChain};
use super::plain_text::parse_entry;
use super::{push_copies, ParsedDecklist};

const ENTRY_NAME_CHAIN: FieldChain = &["/name", "/card/name", "/cardName"];
const QUANTITY_CHAIN: FieldChain = &["/count", "/quantity", "/qty"];
const SCRYFALL_ID_CHAIN: FieldChain = &["/id", "/scryfallId", "/scryfall_id"];
const IMAGE_URL_CHAIN: FieldChain = &["/imageUrl", "/image_url"];

/// Tournament and player ids from `topdeck.gg/deck/{tournamentId}/{playerId}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopdeckIds {
    pub tournament_id: String,
    pub player_id: String,
}

/// Extract TopDeck ids from a deck URL or a `deck/{tid}/{pid}` path.
///
/// ```
/// use mulligan_tool::decklist::extract_topdeck_ids;
///
/// let ids = extract_topdeck_ids("https://topdeck.gg/deck/cedh-open/player-1").unwrap();
/// assert_eq!(ids.tournament_id, "cedh-open");
/// assert_eq!(ids.player_id, "player-1");
/// assert!(extract_topdeck_ids("cedh-open").is_none());
/// ```
#[must_use]
pub fn extract_topdeck_ids(input: &str) -> Option<TopdeckIds> {
    let trimmed = input.trim();
    if let Some(ids) = url_segments(trimmed).and_then(|segments| ids_after_deck(&segments)) {
        return Some(ids);
    }

    if !trimmed.contains('/') {
        return None;
    }
    let segments: Vec<String> = trimmed
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    ids_after_deck(&segments)
}

fn ids_after_deck(segments: &[String]) -> Option<TopdeckIds> {
    let idx = segments.iter().position(|s| s.eq_ignore_ascii_case("deck"))?;
    let tournament_id = segments.get(idx + 1)?.clone();
    let player_id = segments.get(idx + 2)?.clone();
    Some(TopdeckIds {
        tournament_id,
        player_id,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Main,
    Commanders,
    Ignored,
}

fn classify_section(name: &str) -> Section {
    let name = name.trim().to_lowercase();
    if name.contains("commander") {
        Section::Commanders
    } else if name.contains("sideboard") || name.contains("maybe") {
        Section::Ignored
    } else {
        Section::Main
    }
}

/// Missing quantities count as one copy; anything that doesn't read as a
/// positive number drops the entry.
fn quantity(entry: &Value) -> Option<usize> {
    match fields::first_present(entry, QUANTITY_CHAIN) {
        None => Some(1),
        Some(value) => fields::as_quantity(value)
            .filter(|&n| n > 0)
            .map(|n| n as usize),
    }
}

fn entry_card(name: &str, entry: &Value) -> Card {
    Card::new(name).with_printing(
        fields::text_or_empty(entry, SCRYFALL_ID_CHAIN),
        "",
        fields::text_or_empty(entry, IMAGE_URL_CHAIN),
    )
}

/// Parse a structured `deckObj`.
#[must_use]
pub fn parse_topdeck_deck_obj(deck_obj: &Value) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();
    let Some(sections) = deck_obj.as_object() else {
        return parsed;
    };

    for (section, entries) in sections {
        let section_name = section.trim().to_lowercase();
        let target = match classify_section(&section_name) {
            Section::Commanders => &mut parsed.commanders,
            Section::Main => &mut parsed.library,
            Section::Ignored => continue,
        };

        match entries {
            Value::Array(items) => {
                for (idx, entry) in items.iter().enumerate() {
                    if !entry.is_object() {
                        continue;
                    }
                    let Some(name) = fields::first_text(entry, ENTRY_NAME_CHAIN) else {
                        continue;
                    };
                    let Some(quantity) = quantity(entry) else {
                        continue;
                    };
                    push_copies(target, &entry_card(name, entry), &format!("{name}-{section_name}-{idx}"), quantity);
                }
            }
            Value::Object(map) => {
                for (idx, (name, entry)) in map.iter().enumerate() {
                    let name = name.trim();
                    if name.is_empty() || !entry.is_object() {
                        continue;
                    }
                    let Some(quantity) = quantity(entry) else {
                        continue;
                    };
                    push_copies(target, &entry_card(name, entry), &format!("{name}-{section_name}-{idx}"), quantity);
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        library = parsed.library.len(),
        commanders = parsed.commanders.len(),
        "parsed topdeck deckObj"
    );
    parsed
}

/// Parse TopDeck decklist text.
///
/// `~~Commanders~~` starts the commander block, `~~Sideboard~~` or
/// `~~Maybeboard~~` starts an ignored block, and any other `~~...~~`
/// header returns to the mainboard. Blank lines are skipped.
#[must_use]
pub fn parse_topdeck_plain_text(text: &str) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();
    let mut section = Section::Main;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = section_header(line) {
            section = classify_section(header);
            continue;
        }

        let Some((quantity, name)) = parse_entry(line) else {
            continue;
        };
        let target = match section {
            Section::Commanders => &mut parsed.commanders,
            Section::Main => &mut parsed.library,
            Section::Ignored => continue,
        };
        push_copies(target, &Card::new(name), &format!("{name}-text-{line_no}"), quantity);
    }

    parsed
}

fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("~~")?.strip_suffix("~~")?;
    (!inner.is_empty()).then_some(inner)
}

/// The list-bearing part of a TopDeck player response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopdeckPayload {
    pub deck_obj: Option<Value>,
    pub decklist: Option<String>,
    pub name: Option<String>,
}

impl TopdeckPayload {
    /// Find `deckObj`/`decklist` at the top level, under `player`, or under
    /// `data`, in that order.
    #[must_use]
    pub fn locate(data: &Value) -> Self {
        const CANDIDATES: &[(&str, FieldChain)] = &[
            ("", &["/deckName", "/name", "/playerName"]),
            ("/player", &["/deckName", "/name"]),
            ("/data", &["/deckName", "/name"]),
        ];

        for &(pointer, name_chain) in CANDIDATES {
            let Some(node) = data.pointer(pointer) else {
                continue;
            };
            let deck_obj = node.get("deckObj").filter(|v| fields::is_truthy(Some(*v)));
            let decklist = node.get("decklist").filter(|v| fields::is_truthy(Some(*v)));
            if deck_obj.is_none() && decklist.is_none() {
                continue;
            }

            return Self {
                deck_obj: deck_obj.cloned(),
                decklist: decklist.and_then(Value::as_str).map(str::to_string),
                name: fields::first_text(node, name_chain).map(str::to_string),
            };
        }

        Self::default()
    }

    /// `decklist` when it points at a remote text file.
    #[must_use]
    pub fn decklist_url(&self) -> Option<&str> {
        self.decklist.as_deref().filter(|list| is_http_url(list))
    }
}

/// Does `value` start with `http://` or `https://` (any case)?
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
