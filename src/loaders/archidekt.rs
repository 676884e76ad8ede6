//! Archidekt loader.

use crate::decklist::fields::first_text;
use crate::decklist::{extract_archidekt_id, parse_archidekt_deck, DeckSource};
use crate::error::{DeckError, Result};

use super::{encode_segment, fetch_json, finish, json_request, Fetcher, LoadOptions, LoadedDeck};

/// Load a public Archidekt deck from its URL (or bare numeric id).
pub async fn load_archidekt_deck<F: Fetcher>(
    fetcher: &F,
    url: &str,
    options: &LoadOptions,
) -> Result<LoadedDeck> {
    let id = extract_archidekt_id(url)
        .ok_or_else(|| DeckError::InvalidUrl(DeckSource::Archidekt.label().to_string()))?;

    let endpoint = format!("{}/api/decks/{}/", options.clean_base(), encode_segment(&id));
    let data = fetch_json(fetcher, DeckSource::Archidekt, &json_request(endpoint, options)).await?;

    finish(
        DeckSource::Archidekt,
        parse_archidekt_deck(&data),
        first_text(&data, &["/name"]),
    )
}
