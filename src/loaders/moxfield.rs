//! Moxfield loader.
//!
//! Moxfield rejects anonymous clients, so `LoadOptions` for it normally
//! carries a `User-Agent` (and optionally `x-moxfield-key`) header; see
//! `LoaderSettings::options_for`.

use crate::decklist::fields::first_text;
use crate::decklist::{extract_moxfield_id, parse_moxfield_deck, DeckSource};
use crate::error::{DeckError, Result};

use super::{encode_segment, fetch_json, finish, json_request, Fetcher, LoadOptions, LoadedDeck};

/// Load a public Moxfield deck from its URL or public id.
pub async fn load_moxfield_deck<F: Fetcher>(
    fetcher: &F,
    url: &str,
    options: &LoadOptions,
) -> Result<LoadedDeck> {
    let id = extract_moxfield_id(url)
        .ok_or_else(|| DeckError::InvalidUrl(DeckSource::Moxfield.label().to_string()))?;

    let endpoint = format!("{}/v2/decks/all/{}", options.clean_base(), encode_segment(&id));
    let data = fetch_json(fetcher, DeckSource::Moxfield, &json_request(endpoint, options)).await?;

    finish(
        DeckSource::Moxfield,
        parse_moxfield_deck(&data),
        first_text(&data, &["/name"]),
    )
}
