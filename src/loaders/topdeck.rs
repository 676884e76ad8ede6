//! TopDeck loader.
//!
//! The player endpoint needs an API key whenever it is called directly
//! (an absolute http(s) base); proxies add the key themselves. A player's
//! list may live behind a second URL, which is fetched as text.

use crate::decklist::topdeck::{is_http_url, TopdeckPayload};
use crate::decklist::{
    extract_topdeck_ids, parse_topdeck_deck_obj, parse_topdeck_plain_text, DeckSource, ParsedDecklist,
};
use crate::error::{DeckError, Result};

use super::{
    encode_segment, fetch_checked, fetch_json, finish, json_request, FetchRequest, Fetcher, LoadOptions,
    LoadedDeck,
};

/// Load a TopDeck player's deck from `topdeck.gg/deck/{tournament}/{player}`.
pub async fn load_topdeck_deck<F: Fetcher>(
    fetcher: &F,
    url: &str,
    options: &LoadOptions,
) -> Result<LoadedDeck> {
    let ids = extract_topdeck_ids(url)
        .ok_or_else(|| DeckError::InvalidUrl(DeckSource::TopDeck.label().to_string()))?;

    let api_key = options.api_key.as_deref().filter(|key| !key.is_empty());
    if is_http_url(&options.api_base) && api_key.is_none() {
        return Err(DeckError::MissingApiKey(DeckSource::TopDeck));
    }

    let endpoint = format!(
        "{}/v2/tournaments/{}/players/{}",
        options.clean_base(),
        encode_segment(&ids.tournament_id),
        encode_segment(&ids.player_id)
    );
    let mut request = json_request(endpoint, options);
    if let Some(key) = api_key {
        request = request.with_header("Authorization", key);
    }

    let data = fetch_json(fetcher, DeckSource::TopDeck, &request).await?;
    let payload = TopdeckPayload::locate(&data);
    let parsed = parse_payload(fetcher, &payload).await?;

    finish(DeckSource::TopDeck, parsed, payload.name.as_deref())
}

async fn parse_payload<F: Fetcher>(fetcher: &F, payload: &TopdeckPayload) -> Result<ParsedDecklist> {
    if let Some(deck_obj) = &payload.deck_obj {
        return Ok(parse_topdeck_deck_obj(deck_obj));
    }

    if let Some(list_url) = payload.decklist_url() {
        let response = fetch_checked(fetcher, DeckSource::TopDeck, &FetchRequest::get(list_url)).await?;
        return Ok(parse_topdeck_plain_text(response.text()));
    }

    Ok(payload
        .decklist
        .as_deref()
        .map(parse_topdeck_plain_text)
        .unwrap_or_default())
}
