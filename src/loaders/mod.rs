//! Deck loaders: deck URL in, `LoadedDeck` out.
//!
//! Each loader extracts the deck id, builds the service endpoint from its
//! `LoadOptions`, awaits the injected `Fetcher`, maps failures onto
//! `DeckError` and hands the payload to the matching parser.
//!
//! ## Key Types
//!
//! - `Fetcher`: async HTTP seam (`ReqwestFetcher` in production)
//! - `LoadOptions`: base URL, headers and API key for one service
//! - `LoaderSettings`: file/env configuration producing `LoadOptions`
//! - `LoadedDeck`: the drawable library plus its commanders

pub mod archidekt;
pub mod fetch;
pub mod moxfield;
pub mod settings;
pub mod topdeck;

use serde_json::Value;

use crate::core::{Card, Library};
use crate::decklist::{parse_plain_text, DeckSource, ParsedDecklist};
use crate::error::{DeckError, Result};

pub use archidekt::load_archidekt_deck;
pub use fetch::{FetchRequest, FetchResponse, Fetcher, Method, ReqwestFetcher};
pub use moxfield::load_moxfield_deck;
pub use settings::{is_local_host, resolve_proxy_base, LoadOptions, LoaderSettings};
pub use topdeck::load_topdeck_deck;

/// Longest slice of an error body echoed back in `DeckError::Upstream`.
pub const ERROR_DETAIL_LIMIT: usize = 200;

/// A deck ready to practice with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedDeck {
    /// Service the deck came from; `None` for pasted text.
    pub source: Option<DeckSource>,
    pub name: String,
    pub library: Library,
    pub commanders: Vec<Card>,
}

impl LoadedDeck {
    fn from_parsed(source: Option<DeckSource>, name: String, parsed: ParsedDecklist) -> Self {
        let commander_id = parsed.first_commander_name();
        let library = Library::new(name.clone(), commander_id, parsed.library);
        Self {
            source,
            name,
            library,
            commanders: parsed.commanders,
        }
    }
}

/// Detect the service behind `url` and run its loader.
pub async fn load_deck_from_url<F: Fetcher>(
    fetcher: &F,
    url: &str,
    settings: &LoaderSettings,
) -> Result<LoadedDeck> {
    let Some(source) = DeckSource::detect(url) else {
        return Err(DeckError::InvalidUrl("Archidekt, Moxfield or TopDeck".to_string()));
    };
    let options = settings.options_for(source);

    match source {
        DeckSource::Archidekt => load_archidekt_deck(fetcher, url, &options).await,
        DeckSource::Moxfield => load_moxfield_deck(fetcher, url, &options).await,
        DeckSource::TopDeck => load_topdeck_deck(fetcher, url, &options).await,
    }
}

/// Build a deck from pasted plain text.
pub fn load_plain_text_deck(text: &str, name: &str) -> Result<LoadedDeck> {
    let parsed = parse_plain_text(text);
    if parsed.library.is_empty() {
        return Err(DeckError::EmptyDecklist);
    }

    let name = name.trim();
    let name = if name.is_empty() { "Pasted Deck" } else { name };
    Ok(LoadedDeck::from_parsed(None, name.to_string(), parsed))
}

/// Wrap a parsed payload, refusing empty ones.
pub(crate) fn finish(source: DeckSource, parsed: ParsedDecklist, name: Option<&str>) -> Result<LoadedDeck> {
    if parsed.is_empty() {
        tracing::warn!(source = %source, "deck payload had no cards");
        return Err(DeckError::DecklistUnavailable(source));
    }

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(source.default_deck_name())
        .to_string();
    tracing::debug!(
        source = %source,
        cards = parsed.library.len(),
        commanders = parsed.commanders.len(),
        "loaded deck"
    );
    Ok(LoadedDeck::from_parsed(Some(source), name, parsed))
}

/// `GET` with `Accept: application/json` plus the configured headers.
pub(crate) fn json_request(url: String, options: &LoadOptions) -> FetchRequest {
    FetchRequest::get(url)
        .with_header("Accept", "application/json")
        .with_headers(&options.headers)
}

/// Send `request`, failing with `Upstream` on a non-2xx status.
pub(crate) async fn fetch_checked<F: Fetcher>(
    fetcher: &F,
    source: DeckSource,
    request: &FetchRequest,
) -> Result<FetchResponse> {
    tracing::debug!(source = %source, url = %request.url, "fetching deck");
    let response = fetcher.fetch(request).await?;
    if response.is_success() {
        return Ok(response);
    }

    tracing::warn!(source = %source, status = response.status, "deck request failed");
    Err(DeckError::Upstream {
        service: source,
        status: response.status,
        status_text: response.status_text.clone(),
        detail: response.body.chars().take(ERROR_DETAIL_LIMIT).collect(),
    })
}

/// Fetch and decode a JSON deck payload.
pub(crate) async fn fetch_json<F: Fetcher>(
    fetcher: &F,
    source: DeckSource,
    request: &FetchRequest,
) -> Result<Value> {
    fetch_checked(fetcher, source, request).await?.json()
}

/// Percent-encode one path segment like `encodeURIComponent`.
pub(crate) fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}
