//! Error type shared by parsers, loaders and the pod client.
//!
//! Library and card operations never fail, so nothing in `core` returns
//! `DeckError`. Everything that touches user input or the network does.

use thiserror::Error;

use crate::decklist::DeckSource;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Failures surfaced to callers when loading decks or commander data.
#[derive(Debug, Error)]
pub enum DeckError {
    /// The pasted URL (or raw id) did not yield a deck id.
    #[error("Enter a valid {0} deck URL")]
    InvalidUrl(String),

    /// A pasted plain-text list had no mainboard entries.
    #[error("Decklist has no mainboard cards")]
    EmptyDecklist,

    /// A direct (non-proxied) call needs an API key that was not configured.
    #[error("Missing {0} API key")]
    MissingApiKey(DeckSource),

    /// Upstream answered with a non-success status.
    #[error("Unable to fetch {service} deck (status {status}{}){}", fmt_status_text(.status_text), fmt_detail(.detail))]
    Upstream {
        service: DeckSource,
        status: u16,
        status_text: String,
        detail: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The payload parsed but contained no cards.
    #[error("{0} decklist not available yet")]
    DecklistUnavailable(DeckSource),

    /// EDHTop16 returned GraphQL errors or a failed HTTP status.
    #[error("EDHTOP16 request failed: {0}")]
    GraphQl(String),

    #[error("config error: {0}")]
    Config(String),
}

fn fmt_status_text(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(" {status_text}")
    }
}

fn fmt_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" - {detail}")
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidPayload(value.to_string())
    }
}

impl From<reqwest::Error> for DeckError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<config::ConfigError> for DeckError {
    fn from(value: config::ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
