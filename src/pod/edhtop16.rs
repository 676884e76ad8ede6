//! EDHTop16 GraphQL client.
//!
//! Every call is a `POST {base}/graphql` with `{ query, variables }`. A
//! non-2xx status or a non-empty `errors` array becomes
//! `DeckError::GraphQl`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{DeckError, Result};
use crate::loaders::{FetchRequest, Fetcher, LoaderSettings};

use super::{filter_commanders, CommanderEntry, RankedCommander};

/// Extra commanders requested so placeholders can be filtered out.
const COMMANDER_OVERSAMPLE: usize = 5;

const COMMANDERS_QUERY: &str = r#"
query Commanders($first: Int!, $timePeriod: TimePeriod!, $minTournamentSize: Int, $minEntries: Int) {
  commanders(
    first: $first
    sortBy: POPULARITY
    timePeriod: $timePeriod
    minTournamentSize: $minTournamentSize
    minEntries: $minEntries
  ) {
    edges {
      node {
        id
        name
        colorId
        cardDetail { cardPreviewImageUrl imageUrls }
        stats(filters: { timePeriod: $timePeriod }) { conversionRate metaShare topCuts count }
      }
    }
  }
}
"#;

const COMMANDER_ENTRIES_QUERY: &str = r#"
query CommanderEntries(
  $commanderName: String!
  $first: Int!
  $timePeriod: TimePeriod!
  $minEventSize: Int!
  $maxStanding: Int
) {
  commander(name: $commanderName) {
    name
    entries(
      first: $first
      sortBy: TOP
      filters: { timePeriod: $timePeriod, minEventSize: $minEventSize, maxStanding: $maxStanding }
    ) {
      edges {
        node {
          decklist
          standing
          tournament { name tournamentDate TID size }
        }
      }
    }
  }
}
"#;

/// Statistics window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimePeriod {
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
    AllTime,
    PostBan,
}

/// Filters for `top_commanders`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommanderFilters {
    pub time_period: TimePeriod,
    pub min_tournament_size: Option<u32>,
    pub min_entries: Option<u32>,
    /// Pool size after placeholders are removed.
    pub count: usize,
}

impl Default for CommanderFilters {
    fn default() -> Self {
        Self {
            time_period: TimePeriod::default(),
            min_tournament_size: None,
            min_entries: None,
            count: 50,
        }
    }
}

/// Filters for `commander_entries`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFilters {
    pub first: u32,
    pub time_period: TimePeriod,
    pub min_event_size: u32,
    pub max_standing: Option<u32>,
}

impl Default for EntryFilters {
    fn default() -> Self {
        Self {
            first: 200,
            time_period: TimePeriod::default(),
            min_event_size: 0,
            max_standing: None,
        }
    }
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    edges: Vec<Edge<T>>,
}

#[derive(Deserialize)]
struct Edge<T> {
    node: Option<T>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().filter_map(|edge| edge.node).collect()
    }
}

#[derive(Deserialize)]
struct CommandersData {
    commanders: Option<Connection<RankedCommander>>,
}

#[derive(Deserialize)]
struct CommanderEntriesData {
    commander: Option<CommanderNode>,
}

#[derive(Deserialize)]
struct CommanderNode {
    entries: Option<Connection<CommanderEntry>>,
}

/// Client for the EDHTop16 API.
#[derive(Clone, Debug)]
pub struct EdhTop16Client<F> {
    fetcher: F,
    base: String,
}

impl<F: Fetcher> EdhTop16Client<F> {
    #[must_use]
    pub fn new(fetcher: F, base: impl Into<String>) -> Self {
        Self {
            fetcher,
            base: base.into(),
        }
    }

    /// Client pointed at the configured (or public) EDHTop16 base.
    #[must_use]
    pub fn from_settings(fetcher: F, settings: &LoaderSettings) -> Self {
        Self::new(fetcher, settings.edhtop16_base())
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base.trim_end_matches('/'))
    }

    /// Run a GraphQL query and decode its `data`.
    pub async fn query_graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let body = json!({ "query": query, "variables": variables }).to_string();
        let request = FetchRequest::post(self.graphql_url(), body)
            .with_header("Accept", "application/json")
            .with_header("Content-Type", "application/json");

        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "edhtop16 request failed");
            let body = if response.body.is_empty() { "No body" } else { response.body.as_str() };
            return Err(DeckError::GraphQl(format!("status {}: {body}", response.status)));
        }

        let envelope: Value = response.json()?;
        if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(DeckError::GraphQl(join_errors(errors)));
            }
        }

        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    /// Most popular commanders, placeholders removed, at most
    /// `filters.count` of them.
    pub async fn top_commanders(&self, filters: &CommanderFilters) -> Result<Vec<RankedCommander>> {
        let variables = json!({
            "first": filters.count + COMMANDER_OVERSAMPLE,
            "timePeriod": filters.time_period,
            "minTournamentSize": filters.min_tournament_size,
            "minEntries": filters.min_entries,
        });
        let data: CommandersData = self.query_graphql(COMMANDERS_QUERY, variables).await?;
        let commanders = data.commanders.map(Connection::into_nodes).unwrap_or_default();

        tracing::debug!(fetched = commanders.len(), "fetched top commanders");
        Ok(filter_commanders(commanders, filters.count))
    }

    /// Tournament finishes for one commander, in API order.
    pub async fn commander_entries(&self, commander_name: &str, filters: &EntryFilters) -> Result<Vec<CommanderEntry>> {
        let variables = json!({
            "commanderName": commander_name,
            "first": filters.first,
            "timePeriod": filters.time_period,
            "minEventSize": filters.min_event_size,
            "maxStanding": filters.max_standing,
        });
        let data: CommanderEntriesData = self.query_graphql(COMMANDER_ENTRIES_QUERY, variables).await?;

        Ok(data
            .commander
            .and_then(|c| c.entries)
            .map(Connection::into_nodes)
            .unwrap_or_default())
    }
}

/// Join GraphQL error messages with `"; "`, falling back to the first raw
/// error when none carries a message.
fn join_errors(errors: &[Value]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .collect();
    if !messages.is_empty() {
        return messages.join("; ");
    }
    errors
        .first()
        .map(Value::to_string)
        .unwrap_or_else(|| "GraphQL request failed".to_string())
}
