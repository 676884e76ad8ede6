//! Pod rolling: pick three opponents from the current metagame.
//!
//! ## Key Types
//!
//! - `RankedCommander`: a commander with its EDHTop16 meta statistics
//! - `Pod`: the user's seat plus a seated commander per opponent
//! - `RankedEntry`: a tournament finish with a decklist, ordered best first
//!
//! ## Flow
//!
//! 1. `EdhTop16Client::top_commanders` fetches the popular commanders
//! 2. `roll_pod` samples three of them by meta share and deals seats
//! 3. `EdhTop16Client::commander_entries` + `rank_entries` pick a decklist
//!    for each opponent, which a deck loader then turns into a library

pub mod edhtop16;

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::DeckRng;

pub use edhtop16::{CommanderFilters, EdhTop16Client, EntryFilters, TimePeriod};

/// Opponents in a Commander pod.
pub const OPPONENT_COUNT: usize = 3;

/// Seats at the table, numbered from 1.
pub const SEATS: [u8; 4] = [1, 2, 3, 4];

/// Meta statistics for one commander over a time period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommanderStats {
    pub conversion_rate: Option<f64>,
    pub meta_share: Option<f64>,
    pub top_cuts: Option<u64>,
    pub count: Option<u64>,
}

/// Preview art for a commander.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDetail {
    pub card_preview_image_url: Option<String>,
    pub image_urls: Vec<String>,
}

/// A commander as ranked by EDHTop16.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankedCommander {
    pub id: String,
    pub name: String,
    pub color_id: String,
    pub card_detail: Option<CardDetail>,
    pub stats: CommanderStats,
}

impl RankedCommander {
    #[must_use]
    pub fn new(name: impl Into<String>, meta_share: f64) -> Self {
        Self {
            name: name.into(),
            stats: CommanderStats {
                meta_share: Some(meta_share),
                ..CommanderStats::default()
            },
            ..Self::default()
        }
    }

    /// Meta share, zero when unknown.
    #[must_use]
    pub fn meta_share(&self) -> f64 {
        self.stats.meta_share.unwrap_or(0.0)
    }

    /// The individual card names behind this commander; see
    /// `commander_name_parts`.
    #[must_use]
    pub fn name_parts(&self) -> Vec<&str> {
        commander_name_parts(&self.name)
    }
}

/// Drop placeholder names (`Other`, `Unknown`, empty) and keep the first
/// `desired` commanders.
#[must_use]
pub fn filter_commanders(commanders: Vec<RankedCommander>, desired: usize) -> Vec<RankedCommander> {
    commanders
        .into_iter()
        .filter(|c| {
            let name = c.name.trim().to_lowercase();
            !name.is_empty() && name != "other" && name != "unknown"
        })
        .take(desired)
        .collect()
}

/// Draw `count` items with replacement, each pick proportional to
/// `weight`. Negative weights count as zero; all-zero weights give a
/// uniform pick.
pub fn weighted_sample<'a, T>(
    items: &'a [T],
    count: usize,
    weight: impl Fn(&T) -> f64,
    rng: &mut DeckRng,
) -> Vec<&'a T> {
    if items.is_empty() {
        return Vec::new();
    }
    let weights: Vec<f64> = items.iter().map(&weight).collect();
    (0..count)
        .filter_map(|_| rng.choose_weighted(&weights))
        .map(|idx| &items[idx])
        .collect()
}

/// An opponent's seat at the table.
#[derive(Clone, Debug, PartialEq)]
pub struct Seat {
    pub seat: u8,
    pub commander: RankedCommander,
}

/// A rolled pod.
#[derive(Clone, Debug, PartialEq)]
pub struct Pod {
    pub user_seat: u8,
    pub opponents: Vec<Seat>,
}

impl Pod {
    /// Seat numbers in use, user first.
    #[must_use]
    pub fn seats(&self) -> Vec<u8> {
        std::iter::once(self.user_seat)
            .chain(self.opponents.iter().map(|s| s.seat))
            .collect()
    }
}

/// Roll three opponents by meta share and deal the four seats at random.
///
/// The same commander can be picked more than once. With no commanders the
/// pod has only the user.
pub fn roll_pod(commanders: &[RankedCommander], rng: &mut DeckRng) -> Pod {
    let picks = weighted_sample(commanders, OPPONENT_COUNT, RankedCommander::meta_share, rng);
    let mut seats = SEATS;
    rng.fisher_yates(&mut seats);

    let opponents: Vec<Seat> = seats[1..]
        .iter()
        .zip(picks)
        .map(|(&seat, commander)| Seat {
            seat,
            commander: commander.clone(),
        })
        .collect();

    tracing::debug!(
        user_seat = seats[0],
        opponents = opponents.len(),
        "rolled pod"
    );
    Pod {
        user_seat: seats[0],
        opponents,
    }
}

/// Split a commander name into its cards.
///
/// Names containing `//` are one double-faced card and stay whole;
/// otherwise `/` separates partners.
///
/// ```
/// use mulligan_tool::pod::commander_name_parts;
///
/// assert_eq!(commander_name_parts("Kraum, Ludevic's Opus / Tymna the Weaver"),
///            vec!["Kraum, Ludevic's Opus", "Tymna the Weaver"]);
/// assert_eq!(commander_name_parts("Esika, God of the Tree // The Prismatic Bridge"),
///            vec!["Esika, God of the Tree // The Prismatic Bridge"]);
/// ```
#[must_use]
pub fn commander_name_parts(name: &str) -> Vec<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.contains("//") {
        return vec![trimmed];
    }
    trimmed
        .split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Tournament details attached to an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentInfo {
    pub name: Option<String>,
    pub tournament_date: Option<String>,
    #[serde(rename = "TID")]
    pub tid: Option<String>,
    pub size: Option<u32>,
}

/// One tournament finish as returned by EDHTop16.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommanderEntry {
    pub decklist: Option<String>,
    pub standing: Option<u32>,
    pub tournament: Option<TournamentInfo>,
}

/// A finish that has a decklist, normalized for ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry {
    pub decklist: String,
    /// `None` ranks after every known standing.
    pub standing: Option<u32>,
    pub tournament_name: String,
    pub tournament_date: Option<DateTime<Utc>>,
    pub event_size: u32,
}

impl RankedEntry {
    /// Normalize an entry; `None` when it has no decklist.
    #[must_use]
    pub fn from_entry(entry: CommanderEntry) -> Option<Self> {
        let decklist = entry.decklist.filter(|d| !d.trim().is_empty())?;
        let tournament = entry.tournament.unwrap_or_default();
        Some(Self {
            decklist,
            standing: entry.standing,
            tournament_name: tournament.name.unwrap_or_default(),
            tournament_date: tournament.tournament_date.as_deref().and_then(parse_tournament_date),
            event_size: tournament.size.unwrap_or(0),
        })
    }

    fn cmp_rank(&self, other: &Self) -> Ordering {
        let standing = |e: &Self| e.standing.map_or(u64::MAX, u64::from);
        standing(self)
            .cmp(&standing(other))
            .then_with(|| other.event_size.cmp(&self.event_size))
            .then_with(|| other.tournament_date.cmp(&self.tournament_date))
    }
}

/// Best finishes first: lower standing, then bigger event, then more recent.
/// Entries without a decklist are dropped; full ties keep fetch order.
#[must_use]
pub fn rank_entries(entries: Vec<CommanderEntry>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries.into_iter().filter_map(RankedEntry::from_entry).collect();
    ranked.sort_by(RankedEntry::cmp_rank);
    ranked
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
#[must_use]
pub fn parse_tournament_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
