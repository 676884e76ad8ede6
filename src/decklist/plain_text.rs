//! Plain-text decklists ("copy as plain text").
//!
//! ```text
//! 1 Sol Ring
//! 1 Mana Vault
//!
//! SIDEBOARD:
//! 1 Changeling Outcast
//!
//! 1 Tymna the Weaver
//! ```
//!
//! One left-to-right scan with three sections, `Main → Sideboard →
//! Commanders`:
//!
//! - a blank line moves `Main` or `Sideboard` to `Commanders`
//! - a `sideboard` / `sideboard:` line (any case) moves to `Sideboard`
//! - `<qty> <name>` lines add copies to the current section; sideboard
//!   entries are dropped
//! - anything else is ignored
//!
//! A stray blank line inside the mainboard therefore turns the rest of the
//! list into commanders. Export tools never emit one, and the rule is kept
//! as is, including for blank lines before the first entry.

use crate::core::Card;

use super::{push_copies, ParsedDecklist, MAX_COPIES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Main,
    Sideboard,
    Commanders,
}

/// Parse a plain-text decklist. Never fails; unparseable lines are skipped.
#[must_use]
pub fn parse_plain_text(text: &str) -> ParsedDecklist {
    let mut parsed = ParsedDecklist::default();
    let mut section = Section::Main;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() {
            section = Section::Commanders;
            continue;
        }

        if is_sideboard_header(line) {
            section = Section::Sideboard;
            continue;
        }

        let Some((quantity, name)) = parse_entry(line) else {
            continue;
        };

        let target = match section {
            Section::Main => &mut parsed.library,
            Section::Commanders => &mut parsed.commanders,
            Section::Sideboard => continue,
        };
        push_copies(target, &Card::new(name), &format!("{name}-{line_no}"), quantity);
    }

    parsed
}

fn is_sideboard_header(line: &str) -> bool {
    let head = line.strip_suffix(':').unwrap_or(line);
    head.eq_ignore_ascii_case("sideboard")
}

/// Split `<digits><whitespace><name>`.
pub(crate) fn parse_entry(line: &str) -> Option<(usize, &str)> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }

    let (count, rest) = line.split_at(digits_end);
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let name = rest.trim();
    if name.is_empty() {
        return None;
    }

    // Absurd counts saturate rather than fail, like a lenient parseInt.
    let quantity = count.parse::<usize>().unwrap_or(usize::MAX).min(MAX_COPIES);
    Some((quantity, name))
}
