//! Card values.
//!
//! A `Card` is one physical copy of a named card. Parsers build cards once
//! and nothing mutates them afterwards; libraries and hands hold clones.
//!
//! Construction never fails. Upstream deck services are inconsistent, so a
//! missing field becomes an empty string instead of an error.

use serde::{Deserialize, Serialize};

/// One physical card copy.
///
/// `id` is unique per copy so two copies of the same name stay
/// individually addressable. When no id is supplied it falls back to the
/// name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub oracle_text: String,
    /// Specific-printing identifier from the deck service.
    pub scryfall_id: String,
    /// Specific-art identifier from the deck service.
    pub illustration_id: String,
    /// Art URL chosen on the deck service. Takes precedence over a fuzzy
    /// art lookup by name.
    pub custom_image_url: String,
}

/// Raw field bag a `Card` is built from.
///
/// Every field is optional; deserializes from camelCase JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub oracle_text: Option<String>,
    pub scryfall_id: Option<String>,
    pub illustration_id: Option<String>,
    pub custom_image_url: Option<String>,
}

impl Card {
    /// Create a card whose id is its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_fields(CardFields {
            name: Some(name.into()),
            ..CardFields::default()
        })
    }

    /// Build a card from a field bag, applying defaults.
    #[must_use]
    pub fn from_fields(fields: CardFields) -> Self {
        let name = fields.name.unwrap_or_default();
        let id = fields
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| name.clone());

        Self {
            id,
            name,
            image_url: fields.image_url.unwrap_or_default(),
            oracle_text: fields.oracle_text.unwrap_or_default(),
            scryfall_id: fields.scryfall_id.unwrap_or_default(),
            illustration_id: fields.illustration_id.unwrap_or_default(),
            custom_image_url: fields.custom_image_url.unwrap_or_default(),
        }
    }

    /// Set the per-copy id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.is_empty() {
            self.id = id;
        }
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    #[must_use]
    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = text.into();
        self
    }

    /// Attach printing-specific art identifiers.
    ///
    /// Empty strings leave the corresponding field blank.
    #[must_use]
    pub fn with_printing(
        mut self,
        scryfall_id: impl Into<String>,
        illustration_id: impl Into<String>,
        custom_image_url: impl Into<String>,
    ) -> Self {
        self.scryfall_id = scryfall_id.into();
        self.illustration_id = illustration_id.into();
        self.custom_image_url = custom_image_url.into();
        self
    }

    /// Does this card carry enough information to skip a fuzzy art lookup?
    #[must_use]
    pub fn has_specific_printing(&self) -> bool {
        !self.custom_image_url.is_empty() || !self.scryfall_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_defaults() {
        let card = Card::from_fields(CardFields {
            id: Some("1".to_string()),
            ..CardFields::default()
        });

        assert_eq!(card.id, "1");
        assert_eq!(card.name, "");
        assert_eq!(card.image_url, "");
        assert_eq!(card.oracle_text, "");
        assert_eq!(card.scryfall_id, "");
        assert_eq!(card.illustration_id, "");
        assert_eq!(card.custom_image_url, "");
    }

    #[test]
    fn test_id_falls_back_to_name() {
        let card = Card::new("Sol Ring");
        assert_eq!(card.id, "Sol Ring");

        let blank_id = Card::from_fields(CardFields {
            id: Some(String::new()),
            name: Some("Mana Vault".to_string()),
            ..CardFields::default()
        });
        assert_eq!(blank_id.id, "Mana Vault");
    }

    #[test]
    fn test_honors_provided_fields() {
        let card = Card::new("Omnath, Locus of Mana")
            .with_id("310")
            .with_image_url("https://cards.example/omnath.jpg")
            .with_oracle_text("You don't lose unspent green mana as steps and phases end.");

        assert_eq!(card.id, "310");
        assert_eq!(card.name, "Omnath, Locus of Mana");
        assert_eq!(card.image_url, "https://cards.example/omnath.jpg");
        assert!(card.oracle_text.starts_with("You don't lose"));
    }

    #[test]
    fn test_with_empty_id_keeps_name() {
        let card = Card::new("Island").with_id("");
        assert_eq!(card.id, "Island");
    }

    #[test]
    fn test_specific_printing() {
        let plain = Card::new("Sol Ring");
        assert!(!plain.has_specific_printing());

        let printed = Card::new("Sol Ring").with_printing("abc-123", "", "");
        assert!(printed.has_specific_printing());
        assert_eq!(printed.scryfall_id, "abc-123");
    }

    #[test]
    fn test_fields_from_json() {
        let fields: CardFields = serde_json::from_str(
            r#"{"name":"Tymna the Weaver","scryfallId":"s1","customImageUrl":"u"}"#,
        )
        .unwrap();
        let card = Card::from_fields(fields);

        assert_eq!(card.id, "Tymna the Weaver");
        assert_eq!(card.scryfall_id, "s1");
        assert_eq!(card.custom_image_url, "u");
    }
}
