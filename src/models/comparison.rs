use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::parsers::{emoji_for_comparison, extract_item_type};

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemType(pub String);

impl ItemType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Either type contains the other, e.g. "beers" and "craft beers".
    /// An empty key overlaps nothing.
    pub fn overlaps(&self, other: &ItemType) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.0.contains(&other.0) || other.0.contains(&self.0)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub text: String,
    pub emoji: String,
}

impl Comparison {
    /// Builds a comparison whose emoji comes from the keyword table, ignoring
    /// whatever glyph the model suggested.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let emoji = emoji_for_comparison(&text).to_string();
        Self { text, emoji }
    }

    /// For curated pools that carry their own glyph.
    pub fn with_emoji(text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: emoji.into(),
        }
    }

    pub fn item_type(&self) -> ItemType {
        extract_item_type(&self.text)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.text)
    }
}

/// What the caller gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorthResult {
    pub price: String,
    pub comparisons: Vec<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

/// Loosely typed `{price, comparisons[]}` document recovered from a model reply.
///
/// Entries stay as raw JSON values so the diversity filter can decide what
/// counts as a usable comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPayload {
    #[serde(default)]
    pub price: Option<Value>,
    pub comparisons: Vec<Value>,
}

impl ComparisonPayload {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_emoji_is_replaced_by_keyword_lookup() {
        let c = Comparison::from_text("12 large pizzas");
        assert_eq!(c.emoji, "🍕");
    }

    #[test]
    fn payload_requires_comparisons_array() {
        assert!(ComparisonPayload::parse(r#"{"price": 12}"#).is_err());
        let payload = ComparisonPayload::parse(r#"{"comparisons": []}"#).unwrap();
        assert!(payload.price.is_none());
    }

    #[test]
    fn overlapping_item_types() {
        let beers = ItemType("beers".to_string());
        let craft = ItemType("craft beers".to_string());
        assert!(beers.overlaps(&craft));
        assert!(craft.overlaps(&beers));
        assert!(!beers.overlaps(&ItemType("wine".to_string())));
    }

    #[test]
    fn empty_item_type_overlaps_nothing() {
        let empty = ItemType(String::new());
        let beers = ItemType("beers".to_string());
        assert!(!empty.overlaps(&beers));
        assert!(!beers.overlaps(&empty));
        assert!(!empty.overlaps(&empty));
    }

    #[test]
    fn result_serializes_model_used_in_camel_case() {
        let result = WorthResult {
            price: "$1.00".to_string(),
            comparisons: vec![],
            model_used: Some("m".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["modelUsed"], "m");
    }
}
