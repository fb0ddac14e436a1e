use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::models::{Comparison, ItemType, MAX_COMPARISONS, MIN_COMPARISONS};
use crate::parsers::clean_text;
use crate::storage::RecencySnapshot;

pub const MAX_TEXT_CHARS: usize = 80;

static BRACKET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[()\[\]{}<>]").expect("Invalid bracket regex")
});

static HASH_LIKE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9]{25,}").expect("Invalid hash-like regex")
});

static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?").expect("Invalid leading number regex")
});

/// Why a candidate comparison was dropped. Never surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotAnObject,
    MissingText,
    Brackets,
    TooLong,
    HashLike,
    NoLeadingNumber,
    NoItem,
    DuplicateInResult,
    RecentlyUsed,
    RepeatedText,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NotAnObject => "not an object",
            Rejection::MissingText => "missing text",
            Rejection::Brackets => "contains brackets",
            Rejection::TooLong => "too long",
            Rejection::HashLike => "contains a hash-like token",
            Rejection::NoLeadingNumber => "does not start with a number",
            Rejection::NoItem => "names no item",
            Rejection::DuplicateInResult => "duplicate item in this result",
            Rejection::RecentlyUsed => "item used recently",
            Rejection::RepeatedText => "text used recently",
        };
        write!(f, "{}", reason)
    }
}

/// Format checks only; no history involved.
pub fn validate_candidate(candidate: &Value) -> Result<String, Rejection> {
    let object = candidate.as_object().ok_or(Rejection::NotAnObject)?;
    let text = object
        .get("text")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .ok_or(Rejection::MissingText)?;

    if BRACKET_REGEX.is_match(&text) {
        return Err(Rejection::Brackets);
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(Rejection::TooLong);
    }
    if HASH_LIKE_REGEX.is_match(&text) {
        return Err(Rejection::HashLike);
    }
    if !LEADING_NUMBER_REGEX.is_match(&text) {
        return Err(Rejection::NoLeadingNumber);
    }

    Ok(text)
}

/// Accepted comparisons plus the history entries they produce.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<Comparison>,
    /// Item types of every accepted entry, including ones later trimmed for display.
    pub item_types: Vec<ItemType>,
    /// Lowercased accepted texts.
    pub texts: Vec<String>,
    pub rejected: usize,
}

/// Drops malformed or repetitive comparisons from a model reply.
#[derive(Debug, Default)]
pub struct DiversityFilter;

impl DiversityFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn filter<R: Rng>(
        &self,
        candidates: &[Value],
        history: &RecencySnapshot,
        rng: &mut R,
    ) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        let mut seen_in_result: HashSet<ItemType> = HashSet::new();

        for candidate in candidates {
            match self.check(candidate, history, &seen_in_result) {
                Ok((comparison, item_type)) => {
                    seen_in_result.insert(item_type.clone());
                    outcome.texts.push(comparison.text.to_lowercase());
                    outcome.item_types.push(item_type);
                    outcome.accepted.push(comparison);
                }
                Err(rejection) => {
                    debug!(%rejection, candidate = %candidate, "comparison rejected");
                    outcome.rejected += 1;
                }
            }
        }

        if outcome.accepted.len() > MAX_COMPARISONS {
            outcome.accepted.shuffle(rng);
            let keep = rng.gen_range(MIN_COMPARISONS..=MAX_COMPARISONS);
            outcome.accepted.truncate(keep);
        }

        outcome
    }

    fn check(
        &self,
        candidate: &Value,
        history: &RecencySnapshot,
        seen_in_result: &HashSet<ItemType>,
    ) -> Result<(Comparison, ItemType), Rejection> {
        let text = validate_candidate(candidate)?;
        let comparison = Comparison::from_text(text);
        let item_type = comparison.item_type();

        if item_type.is_empty() {
            return Err(Rejection::NoItem);
        }
        if seen_in_result.contains(&item_type) {
            return Err(Rejection::DuplicateInResult);
        }
        if history.has_seen_type(&item_type) {
            return Err(Rejection::RecentlyUsed);
        }
        if history.has_seen_text(&comparison.text.to_lowercase()) {
            return Err(Rejection::RepeatedText);
        }

        Ok((comparison, item_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn entry(text: &str) -> Value {
        json!({ "text": text, "emoji": "🤖" })
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn eighty_characters_is_the_limit() {
        let exactly = format!("1{}", " x".repeat(39) + "y");
        assert_eq!(exactly.chars().count(), 80);
        assert!(validate_candidate(&entry(&exactly)).is_ok());

        let over = format!("{}z", exactly);
        assert_eq!(validate_candidate(&entry(&over)), Err(Rejection::TooLong));
    }

    #[test]
    fn format_rejections() {
        assert_eq!(validate_candidate(&json!("3 cats")), Err(Rejection::NotAnObject));
        assert_eq!(validate_candidate(&json!({"emoji": "x"})), Err(Rejection::MissingText));
        assert_eq!(validate_candidate(&entry("  ")), Err(Rejection::MissingText));
        assert_eq!(validate_candidate(&entry("3 cats (fluffy)")), Err(Rejection::Brackets));
        assert_eq!(validate_candidate(&entry("2 <b>bold</b> moves")), Err(Rejection::Brackets));
        assert_eq!(
            validate_candidate(&entry("1 wallet 0x9f8e7d6c5b4a39281706f5e4d3c2b1a0")),
            Err(Rejection::HashLike)
        );
        assert_eq!(validate_candidate(&entry("Big Mac x5")), Err(Rejection::NoLeadingNumber));
    }

    #[test]
    fn bare_numbers_name_no_item() {
        let outcome = DiversityFilter::new().filter(
            &[entry("12"), entry("5 of the"), entry("3 large pizzas")],
            &RecencySnapshot::default(),
            &mut rng(),
        );
        let texts: Vec<_> = outcome.accepted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["3 large pizzas"]);
        assert_eq!(outcome.item_types, vec![ItemType("large pizzas".to_string())]);
        assert_eq!(outcome.rejected, 2);
    }

    #[test]
    fn model_emoji_is_discarded() {
        let outcome = DiversityFilter::new().filter(
            &[entry("3 large pizzas")],
            &RecencySnapshot::default(),
            &mut rng(),
        );
        assert_eq!(outcome.accepted[0].emoji, "🍕");
    }

    #[test]
    fn keeps_first_of_duplicate_item_types() {
        let outcome = DiversityFilter::new().filter(
            &[entry("2 Big Macs"), entry("4,000 big macs"), entry("3 movie tickets")],
            &RecencySnapshot::default(),
            &mut rng(),
        );
        let texts: Vec<_> = outcome.accepted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["2 Big Macs", "3 movie tickets"]);
        assert_eq!(outcome.rejected, 1);
    }

    #[test]
    fn history_rejects_recent_types_and_texts() {
        let mut history = RecencySnapshot::default();
        history.recent_item_types.insert(ItemType("big macs".to_string()));
        history.last_result_items.push(ItemType("movie tickets".to_string()));
        history.recent_comparisons.insert("9 gas masks".to_string());

        let outcome = DiversityFilter::new().filter(
            &[entry("2 Big Macs"), entry("3 movie tickets"), entry("9 Gas Masks"), entry("1 hearse")],
            &history,
            &mut rng(),
        );
        let texts: Vec<_> = outcome.accepted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["1 hearse"]);
    }

    #[test]
    fn oversized_sets_are_trimmed_but_fully_recorded() {
        let candidates: Vec<Value> = [
            "1 apples", "2 bananas", "3 cherries", "4 dates", "5 eggs", "6 figs", "7 grapes",
            "8 hams", "9 ices",
        ]
        .iter()
        .map(|t| entry(t))
        .collect();

        let outcome = DiversityFilter::new().filter(&candidates, &RecencySnapshot::default(), &mut rng());
        assert!((MIN_COMPARISONS..=MAX_COMPARISONS).contains(&outcome.accepted.len()));
        assert_eq!(outcome.item_types.len(), 9);
    }
}
