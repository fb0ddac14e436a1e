use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ItemType;

static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d[\d.,]*\s*").expect("Invalid leading number regex")
});

static STOP_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:of|the|and|to|for|with|by|in|on|at|from)\b")
        .expect("Invalid stop word regex")
});

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+").expect("Invalid digits regex")
});

/// Core item of a comparison ("88,000 Big Macs from McDonald's" -> "big macs mcdonald's").
///
/// Only used as a de-duplication key.
pub fn extract_item_type(text: &str) -> ItemType {
    let lower = text.to_lowercase();
    let without_count = LEADING_NUMBER_REGEX.replace(&lower, "");
    let without_stop_words = STOP_WORD_REGEX.replace_all(&without_count, "");
    let without_digits = DIGITS_REGEX.replace_all(&without_stop_words, "");

    ItemType(
        without_digits
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> String {
        extract_item_type(text).0
    }

    #[test]
    fn strips_counts_and_stop_words() {
        assert_eq!(kind("88000 Big Macs"), "big macs");
        assert_eq!(kind("44,000 Big Macs from McDonald's"), "big macs mcdonald's");
        assert_eq!(kind("2.5 pints of donated blood"), "pints donated blood");
    }

    #[test]
    fn same_item_with_different_counts_collides() {
        assert_eq!(kind("3 large pizzas"), kind("1,200 large pizzas"));
    }

    #[test]
    fn stop_words_inside_words_survive() {
        assert_eq!(kind("4 tomatoes"), "tomatoes");
        assert_eq!(kind("7 theater tickets"), "theater tickets");
    }
}
