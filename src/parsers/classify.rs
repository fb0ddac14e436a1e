//! Static keyword matchers. Pure functions, no model calls.

const TITLE_PREFIXES: &[&str] = &["mr", "mrs", "ms", "miss", "dr", "prof", "sir", "lady", "lord"];

const KNOWN_NAMES: &[&str] = &[
    "trump", "biden", "obama", "elon musk", "bezos", "zuckerberg", "kardashian", "jenner",
    "bieber", "swift", "beyonce", "madonna",
];

const PRICELESS_CONCEPTS: &[&str] = &[
    "love", "lover", "friendship", "happiness", "peace", "joy", "family", "mother", "father",
    "dad", "mom", "parent", "child", "baby", "soul", "heart", "mind", "life", "freedom",
    "liberty", "justice", "health", "time", "memories", "wisdom", "wife", "husband", "spouse",
    "partner", "marriage", "relationship",
];

const PRICELESS_PHRASES: &[&str] = &[
    "mother's love", "father's love", "parent's love", "true love", "true friend",
    "best friend", "peace of mind", "good health",
];

const CONCEPT_ARTICLES: &[&str] = &["a", "my", "your", "the"];

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace('\u{2019}', "'")
}

/// Heuristic for "this is a person, estimate a net worth instead of a price".
pub fn looks_like_person_name(text: &str) -> bool {
    let lower = normalize(text);

    if TITLE_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(&format!("{} ", prefix)))
    {
        return true;
    }

    if KNOWN_NAMES.iter().any(|name| lower.contains(name)) {
        return true;
    }

    // "First Last" style: 2-4 words, every one capitalized
    let words: Vec<&str> = text.trim().split(' ').collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|word| word.chars().next().map_or(false, char::is_uppercase))
}

/// Abstract or relational concepts that should stay priceless.
pub fn is_priceless_concept(text: &str) -> bool {
    let lower = normalize(text);

    let matches_concept = PRICELESS_CONCEPTS.iter().any(|concept| {
        lower == *concept
            || CONCEPT_ARTICLES
                .iter()
                .any(|article| lower == format!("{} {}", article, concept))
            || lower.contains(&format!("{}'s", concept))
    });

    matches_concept || PRICELESS_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
