use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::chain::Strategy;
use crate::error::StageFailure;
use crate::models::ComparisonPayload;
use crate::salvage::fallback::dark_fallback_comparisons;
use crate::salvage::SalvageInput;

/// Fewer recovered fragments than this is not worth keeping.
const MIN_FRAGMENTS: usize = 3;

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json|JSON)?").expect("Invalid code fence regex")
});

// Covers a missing opening quote, a missing closing quote, no quotes at all
// and a doubled colon in one pass.
static EMOJI_VALUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""emoji"\s*:\s*:?\s*"?([^",}\]\s]+)"?"#).expect("Invalid emoji value regex")
});

static TRAILING_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",(\s*[\]}])").expect("Invalid trailing comma regex")
});

static DOUBLE_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",\s*,").expect("Invalid double comma regex")
});

static ADJACENT_OBJECTS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\}(\s*)\{").expect("Invalid adjacent objects regex")
});

static OBJECT_THEN_STRING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\}(\s*)""#).expect("Invalid object-string regex")
});

static ADJACENT_STRINGS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(\s*\n\s*)""#).expect("Invalid adjacent strings regex")
});

static PRICE_FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""price"\s*:\s*(\d+(?:\.\d+)?)"#).expect("Invalid price field regex")
});

static COMPARISONS_ARRAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"comparisons"\s*:\s*\[(.*?)\]"#).expect("Invalid comparisons array regex")
});

static UNQUOTED_EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("emoji"\s*:\s*)([^",}\s]+)"#).expect("Invalid unquoted emoji regex")
});

static FRAGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\s*"text"\s*:\s*"([^"]+)"\s*,\s*"emoji"\s*:\s*"?([^",}]+)"?\s*\}"#)
        .expect("Invalid fragment regex")
});

fn accept(stage: &'static str, json: String) -> Result<String, StageFailure> {
    match ComparisonPayload::parse(&json) {
        Ok(_) => Ok(json),
        Err(e) => Err(StageFailure::new(stage, e.to_string())),
    }
}

/// Appends the closers for any `{`/`[` still open at the end of the text.
///
/// Returns `None` when the text ends inside a string literal or the
/// brackets are mismatched; those cannot be closed mechanically.
pub fn close_open_structures(text: &str) -> Option<String> {
    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.pop() != Some(ch) {
                    return None;
                }
            }
            _ => {}
        }
    }

    if in_string {
        return None;
    }

    let mut closed = text.trim_end().to_string();
    closed.extend(open.iter().rev());
    Some(closed)
}

/// Stage-two repairs: fences, leading prose, emoji quoting, truncated closers, commas.
pub fn repair_json(raw: &str) -> String {
    let unfenced = CODE_FENCE_REGEX.replace_all(raw, "");
    let trimmed = unfenced.trim();
    let body = match trimmed.find('{') {
        Some(start) => &trimmed[start..],
        None => trimmed,
    };

    let mut cleaned = EMOJI_VALUE_REGEX
        .replace_all(body, r#""emoji": "${1}""#)
        .into_owned();
    if let Some(closed) = close_open_structures(&cleaned) {
        cleaned = closed;
    }

    let cleaned = DOUBLE_COMMA_REGEX.replace_all(&cleaned, ",");
    let cleaned = TRAILING_COMMA_REGEX.replace_all(&cleaned, "${1}");
    let cleaned = ADJACENT_OBJECTS_REGEX.replace_all(&cleaned, "},${1}{");
    let cleaned = OBJECT_THEN_STRING_REGEX.replace_all(&cleaned, r#"},${1}""#);
    let cleaned = ADJACENT_STRINGS_REGEX.replace_all(&cleaned, r#"",${1}""#);
    cleaned.into_owned()
}

pub struct Verbatim;

impl Strategy<SalvageInput, String> for Verbatim {
    fn name(&self) -> &'static str {
        "verbatim"
    }

    fn attempt(&self, input: &SalvageInput) -> Result<String, StageFailure> {
        accept(self.name(), input.raw.clone())
    }
}

pub struct TargetedRepair;

impl Strategy<SalvageInput, String> for TargetedRepair {
    fn name(&self) -> &'static str {
        "targeted-repair"
    }

    fn attempt(&self, input: &SalvageInput) -> Result<String, StageFailure> {
        accept(self.name(), repair_json(&input.raw))
    }
}

/// Pulls `price` and the `comparisons` array out independently and rebuilds
/// a minimal document around them.
pub struct ArraySplice;

impl Strategy<SalvageInput, String> for ArraySplice {
    fn name(&self) -> &'static str {
        "array-splice"
    }

    fn attempt(&self, input: &SalvageInput) -> Result<String, StageFailure> {
        let price = PRICE_FIELD_REGEX
            .captures(&input.raw)
            .and_then(|c| c[1].parse::<f64>().ok())
            .ok_or_else(|| StageFailure::new(self.name(), "no price field"))?;
        let body = COMPARISONS_ARRAY_REGEX
            .captures(&input.raw)
            .map(|c| c[1].to_string())
            .ok_or_else(|| StageFailure::new(self.name(), "no closed comparisons array"))?;

        let body = UNQUOTED_EMOJI_REGEX.replace_all(&body, r#"${1}"${2}""#);
        accept(
            self.name(),
            format!(r#"{{"price": {}, "comparisons": [{}]}}"#, price, body),
        )
    }
}

/// Collects every `{"text": ..., "emoji": ...}` fragment found anywhere.
pub struct FragmentScan;

impl Strategy<SalvageInput, String> for FragmentScan {
    fn name(&self) -> &'static str {
        "fragment-scan"
    }

    fn attempt(&self, input: &SalvageInput) -> Result<String, StageFailure> {
        let fragments: Vec<_> = FRAGMENT_REGEX
            .captures_iter(&input.raw)
            .filter_map(|c| {
                let text = c[1].trim().to_string();
                let emoji = c[2].replace(':', "").trim().to_string();
                (!text.is_empty() && !emoji.is_empty())
                    .then(|| json!({ "text": text, "emoji": emoji }))
            })
            .collect();

        if fragments.len() < MIN_FRAGMENTS {
            return Err(StageFailure::new(
                self.name(),
                format!("only {} usable fragments", fragments.len()),
            ));
        }

        accept(
            self.name(),
            json!({ "price": input.estimate, "comparisons": fragments }).to_string(),
        )
    }
}

/// Synthesises comparisons from the estimate alone.
pub struct DarkFallback;

impl Strategy<SalvageInput, String> for DarkFallback {
    fn name(&self) -> &'static str {
        "dark-fallback"
    }

    fn attempt(&self, input: &SalvageInput) -> Result<String, StageFailure> {
        let comparisons = dark_fallback_comparisons(input.estimate, &mut rand::thread_rng());
        accept(
            self.name(),
            json!({ "price": input.estimate, "comparisons": comparisons }).to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closes_truncated_structures() {
        assert_eq!(
            close_open_structures(r#"{"a": [{"b": 1}"#).as_deref(),
            Some(r#"{"a": [{"b": 1}]}"#)
        );
        assert_eq!(close_open_structures(r#"{"a": "unterminated"#), None);
        assert_eq!(close_open_structures(r#"{"a": ]"#), None);
        // Brackets inside strings are not structure
        assert_eq!(
            close_open_structures(r#"{"a": "[{"#).as_deref(),
            None
        );
        assert_eq!(
            close_open_structures(r#"{"a": "x[{\"y"}"#).as_deref(),
            Some(r#"{"a": "x[{\"y"}"#)
        );
    }

    #[test]
    fn repairs_emoji_quoting_variants() {
        for broken in [
            r#"{"comparisons": [{"text": "1 a", "emoji": 🔥}]}"#,
            r#"{"comparisons": [{"text": "1 a", "emoji": 🔥"}]}"#,
            r#"{"comparisons": [{"text": "1 a", "emoji": "🔥}]}"#,
            r#"{"comparisons": [{"text": "1 a", "emoji":: "🔥"}]}"#,
        ] {
            let repaired = repair_json(broken);
            let payload = ComparisonPayload::parse(&repaired).unwrap();
            assert_eq!(payload.comparisons[0]["emoji"], "🔥", "input: {}", broken);
        }
    }

    #[test]
    fn repairs_commas_and_fences() {
        let broken = "```json\n{\"price\": 5, \"comparisons\": [{\"text\": \"1 a\", \"emoji\": \"🔥\"} {\"text\": \"2 b\", \"emoji\": \"💀\"},,]}\n```";
        let payload = ComparisonPayload::parse(&repair_json(broken)).unwrap();
        assert_eq!(payload.comparisons.len(), 2);
    }

    #[test]
    fn repairs_missing_comma_between_fields() {
        let broken = "{\"comparisons\": [{\"text\": \"1 a\"\n\"emoji\": \"🔥\"}]}";
        let payload = ComparisonPayload::parse(&repair_json(broken)).unwrap();
        assert_eq!(payload.comparisons[0]["text"], "1 a");
    }

    #[test]
    fn drops_leading_prose() {
        let raw = "Sure! Here you go:\n{\"price\": 5, \"comparisons\": []}";
        assert!(ComparisonPayload::parse(&repair_json(raw)).is_ok());
    }

    #[test]
    fn array_splice_rebuilds_document_around_prose() {
        let raw = r#"price info: "price": 12, then "comparisons": [{"text": "1 a", "emoji": 🔥}] and then some chatter }}"#;
        let input = SalvageInput {
            raw: raw.to_string(),
            estimate: 99.0,
        };
        let json = ArraySplice.attempt(&input).unwrap();
        let payload = ComparisonPayload::parse(&json).unwrap();
        assert_eq!(payload.price, Some(json!(12)));
        assert_eq!(payload.comparisons[0]["emoji"], "🔥");
    }

    #[test]
    fn fragment_scan_needs_three_fragments() {
        let two = SalvageInput {
            raw: r#"{"text": "1 a", "emoji": "x"} {"text": "2 b", "emoji": "y"}"#.to_string(),
            estimate: 10.0,
        };
        assert!(FragmentScan.attempt(&two).is_err());
    }

    #[test]
    fn fragment_scan_tolerates_loose_emoji_quotes() {
        let raw = r#"junk {"text": "1 a", "emoji": x} {"text": "2 b", "emoji": "y} {"text": "3 c", "emoji": :z"} junk"#;
        let input = SalvageInput {
            raw: raw.to_string(),
            estimate: 10.0,
        };
        let payload = ComparisonPayload::parse(&FragmentScan.attempt(&input).unwrap()).unwrap();
        let emojis: Vec<_> = payload.comparisons.iter().map(|c| c["emoji"].clone()).collect();
        assert_eq!(emojis, vec![json!("x"), json!("y"), json!("z")]);
        assert_eq!(payload.price, Some(json!(10.0)));
    }

    #[test]
    fn dark_fallback_always_parses() {
        for estimate in [0.5, 12.0, 4_500.0, 2_000_000.0] {
            let input = SalvageInput {
                raw: String::new(),
                estimate,
            };
            let payload = ComparisonPayload::parse(&DarkFallback.attempt(&input).unwrap()).unwrap();
            assert!(payload.comparisons.len() >= 6);
        }
    }
}
