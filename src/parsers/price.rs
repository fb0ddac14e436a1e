use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?")
        .expect("Invalid number regex")
});

static NON_NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\d.]").expect("Invalid non-numeric regex")
});

/// A value that may stand as a terminal price.
pub fn is_usable_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// First number in free text, thousands separators allowed ("about 1,200 USD" -> 1200).
pub fn extract_first_number(text: &str) -> Option<f64> {
    NUMBER_REGEX
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

/// Reads the `price` field of a salvaged document, which models emit either
/// as a number or as a string like "$1,299.00".
pub fn parse_price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => NON_NUMERIC_REGEX.replace_all(s, "").parse::<f64>().ok(),
        _ => None,
    }
}

/// Format an item price: `$12.00`, `$1,250.00`, `$2.35 million`.
pub fn format_price(price: f64) -> String {
    if !is_usable_amount(price) {
        return "$0.00".to_string();
    }

    if price >= 1_000_000.0 {
        return format!("${:.2} million", price / 1_000_000.0);
    }

    format_usd(price)
}

/// Format a net worth: `$2.5 billion`, `$15.0 million`, below that plain currency.
pub fn format_net_worth(value: f64) -> String {
    if !is_usable_amount(value) {
        return "$0".to_string();
    }

    if value >= 1_000_000_000.0 {
        format!("${:.1} billion", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1} million", value / 1_000_000.0)
    } else {
        format_usd(value)
    }
}

/// Smallest amount a positive value is shown as; a real price never reads `$0.00`.
const MIN_DISPLAY_AMOUNT: f64 = 0.01;

/// en-US currency formatting with thousands separators and cents.
pub fn format_usd(amount: f64) -> String {
    let magnitude = amount.abs();
    let magnitude = if magnitude > 0.0 && magnitude < MIN_DISPLAY_AMOUNT {
        MIN_DISPLAY_AMOUNT
    } else {
        magnitude
    };
    let fixed = format!("{:.2}", magnitude);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Human-sized quantity: more decimals the smaller the number.
pub fn format_quantity(num: f64) -> String {
    if num < 0.01 {
        format!("{:.4}", num)
    } else if num < 1.0 {
        format!("{:.2}", num)
    } else if num < 10.0 {
        format!("{:.1}", num)
    } else {
        format!("{}", num.round() as i64)
    }
}
