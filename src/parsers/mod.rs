pub mod classify;
pub mod emoji;
pub mod item_type;
pub mod price;

pub use classify::*;
pub use emoji::*;
pub use item_type::*;
pub use price::*;

use html_escape::decode_html_entities;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
