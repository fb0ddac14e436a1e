use crate::models::EMOJI_DEFAULT;

/// Keyword groups in priority order; the first group with a keyword
/// contained in the text decides the glyph.
const EMOJI_TABLE: &[(&[&str], &str)] = &[
    // Food & drink
    (&["big mac", "burger"], "🍔"),
    (&["steak", "meat"], "🥩"),
    (&["sushi"], "🍣"),
    (&["beer", "alcohol"], "🍺"),
    (&["coffee"], "☕"),
    (&["pizza"], "🍕"),
    (&["whiskey", "bourbon"], "🥃"),
    (&["bread", "loaf", "loaves"], "🍞"),
    (&["banana"], "🍌"),
    (&["apple"], "🍎"),
    (&["chocolate"], "🍫"),
    (&["candy"], "🍬"),
    (&["donut"], "🍩"),
    // Objects & weapons
    (&["toilet"], "🚽"),
    (&["gun", "weapon", "firearm", "bullet"], "🔫"),
    (&["knife", "stab"], "🔪"),
    (&["bomb", "explosive"], "💣"),
    (&["fire", "burn"], "🔥"),
    (&["blood", "plasma"], "🩸"),
    (&["pencil", "pen"], "✏️"),
    (&["book", "novel"], "📚"),
    (&["newspaper"], "📰"),
    (&["magazine"], "📖"),
    // Crime
    (&["murder", "kill"], "💀"),
    (&["drug", "cocaine"], "💊"),
    (&["jail", "prison"], "🏢"),
    (&["bribe", "corrupt"], "💰"),
    (&["kidnap"], "🥷"),
    (&["cartel"], "💼"),
    (&["scam"], "🎭"),
    // Tech & media
    (&["crypto", "punk"], "🖼️"),
    (&["influencer"], "📸"),
    (&["apology"], "🙇‍♂️"),
    (&["dao"], "📜"),
    (&["discord"], "💬"),
    (&["movie", "ticket", "film"], "🎬"),
    (&["lawsuit"], "⚖️"),
    (&["pirat"], "🏴‍☠️"),
    (&["fake id", "identity"], "🪪"),
    // Transportation
    (&["lambo"], "🏎️"),
    (&["flight", "plane"], "✈️"),
    (&["bus ticket", "transit"], "🚌"),
    (&["train"], "🚆"),
    // Religion
    (&["church", "bible"], "📿"),
    (&["god", "jesus"], "✝️"),
    (&["sin", "hell"], "😈"),
    // Body & medical
    (&["organ", "kidney"], "🫀"),
    (&["therapy"], "🛋️"),
    (&["doctor", "medical", "hospital"], "🩺"),
    (&["casket", "coffin"], "⚰️"),
    // Relationships
    (&["divorce", "breakup"], "💔"),
    (&["dating"], "❤️"),
    (&["wedding"], "💍"),
    // Misc
    (&["goat"], "🐐"),
    (&["airdrop"], "🎁"),
    (&["rug pull", "rugpull"], "🪤"),
    (&["island"], "🏝️"),
    (&["failure", "failed"], "📉"),
];

/// Glyph for a comparison, chosen from its text alone.
pub fn emoji_for_comparison(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    EMOJI_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(EMOJI_DEFAULT)
}
