pub mod comparison;
pub mod estimate;

pub use comparison::*;
pub use estimate::*;

/// Emoji used when no keyword in a comparison matches.
pub const EMOJI_DEFAULT: &str = "🪙";

/// Displayed in place of a price for items that must not receive one.
pub const PRICELESS: &str = "Priceless";

/// Result size bounds.
pub const MIN_COMPARISONS: usize = 5;
pub const MAX_COMPARISONS: usize = 7;
