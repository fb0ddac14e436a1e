use async_trait::async_trait;
use std::collections::HashSet;

use crate::models::ItemType;

mod bounded;
mod memory;
pub use bounded::BoundedSet;
pub use memory::InMemoryHistory;

/// Point-in-time copy of the recency memory a request checks against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecencySnapshot {
    pub recent_item_types: HashSet<ItemType>,
    pub recent_comparisons: HashSet<String>,
    pub last_result_items: Vec<ItemType>,
}

impl RecencySnapshot {
    /// Item type was used recently or in the previous result.
    pub fn has_seen_type(&self, item_type: &ItemType) -> bool {
        self.recent_item_types.contains(item_type) || self.last_result_items.contains(item_type)
    }

    pub fn has_seen_text(&self, lowercase_text: &str) -> bool {
        self.recent_comparisons.contains(lowercase_text)
    }
}

/// Changes produced by one request, applied in a single commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryUpdate {
    /// Accepted model comparisons, in acceptance order.
    pub accepted_item_types: Vec<ItemType>,
    /// Lowercased texts of accepted model comparisons.
    pub accepted_texts: Vec<String>,
    /// Every item type of the finished result; replaces the previous list.
    pub result_items: Vec<ItemType>,
}

/// Advisory memory that keeps consecutive results from repeating themselves.
///
/// Losing it only costs variety; nothing depends on it for correctness.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn snapshot(&self) -> RecencySnapshot;
    async fn commit(&self, update: HistoryUpdate);
    async fn reset(&self);
}
