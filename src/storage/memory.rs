use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::models::ItemType;
use crate::storage::{BoundedSet, HistoryStore, HistoryUpdate, RecencySnapshot};

pub const DEFAULT_ITEM_TYPE_CAPACITY: usize = 50;
pub const DEFAULT_COMPARISON_CAPACITY: usize = 300;

#[derive(Debug)]
struct RecencyState {
    recent_item_types: BoundedSet,
    recent_comparisons: BoundedSet,
    last_result_items: Vec<ItemType>,
}

/// Process-wide history shared by concurrent requests behind a mutex.
#[derive(Debug)]
pub struct InMemoryHistory {
    state: Mutex<RecencyState>,
}

impl InMemoryHistory {
    pub fn new(item_type_capacity: usize, comparison_capacity: usize) -> Self {
        Self {
            state: Mutex::new(RecencyState {
                recent_item_types: BoundedSet::new(item_type_capacity),
                recent_comparisons: BoundedSet::new(comparison_capacity),
                last_result_items: Vec::new(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.recent_item_capacity, config.recent_comparison_capacity)
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_TYPE_CAPACITY, DEFAULT_COMPARISON_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn snapshot(&self) -> RecencySnapshot {
        let state = self.state.lock().await;

        RecencySnapshot {
            recent_item_types: state
                .recent_item_types
                .iter()
                .map(|t| ItemType(t.to_string()))
                .collect(),
            recent_comparisons: state.recent_comparisons.iter().map(str::to_string).collect(),
            last_result_items: state.last_result_items.clone(),
        }
    }

    async fn commit(&self, update: HistoryUpdate) {
        let mut state = self.state.lock().await;

        for text in update.accepted_texts {
            state.recent_comparisons.insert(text);
        }
        for item_type in update.accepted_item_types {
            state.recent_item_types.insert(item_type.0);
        }
        state.last_result_items = update.result_items;

        debug!(
            recent_item_types = state.recent_item_types.len(),
            recent_comparisons = state.recent_comparisons.len(),
            "history committed"
        );
    }

    async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.recent_item_types.clear();
        state.recent_comparisons.clear();
        state.last_result_items.clear();
    }
}
