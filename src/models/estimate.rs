use serde::{Deserialize, Serialize};
use std::fmt;

/// What a numeric estimate measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimateKind {
    /// Average retail price of an item.
    Item,
    /// Net worth of a person.
    NetWorth,
}

impl fmt::Display for EstimateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateKind::Item => write!(f, "item price"),
            EstimateKind::NetWorth => write!(f, "net worth"),
        }
    }
}

/// A resolved, positive USD amount and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub value: f64,
    pub kind: EstimateKind,
    pub source: &'static str,
    /// Provider-reported model when the estimate call returned text.
    pub model: Option<String>,
}
