//! Worth comparisons for arbitrary items, built on an unreliable language model.
//!
//! Every model call has a local fallback, so a provider outage degrades the
//! content of a result rather than failing the request.

pub mod backfill;
pub mod calculator;
pub mod chain;
pub mod config;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod llm;
pub mod models;
pub mod oracle;
pub mod parsers;
pub mod pipeline;
pub mod prompts;
pub mod requester;
pub mod salvage;
pub mod storage;

pub use calculator::WorthCalculator;
pub use config::Config;
pub use error::{ModelError, WorthError};
pub use models::{Comparison, WorthResult};
pub use pipeline::WorthPipeline;
