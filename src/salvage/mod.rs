//! Recovers a `{price, comparisons[]}` document from whatever the model sent.
//!
//! Stages run in order, each more aggressive than the last:
//! verbatim parse, targeted repairs, array splice, fragment scan and finally
//! a locally generated set that cannot fail.

use tracing::{debug, error, info};

use crate::chain::FallbackChain;
use crate::error::WorthError;

pub mod fallback;
mod stages;

pub use fallback::dark_fallback_comparisons;
pub use stages::{close_open_structures, repair_json};

#[derive(Debug, Clone)]
pub struct SalvageInput {
    pub raw: String,
    /// Already resolved estimate, used when the reply carries no usable price.
    pub estimate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Salvaged {
    /// Always parses as a `ComparisonPayload`.
    pub json: String,
    pub stage: &'static str,
}

pub struct SalvageEngine {
    chain: FallbackChain<SalvageInput, String>,
}

impl SalvageEngine {
    pub fn new() -> Self {
        Self {
            chain: Self::recovery_stages().then(stages::DarkFallback),
        }
    }

    /// Only the stages that recover model text; nothing is synthesised.
    pub fn without_synthesis() -> Self {
        Self {
            chain: Self::recovery_stages(),
        }
    }

    fn recovery_stages() -> FallbackChain<SalvageInput, String> {
        FallbackChain::new()
            .then(stages::Verbatim)
            .then(stages::TargetedRepair)
            .then(stages::ArraySplice)
            .then(stages::FragmentScan)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.chain.stage_names()
    }

    pub fn salvage(&self, raw: &str, estimate: f64) -> Result<Salvaged, WorthError> {
        debug!(raw, "salvaging model response");

        let input = SalvageInput {
            raw: raw.to_string(),
            estimate,
        };
        match self.chain.run(&input) {
            Ok(resolved) => {
                info!(stage = resolved.stage, "model response salvaged");
                Ok(Salvaged {
                    json: resolved.value,
                    stage: resolved.stage,
                })
            }
            Err(exhausted) => {
                error!("Every salvage stage failed for model response");
                Err(exhausted.into())
            }
        }
    }
}

impl Default for SalvageEngine {
    fn default() -> Self {
        Self::new()
    }
}
