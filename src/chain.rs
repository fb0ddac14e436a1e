//! Ordered fallback chains.
//!
//! Each unreliable step of the pipeline is a list of strategies tried in
//! order until one of them produces a value. Stages stay independently
//! testable and the order lives in data instead of nested matches.

use tracing::debug;

use crate::error::{ChainExhausted, StageFailure};

pub trait Strategy<I: ?Sized, T>: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, input: &I) -> Result<T, StageFailure>;
}

/// Result of a successful chain run, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub stage: &'static str,
}

pub struct FallbackChain<I: ?Sized, T> {
    stages: Vec<Box<dyn Strategy<I, T>>>,
}

impl<I: ?Sized, T> FallbackChain<I, T> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then(mut self, stage: impl Strategy<I, T> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, input: &I) -> Result<Resolved<T>, ChainExhausted> {
        let mut failures = Vec::new();

        for stage in &self.stages {
            match stage.attempt(input) {
                Ok(value) => {
                    return Ok(Resolved {
                        value,
                        stage: stage.name(),
                    })
                }
                Err(failure) => {
                    debug!(stage = stage.name(), reason = %failure.reason, "fallback stage declined");
                    failures.push(failure);
                }
            }
        }

        Err(ChainExhausted { failures })
    }
}

impl<I: ?Sized, T> Default for FallbackChain<I, T> {
    fn default() -> Self {
        Self::new()
    }
}
