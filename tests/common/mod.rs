#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use worth_check::llm::{ChatCompletion, ChatModel, ChatRequest};
use worth_check::prompts::{ESTIMATE_SYSTEM_PROMPT, ETHICS_SYSTEM_PROMPT};
use worth_check::storage::{HistoryStore, InMemoryHistory};
use worth_check::{Config, ModelError, WorthPipeline};

pub const SCRIPTED_MODEL: &str = "scripted/model";

/// Which of the three pipeline calls a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Ethics,
    Estimate,
    Comparisons,
}

pub fn call_kind(request: &ChatRequest) -> CallKind {
    if request.system_prompt == ETHICS_SYSTEM_PROMPT {
        CallKind::Ethics
    } else if request.system_prompt == ESTIMATE_SYSTEM_PROMPT {
        CallKind::Estimate
    } else {
        CallKind::Comparisons
    }
}

/// Canned replies routed by prompt. A missing reply behaves like an outage.
#[derive(Default)]
pub struct ScriptedModel {
    ethics: Option<String>,
    estimate: Option<String>,
    comparisons: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ethics(mut self, reply: &str) -> Self {
        self.ethics = Some(reply.to_string());
        self
    }

    pub fn estimate(mut self, reply: &str) -> Self {
        self.estimate = Some(reply.to_string());
        self
    }

    /// Queued in order; the last one is reused once the queue runs dry.
    pub fn comparisons(self, reply: &str) -> Self {
        self.comparisons.lock().unwrap().push_back(reply.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|r| call_kind(r) == kind).count()
    }

    fn next_comparisons(&self) -> Option<String> {
        let mut queue = self.comparisons.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, ModelError> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = match call_kind(&request) {
            CallKind::Ethics => self.ethics.clone(),
            CallKind::Estimate => self.estimate.clone(),
            CallKind::Comparisons => self.next_comparisons(),
        };

        reply
            .map(|text| ChatCompletion {
                text,
                model: SCRIPTED_MODEL.to_string(),
            })
            .ok_or(ModelError::Status {
                status: 503,
                body: "scripted outage".to_string(),
            })
    }
}

/// Answers the ethics and estimate calls, then hangs on the comparison call.
pub struct StallingModel {
    pub stall: Duration,
}

#[async_trait]
impl ChatModel for StallingModel {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, ModelError> {
        let text = match call_kind(&request) {
            CallKind::Ethics => "YES",
            CallKind::Estimate => "12",
            CallKind::Comparisons => {
                tokio::time::sleep(self.stall).await;
                "{}"
            }
        };
        Ok(ChatCompletion {
            text: text.to_string(),
            model: SCRIPTED_MODEL.to_string(),
        })
    }
}

pub fn pipeline_with(
    config: &Config,
    model: Arc<dyn ChatModel>,
) -> (WorthPipeline, Arc<InMemoryHistory>) {
    let history = Arc::new(InMemoryHistory::from_config(config));
    let store: Arc<dyn HistoryStore> = history.clone();
    let pipeline = WorthPipeline::new(config, model, store).expect("valid test config");
    (pipeline, history)
}
