use std::sync::Arc;
use tracing::{info, warn};

use crate::chain::{FallbackChain, Strategy};
use crate::error::StageFailure;
use crate::llm::{ChatModel, ChatOptions, ChatRequest};
use crate::models::{EstimateKind, PriceEstimate};
use crate::parsers::{extract_first_number, is_usable_amount, looks_like_person_name};
use crate::prompts::{estimate_user_prompt, ESTIMATE_SYSTEM_PROMPT};

const PERSON_FALLBACKS: &[(&[&str], f64)] = &[
    (&["trump"], 2_500_000_000.0),
    (&["biden", "president"], 10_000_000.0),
    (&["musk", "elon"], 180_000_000_000.0),
    (&["bezos"], 140_000_000_000.0),
    (&["swift", "taylor"], 1_200_000_000.0),
    (&["kardashian"], 1_800_000_000.0),
    (&["bieber"], 300_000_000.0),
    (&["actor", "actress"], 20_000_000.0),
    (&["singer", "musician"], 15_000_000.0),
    (&["athlete", "player"], 25_000_000.0),
];

const ITEM_FALLBACKS: &[(&[&str], f64)] = &[
    (&["porsche", "911"], 120_000.0),
    (&["house", "home"], 350_000.0),
    (&["car"], 30_000.0),
    (&["phone"], 1_000.0),
    (&["coffee"], 4.50),
    (&["bread"], 2.50),
    (&["pizza"], 15.00),
];

const GENERIC_NET_WORTH: f64 = 5_000_000.0;
const GENERIC_ITEM_PRICE: f64 = 500.0;

/// Plausible range for a recognised item; values outside it are reset.
struct SanityClamp {
    keyword: &'static str,
    min: f64,
    max: f64,
    reset: f64,
}

const SANITY_CLAMPS: &[SanityClamp] = &[
    SanityClamp { keyword: "pizza", min: 5.0, max: 50.0, reset: 15.00 },
    SanityClamp { keyword: "coffee", min: 1.0, max: 10.0, reset: 4.50 },
    SanityClamp { keyword: "bread", min: 1.0, max: 10.0, reset: 2.50 },
];

/// Applies the first matching clamp. Runs after every resolution path,
/// model answers included.
pub fn clamp_to_sanity(item: &str, value: f64) -> f64 {
    let lower = item.to_lowercase();

    match SANITY_CLAMPS.iter().find(|c| lower.contains(c.keyword)) {
        Some(clamp) if !(clamp.min..=clamp.max).contains(&value) => clamp.reset,
        _ => value,
    }
}

#[derive(Debug, Clone)]
pub struct EstimateInput {
    pub item: String,
    pub kind: EstimateKind,
    pub reply: Option<String>,
}

struct ModelReply;

impl Strategy<EstimateInput, f64> for ModelReply {
    fn name(&self) -> &'static str {
        "model"
    }

    fn attempt(&self, input: &EstimateInput) -> Result<f64, StageFailure> {
        let reply = input
            .reply
            .as_deref()
            .ok_or_else(|| StageFailure::new(self.name(), "no reply from model"))?;

        match extract_first_number(reply) {
            Some(value) if is_usable_amount(value) => Ok(value),
            Some(value) => Err(StageFailure::new(self.name(), format!("unusable value {}", value))),
            None => Err(StageFailure::new(self.name(), format!("no number in {:?}", reply))),
        }
    }
}

struct KeywordTable;

impl Strategy<EstimateInput, f64> for KeywordTable {
    fn name(&self) -> &'static str {
        "keyword-table"
    }

    fn attempt(&self, input: &EstimateInput) -> Result<f64, StageFailure> {
        let table = match input.kind {
            EstimateKind::NetWorth => PERSON_FALLBACKS,
            EstimateKind::Item => ITEM_FALLBACKS,
        };
        let lower = input.item.to_lowercase();

        table
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, value)| *value)
            .ok_or_else(|| StageFailure::new(self.name(), "no keyword matched"))
    }
}

struct GenericDefault;

impl Strategy<EstimateInput, f64> for GenericDefault {
    fn name(&self) -> &'static str {
        "generic-default"
    }

    fn attempt(&self, input: &EstimateInput) -> Result<f64, StageFailure> {
        Ok(match input.kind {
            EstimateKind::NetWorth => GENERIC_NET_WORTH,
            EstimateKind::Item => GENERIC_ITEM_PRICE,
        })
    }
}

/// Estimates an item price or a person's net worth.
pub struct PriceEstimator {
    model: Arc<dyn ChatModel>,
    model_name: String,
    chain: FallbackChain<EstimateInput, f64>,
}

impl PriceEstimator {
    pub fn new(model: Arc<dyn ChatModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            chain: FallbackChain::new()
                .then(ModelReply)
                .then(KeywordTable)
                .then(GenericDefault),
        }
    }

    pub async fn estimate(&self, item: &str, country: Option<&str>) -> PriceEstimate {
        let kind = if looks_like_person_name(item) {
            EstimateKind::NetWorth
        } else {
            EstimateKind::Item
        };
        info!(model = %self.model_name, action = "price estimation", item, %kind, "starting model request");

        let request = ChatRequest {
            model: self.model_name.clone(),
            system_prompt: ESTIMATE_SYSTEM_PROMPT.to_string(),
            user_prompt: estimate_user_prompt(item, country, kind),
            options: ChatOptions::with_temperature(0.1),
        };

        let (reply, model) = match self.model.chat_complete(request).await {
            Ok(completion) => (Some(completion.text), Some(completion.model)),
            Err(e) => {
                warn!("Price estimate request failed, using fallback tables: {}", e);
                (None, None)
            }
        };

        let input = EstimateInput {
            item: item.to_string(),
            kind,
            reply,
        };
        Self::resolve(&self.chain, input, model)
    }

    fn resolve(
        chain: &FallbackChain<EstimateInput, f64>,
        input: EstimateInput,
        model: Option<String>,
    ) -> PriceEstimate {
        // GenericDefault never declines
        let (raw, source) = match chain.run(&input) {
            Ok(resolved) => (resolved.value, resolved.stage),
            Err(_) => match input.kind {
                EstimateKind::NetWorth => (GENERIC_NET_WORTH, "generic-default"),
                EstimateKind::Item => (GENERIC_ITEM_PRICE, "generic-default"),
            },
        };

        let value = clamp_to_sanity(&input.item, raw);
        if source != "model" {
            warn!(item = %input.item, value, source, "used fallback price");
        } else if value != raw {
            warn!(item = %input.item, raw, value, "model estimate outside sane range, reset");
        } else {
            info!(item = %input.item, value, "extracted price");
        }

        PriceEstimate {
            value,
            kind: input.kind,
            source,
            model,
        }
    }
}
