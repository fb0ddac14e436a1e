use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::backfill;
use crate::config::Config;
use crate::error::WorthError;
use crate::estimator::{clamp_to_sanity, PriceEstimator};
use crate::filter::DiversityFilter;
use crate::llm::ChatModel;
use crate::models::{
    Comparison, ComparisonPayload, EstimateKind, PriceEstimate, WorthResult, PRICELESS,
};
use crate::oracle::{priceless_comparisons, EthicalOracle};
use crate::parsers::{
    clean_text, format_net_worth, format_price, is_priceless_concept, is_usable_amount,
    parse_price_value,
};
use crate::requester::ComparisonRequester;
use crate::salvage::SalvageEngine;
use crate::storage::{HistoryStore, HistoryUpdate, RecencySnapshot};

/// A finished result plus the history changes it wants to make.
///
/// Nothing reaches the history store until [`WorthPipeline::finish`] runs.
#[derive(Debug)]
struct Evaluation {
    result: WorthResult,
    update: Option<HistoryUpdate>,
}

impl Evaluation {
    fn priceless(model_used: Option<String>) -> Self {
        let comparisons = priceless_comparisons(&mut rand::thread_rng());
        Self {
            result: WorthResult {
                price: PRICELESS.to_string(),
                comparisons,
                model_used,
            },
            update: None,
        }
    }
}

/// "none" and blank mean no country.
fn normalize_country(country: Option<&str>) -> Option<&str> {
    country
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("none"))
}

/// Price from the salvaged document, falling back to the estimate, then clamped.
pub fn reconcile_price(document_price: Option<&Value>, estimate: f64, item: &str) -> f64 {
    let value = document_price
        .and_then(parse_price_value)
        .filter(|v| is_usable_amount(*v))
        .unwrap_or(estimate);
    clamp_to_sanity(item, value)
}

/// Turns an item into a priced, de-duplicated comparison set.
pub struct WorthPipeline {
    oracle: EthicalOracle,
    estimator: PriceEstimator,
    requester: ComparisonRequester,
    salvage: SalvageEngine,
    filter: DiversityFilter,
    history: Arc<dyn HistoryStore>,
    parallel_checks: bool,
}

impl WorthPipeline {
    pub fn new(
        config: &Config,
        model: Arc<dyn ChatModel>,
        history: Arc<dyn HistoryStore>,
    ) -> Result<Self, WorthError> {
        config
            .validate()
            .map_err(|e| WorthError::Config(e.to_string()))?;

        Ok(Self {
            oracle: EthicalOracle::new(model.clone(), config.model.clone()),
            estimator: PriceEstimator::new(model.clone(), config.model.clone()),
            requester: ComparisonRequester::new(model, config.model.clone()),
            salvage: SalvageEngine::new(),
            filter: DiversityFilter::new(),
            history,
            parallel_checks: config.parallel_checks,
        })
    }

    /// Replaces the salvage engine, e.g. with one that never synthesises content.
    pub fn with_salvage(mut self, salvage: SalvageEngine) -> Self {
        self.salvage = salvage;
        self
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub async fn get_worth_comparisons(
        &self,
        item: &str,
        country: Option<&str>,
    ) -> Result<WorthResult, WorthError> {
        let evaluation = self.evaluate(item, country).await?;
        Ok(self.finish(evaluation).await)
    }

    /// Like [`get_worth_comparisons`](Self::get_worth_comparisons), but gives up
    /// as soon as `token` is cancelled. A cancelled request never touches the
    /// history store.
    pub async fn get_worth_comparisons_cancellable(
        &self,
        item: &str,
        country: Option<&str>,
        token: &CancellationToken,
    ) -> Result<WorthResult, WorthError> {
        let evaluation = tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(item, "worth request cancelled");
                return Err(WorthError::Cancelled);
            }
            evaluation = self.evaluate(item, country) => evaluation?,
        };

        if token.is_cancelled() {
            info!(item, "worth request cancelled before commit");
            return Err(WorthError::Cancelled);
        }
        Ok(self.finish(evaluation).await)
    }

    async fn finish(&self, evaluation: Evaluation) -> WorthResult {
        if let Some(update) = evaluation.update {
            self.history.commit(update).await;
        }
        evaluation.result
    }

    async fn evaluate(&self, item: &str, country: Option<&str>) -> Result<Evaluation, WorthError> {
        let item = clean_text(item);
        if item.is_empty() {
            return Err(WorthError::EmptyItem);
        }
        let country = normalize_country(country);
        info!(item = %item, country = ?country, "evaluating worth");

        if is_priceless_concept(&item) {
            info!(item = %item, "static classifier marked item priceless");
            return Ok(Evaluation::priceless(None));
        }

        let estimate = if self.parallel_checks {
            let (verdict, estimate) =
                tokio::join!(self.oracle.check(&item), self.estimator.estimate(&item, country));
            if verdict.priceless {
                return Ok(Evaluation::priceless(ethics_label(verdict.model)));
            }
            estimate
        } else {
            let verdict = self.oracle.check(&item).await;
            if verdict.priceless {
                return Ok(Evaluation::priceless(ethics_label(verdict.model)));
            }
            self.estimator.estimate(&item, country).await
        };

        let (raw, completion_model) = match self.requester.request(&item, estimate.value, country).await {
            Ok(completion) => (completion.text, Some(completion.model)),
            Err(e) => {
                warn!("Comparison request failed, salvaging an empty reply: {}", e);
                (String::new(), None)
            }
        };

        let salvaged = self.salvage.salvage(&raw, estimate.value)?;
        let payload = ComparisonPayload::parse(&salvaged.json).map_err(|e| {
            error!("Salvaged document does not parse: {}", e);
            WorthError::ExhaustedFallback(e.to_string())
        })?;

        let price = reconcile_price(payload.price.as_ref(), estimate.value, &item);
        let formatted = match estimate.kind {
            EstimateKind::NetWorth => format_net_worth(price),
            EstimateKind::Item => format_price(price),
        };

        let snapshot = self.history.snapshot().await;
        let (comparisons, update) = self.assemble(&payload.comparisons, price, &estimate, &snapshot);

        let model_used = completion_model.or_else(|| estimate.model.clone());
        info!(
            model = model_used.as_deref().unwrap_or("none"),
            action = "comparison generation",
            item = %item,
            price = %formatted,
            comparisons = comparisons.len(),
            salvage_stage = salvaged.stage,
            "Completed request successfully"
        );

        Ok(Evaluation {
            result: WorthResult {
                price: formatted,
                comparisons,
                model_used,
            },
            update: Some(update),
        })
    }

    /// Filter, trim and backfill against one history snapshot.
    fn assemble(
        &self,
        candidates: &[Value],
        price: f64,
        estimate: &PriceEstimate,
        snapshot: &RecencySnapshot,
    ) -> (Vec<Comparison>, HistoryUpdate) {
        let mut rng = rand::thread_rng();

        let outcome = self.filter.filter(candidates, snapshot, &mut rng);
        let mut comparisons = outcome.accepted;
        let added = backfill::fill(
            &mut comparisons,
            &outcome.item_types,
            price,
            estimate.kind,
            snapshot,
            &mut rng,
        );

        let mut result_items = outcome.item_types.clone();
        result_items.extend(added);

        let update = HistoryUpdate {
            accepted_item_types: outcome.item_types,
            accepted_texts: outcome.texts,
            result_items,
        };
        (comparisons, update)
    }
}

fn ethics_label(model: Option<String>) -> Option<String> {
    model.map(|m| format!("Ethical check by {}", m))
}
