use rand::seq::SliceRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::WorthError;
use crate::models::{Comparison, WorthResult, MAX_COMPARISONS};
use crate::parsers::{clean_text, format_price, format_quantity};
use crate::pipeline::WorthPipeline;

const MOCK_PRICES: &[(&[&str], f64)] = &[
    (&["porsche", "ferrari"], 150_000.0),
    (&["car"], 30_000.0),
    (&["house", "home"], 350_000.0),
    (&["diamond", "gold"], 15_000.0),
    (&["laptop", "computer"], 1_500.0),
    (&["phone"], 1_000.0),
    (&["watch"], 500.0),
    (&["dog", "cat"], 1_500.0),
    (&["coffee", "latte"], 5.0),
    (&["vacation", "trip"], 3_000.0),
];

struct Template {
    label: &'static str,
    unit_cost: f64,
    min_price: f64,
    emoji: &'static str,
}

impl Template {
    fn render(&self, price: f64) -> Comparison {
        Comparison::with_emoji(
            format!("{} {}", format_quantity(price / self.unit_cost), self.label),
            self.emoji,
        )
    }
}

const fn template(label: &'static str, unit_cost: f64, min_price: f64, emoji: &'static str) -> Template {
    Template {
        label,
        unit_cost,
        min_price,
        emoji,
    }
}

const TEMPLATES: &[Template] = &[
    template("Big Macs", 5.0, 5.0, "🍔"),
    template("cartons of eggs", 3.0, 3.0, "🥚"),
    template("divorce lawyer retainers", 15_000.0, 1_000.0, "⚖️"),
    template("pet hamsters judging your spending", 20.0, 20.0, "🐹"),
    template("gallons of gas", 4.0, 4.0, "⛽"),
    template("months of rent in a cardboard box", 1_000.0, 500.0, "🏠"),
    template("lawn-mowing goats", 120.0, 100.0, "🐐"),
    template("pints of donated blood", 300.0, 100.0, "🩸"),
    template("packs of instant noodles", 0.5, 1.0, "🍜"),
    template("college degrees", 100_000.0, 10_000.0, "🎓"),
    template("Starbucks coffees", 5.0, 5.0, "☕"),
    template("funeral services", 10_000.0, 1_000.0, "⚰️"),
    template("average weddings", 30_000.0, 1_000.0, "💍"),
    template("luxury yachts", 3_000_000.0, 10_000.0, "🛥️"),
    template("tooth fairy payouts", 5.0, 1.0, "🧚"),
    template("children raised to 18", 250_000.0, 10_000.0, "👶"),
];

const US_TEMPLATES: &[Template] = &[
    template("New York hot dogs", 3.0, 3.0, "🌭"),
    template("American weddings", 30_000.0, 1_000.0, "💃"),
];

const UK_TEMPLATES: &[Template] = &[
    template("pints of warm British beer", 6.0, 5.0, "🍺"),
    template("proper cups of tea", 3.0, 3.0, "🫖"),
];

const JP_TEMPLATES: &[Template] = &[
    template("high-end sushi dinners", 40.0, 30.0, "🍣"),
    template("packed Tokyo subway rides", 10.0, 5.0, "🚇"),
];

const AU_TEMPLATES: &[Template] = &[
    template("Australian flat whites", 8.0, 5.0, "☕"),
    template("spiders hiding in your shoes", 25.0, 1.0, "🕷️"),
];

fn country_templates(country: Option<&str>) -> &'static [Template] {
    match country.map(str::to_lowercase).as_deref() {
        Some("us") => US_TEMPLATES,
        Some("uk") => UK_TEMPLATES,
        Some("jp") => JP_TEMPLATES,
        Some("au") => AU_TEMPLATES,
        _ => &[],
    }
}

/// Rough keyword price, or a length-based guess scaled by a factor in [1, 2).
pub fn mock_price<R: Rng>(item: &str, rng: &mut R) -> f64 {
    let lower = item.to_lowercase();

    if let Some((_, price)) = MOCK_PRICES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
    {
        return *price;
    }

    let base = 50.0 + item.chars().count() as f64 * 20.0;
    base * (1.0 + rng.gen::<f64>())
}

/// A full result's worth of canned comparisons, country flavoured where possible.
pub fn mock_comparisons<R: Rng>(price: f64, country: Option<&str>, rng: &mut R) -> Vec<Comparison> {
    let local: Vec<Comparison> = country_templates(country)
        .iter()
        .filter(|t| t.min_price <= price)
        .map(|t| t.render(price))
        .collect();

    let mut general: Vec<&Template> = TEMPLATES.iter().filter(|t| t.min_price <= price).collect();
    general.shuffle(rng);

    let mut comparisons: Vec<Comparison> = general
        .into_iter()
        .take(MAX_COMPARISONS.saturating_sub(local.len()))
        .map(|t| t.render(price))
        .collect();
    comparisons.extend(local);
    comparisons.shuffle(rng);
    comparisons
}

/// A result computed without any model.
pub fn offline_result<R: Rng>(item: &str, country: Option<&str>, rng: &mut R) -> WorthResult {
    let price = mock_price(item, rng);
    WorthResult {
        price: format_price(price),
        comparisons: mock_comparisons(price, country, rng),
        model_used: None,
    }
}

/// Front door for callers: the model pipeline, with a canned answer when it
/// cannot produce one.
pub struct WorthCalculator {
    pipeline: WorthPipeline,
}

impl WorthCalculator {
    pub fn new(pipeline: WorthPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &WorthPipeline {
        &self.pipeline
    }

    pub async fn calculate(&self, item: &str, country: Option<&str>) -> Result<WorthResult, WorthError> {
        let outcome = self.pipeline.get_worth_comparisons(item, country).await;
        self.recover(item, country, outcome)
    }

    pub async fn calculate_cancellable(
        &self,
        item: &str,
        country: Option<&str>,
        token: &CancellationToken,
    ) -> Result<WorthResult, WorthError> {
        let outcome = self
            .pipeline
            .get_worth_comparisons_cancellable(item, country, token)
            .await;
        self.recover(item, country, outcome)
    }

    fn recover(
        &self,
        item: &str,
        country: Option<&str>,
        outcome: Result<WorthResult, WorthError>,
    ) -> Result<WorthResult, WorthError> {
        match outcome {
            Ok(result) => Ok(result),
            Err(e @ (WorthError::Cancelled | WorthError::EmptyItem)) => Err(e),
            Err(e) => {
                warn!("Worth pipeline failed, using offline comparisons: {}", e);
                let result = offline_result(&clean_text(item), country, &mut rand::thread_rng());
                info!(price = %result.price, comparisons = result.comparisons.len(), "offline result ready");
                Ok(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keyword_prices() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(mock_price("Ferrari F40", &mut rng), 150_000.0);
        assert_eq!(mock_price("oat latte", &mut rng), 5.0);
        assert_eq!(mock_price("beach house", &mut rng), 350_000.0);
    }

    #[test]
    fn unknown_items_scale_with_length() {
        let mut rng = StdRng::seed_from_u64(1);
        // "a kite" is 6 chars -> base 170
        let price = mock_price("a kite", &mut rng);
        assert!((170.0..340.0).contains(&price));
    }

    #[test]
    fn cheap_items_skip_expensive_templates() {
        let mut rng = StdRng::seed_from_u64(9);
        let comparisons = mock_comparisons(5.0, None, &mut rng);
        assert!(!comparisons.is_empty());
        assert!(comparisons.iter().all(|c| !c.text.contains("luxury yachts")));
    }

    #[test]
    fn country_templates_are_included() {
        let mut rng = StdRng::seed_from_u64(9);
        let comparisons = mock_comparisons(150_000.0, Some("JP"), &mut rng);
        assert_eq!(comparisons.len(), MAX_COMPARISONS);
        assert!(comparisons.iter().any(|c| c.text.ends_with("high-end sushi dinners")));
        assert!(comparisons.iter().any(|c| c.text.ends_with("packed Tokyo subway rides")));
    }

    #[test]
    fn offline_results_respect_result_size() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for item in ["Porsche 911", "iced latte", "a kite"] {
                let result = offline_result(item, Some("us"), &mut rng);
                assert!(
                    (5..=MAX_COMPARISONS).contains(&result.comparisons.len()),
                    "{} gave {} comparisons",
                    item,
                    result.comparisons.len()
                );
            }
        }
    }

    #[test]
    fn quantities_use_quantity_formatting() {
        let mut rng = StdRng::seed_from_u64(2);
        let result = offline_result("Porsche 911", None, &mut rng);
        assert_eq!(result.price, "$150,000.00");
        assert!(result
            .comparisons
            .iter()
            .all(|c| c.text.starts_with(|ch: char| ch.is_ascii_digit())));
    }
}
