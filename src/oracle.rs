use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chain::{FallbackChain, Strategy};
use crate::error::StageFailure;
use crate::llm::{ChatModel, ChatOptions, ChatRequest};
use crate::models::{Comparison, MAX_COMPARISONS, MIN_COMPARISONS};
use crate::parsers::is_priceless_concept;
use crate::prompts::{ethics_user_prompt, ETHICS_SYSTEM_PROMPT};

const PRICELESS_POOL: &[(&str, &str)] = &[
    ("1 million sunset views", "🌅"),
    ("infinite smiles from a child", "👶"),
    ("10000 sincere thank yous", "🙏"),
    ("countless warm hugs", "🤗"),
    ("a lifetime of happy memories", "🧠"),
    ("all the stars in the sky", "✨"),
    ("every grain of sand on earth", "🏝️"),
    ("infinite heartbeats of joy", "❤️"),
    ("bottomless cups of happiness", "☕"),
    ("all the oxygen in the atmosphere", "💨"),
    ("endless moments of peace", "☮️"),
    ("timeless works of art", "🎨"),
    ("eternal birthday wishes", "🎂"),
    ("every tear of happiness ever shed", "😂"),
    ("unlimited second chances", "🔄"),
    ("depths of oceanic understanding", "🌊"),
    ("mountains of supportive words", "⛰️"),
    ("a forest worth of deep breaths", "🌲"),
    ("galaxies of inner peace", "🌌"),
    ("unlimited do-overs", "🔁"),
];

/// Texts of the intangible pool used for priceless results.
pub fn priceless_pool() -> impl Iterator<Item = &'static str> {
    PRICELESS_POOL.iter().map(|(text, _)| *text)
}

/// 5-7 distinct entries from the intangible pool, freshly shuffled.
pub fn priceless_comparisons<R: Rng>(rng: &mut R) -> Vec<Comparison> {
    let mut pool: Vec<&(&str, &str)> = PRICELESS_POOL.iter().collect();
    pool.shuffle(rng);

    let count = rng.gen_range(MIN_COMPARISONS..=MAX_COMPARISONS);
    pool.into_iter()
        .take(count)
        .map(|(text, emoji)| Comparison::with_emoji(*text, *emoji))
        .collect()
}

/// What the ethics chain sees: the item and the model's reply, if any.
#[derive(Debug, Clone)]
pub struct VerdictInput {
    pub item: String,
    pub reply: Option<String>,
}

/// "NO" means the item must stay priceless.
struct ModelVerdict;

impl Strategy<VerdictInput, bool> for ModelVerdict {
    fn name(&self) -> &'static str {
        "model-verdict"
    }

    fn attempt(&self, input: &VerdictInput) -> Result<bool, StageFailure> {
        let reply = input
            .reply
            .as_deref()
            .ok_or_else(|| StageFailure::new(self.name(), "no reply from model"))?;

        // Surrounding quotes and trailing `.`/`!` are ignored: "No." reads as NO.
        let answer = reply
            .trim()
            .trim_matches(|c: char| c == '"' || c == '.' || c == '!')
            .to_uppercase();
        match answer.as_str() {
            "NO" => Ok(true),
            "YES" => Ok(false),
            other => Err(StageFailure::new(
                self.name(),
                format!("unrecognized verdict {:?}", other),
            )),
        }
    }
}

struct StaticConcept;

impl Strategy<VerdictInput, bool> for StaticConcept {
    fn name(&self) -> &'static str {
        "static-concept"
    }

    fn attempt(&self, input: &VerdictInput) -> Result<bool, StageFailure> {
        Ok(is_priceless_concept(&input.item))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleVerdict {
    pub priceless: bool,
    pub source: &'static str,
    pub model: Option<String>,
}

/// Asks the model whether pricing an item is ethical.
pub struct EthicalOracle {
    model: Arc<dyn ChatModel>,
    model_name: String,
    chain: FallbackChain<VerdictInput, bool>,
}

impl EthicalOracle {
    pub fn new(model: Arc<dyn ChatModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            chain: FallbackChain::new().then(ModelVerdict).then(StaticConcept),
        }
    }

    pub async fn check(&self, item: &str) -> OracleVerdict {
        let mut options = ChatOptions::with_temperature(0.1);
        options.max_tokens = Some(5);

        let request = ChatRequest {
            model: self.model_name.clone(),
            system_prompt: ETHICS_SYSTEM_PROMPT.to_string(),
            user_prompt: ethics_user_prompt(item),
            options,
        };

        let (reply, model) = match self.model.chat_complete(request).await {
            Ok(completion) => (Some(completion.text), Some(completion.model)),
            Err(e) => {
                warn!("Ethical check failed, using static classifier: {}", e);
                (None, None)
            }
        };

        let input = VerdictInput {
            item: item.to_string(),
            reply,
        };
        // StaticConcept never declines, so the chain always resolves
        let (priceless, source) = match self.chain.run(&input) {
            Ok(resolved) => (resolved.value, resolved.stage),
            Err(_) => (is_priceless_concept(item), "static-concept"),
        };

        info!(item, priceless, source, "ethical check resolved");
        OracleVerdict {
            priceless,
            source,
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn input(item: &str, reply: Option<&str>) -> VerdictInput {
        VerdictInput {
            item: item.to_string(),
            reply: reply.map(str::to_string),
        }
    }

    #[test]
    fn model_verdict_parses_yes_and_no() {
        assert_eq!(ModelVerdict.attempt(&input("x", Some(" no\n"))).unwrap(), true);
        assert_eq!(ModelVerdict.attempt(&input("x", Some("YES."))).unwrap(), false);
        assert_eq!(ModelVerdict.attempt(&input("x", Some("\"No!\""))).unwrap(), true);
        assert!(ModelVerdict.attempt(&input("x", Some("YES, sure"))).is_err());
        assert!(ModelVerdict.attempt(&input("x", Some("Maybe"))).is_err());
        assert!(ModelVerdict.attempt(&input("x", None)).is_err());
    }

    #[test]
    fn unreadable_reply_falls_back_to_static_check() {
        let chain: FallbackChain<VerdictInput, bool> =
            FallbackChain::new().then(ModelVerdict).then(StaticConcept);

        let resolved = chain.run(&input("my wife", Some("I cannot answer that"))).unwrap();
        assert!(resolved.value);
        assert_eq!(resolved.stage, "static-concept");
    }

    #[test]
    fn priceless_comparisons_are_distinct_pool_entries() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: HashSet<&str> = priceless_pool().collect();

        for _ in 0..50 {
            let picked = priceless_comparisons(&mut rng);
            assert!((MIN_COMPARISONS..=MAX_COMPARISONS).contains(&picked.len()));

            let texts: HashSet<&str> = picked.iter().map(|c| c.text.as_str()).collect();
            assert_eq!(texts.len(), picked.len());
            assert!(texts.iter().all(|t| pool.contains(t)));
        }
    }
}
