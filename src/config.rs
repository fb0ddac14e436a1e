use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "nousresearch/hermes-3-llama-3.1-70b";
pub const DEFAULT_APP_TITLE: &str = "Is It Worth It?";
pub const DEFAULT_APP_REFERER: &str = "http://localhost";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub app_title: String,
    pub app_referer: String,
    pub request_timeout_seconds: u64,
    pub recent_item_capacity: usize,
    pub recent_comparison_capacity: usize,
    pub parallel_checks: bool,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            app_referer: DEFAULT_APP_REFERER.to_string(),
            request_timeout_seconds: 25,
            recent_item_capacity: 50,
            recent_comparison_capacity: 300,
            parallel_checks: true,
            log_json: false,
        }
    }
}

impl Config {
    /// Defaults, then `worth_check.{toml,json,yaml}`, then `WORTH_CHECK_*` variables.
    pub fn load() -> Result<Self> {
        let defaults = Config::default();

        let settings = config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("model", defaults.model)?
            .set_default("app_title", defaults.app_title)?
            .set_default("app_referer", defaults.app_referer)?
            .set_default("request_timeout_seconds", defaults.request_timeout_seconds as i64)?
            .set_default("recent_item_capacity", defaults.recent_item_capacity as i64)?
            .set_default(
                "recent_comparison_capacity",
                defaults.recent_comparison_capacity as i64,
            )?
            .set_default("parallel_checks", defaults.parallel_checks)?
            .set_default("log_json", defaults.log_json)?
            .add_source(config::File::with_name("worth_check").required(false))
            .add_source(config::Environment::with_prefix("WORTH_CHECK"))
            .build()
            .context("Failed to assemble configuration")?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("OPENROUTER_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_item_capacity == 0 || self.recent_comparison_capacity == 0 {
            anyhow::bail!("history capacities must be greater than zero");
        }
        Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid api_base_url: {}", self.api_base_url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_item_capacity, 50);
        assert_eq!(config.recent_comparison_capacity, 300);
    }

    #[test]
    fn rejects_zero_capacity_and_bad_url() {
        let zero = Config {
            recent_item_capacity: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let bad_url = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());
    }
}
