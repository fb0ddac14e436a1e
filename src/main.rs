use anyhow::Result;
use clap::Parser;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use worth_check::llm::OpenRouterClient;
use worth_check::storage::{HistoryStore, InMemoryHistory};
use worth_check::{Config, WorthCalculator, WorthError, WorthPipeline, WorthResult};

/// Is it worth it? Prices an item and puts the number in perspective.
#[derive(Parser, Debug)]
#[command(name = "worth-check", version, about)]
struct Cli {
    /// Country code used to localize prices (us, uk, jp, au, ...)
    #[arg(short, long)]
    country: Option<String>,

    /// Print each result as JSON
    #[arg(long)]
    json: bool,

    /// Items to evaluate
    #[arg(required = true)]
    items: Vec<String>,
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("worth_check=info".parse()?);

    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_human(item: &str, result: &WorthResult) {
    println!("{} = {}", item, result.price);
    for comparison in &result.comparisons {
        println!("  {}", comparison);
    }
    if let Some(model) = &result.model_used {
        println!("  (via {})", model);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    init_logging(&config)?;

    info!(model = %config.model, items = cli.items.len(), "Starting worth check");
    if config.api_key.is_none() {
        info!("No API key configured, requests will likely fall back to local content");
    }

    let client = Arc::new(OpenRouterClient::new(&config)?);
    let history: Arc<dyn HistoryStore> = Arc::new(InMemoryHistory::from_config(&config));
    let pipeline = WorthPipeline::new(&config, client, history)?;
    let calculator = WorthCalculator::new(pipeline);

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let country = cli.country.as_deref();
    let lookups = cli.items.iter().map(|item| {
        let calculator = &calculator;
        let token = &token;
        async move {
            let outcome = calculator.calculate_cancellable(item, country, token).await;
            (item, outcome)
        }
    });
    let outcomes = join_all(lookups).await;

    let mut failures = 0;
    for (item, outcome) in outcomes {
        match outcome {
            Ok(result) if cli.json => println!("{}", serde_json::to_string_pretty(&result)?),
            Ok(result) => print_human(item, &result),
            Err(WorthError::Cancelled) => {
                info!(item = %item, "cancelled");
                failures += 1;
            }
            Err(e) => {
                error!("Could not evaluate {:?}: {}", item, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} items could not be evaluated", failures, cli.items.len());
    }
    Ok(())
}
