//! Delver CLI: run one deep-research orchestration from the command line.

use clap::Parser;
use delver::{Config, TerminationReason};
use tracing_subscriber::EnvFilter;

/// Budgeted multi-agent deep research from the command line.
#[derive(Debug, Parser)]
#[command(name = "delver", version, about)]
struct Cli {
    /// The research brief, e.g. "Compare embedded vector databases".
    query: String,

    /// Override the reasoning model.
    #[arg(long)]
    model: Option<String>,

    /// Override the maximum supervisor rounds.
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Override the maximum parallel research units per round.
    #[arg(long)]
    max_units: Option<u32>,

    /// Verbose logging (equivalent to RUST_LOG=delver=debug).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "delver=debug"
    } else {
        "delver=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.research.max_supervisor_rounds = max_rounds;
    }
    if let Some(max_units) = cli.max_units {
        config.research.max_concurrent_units = max_units;
    }

    let outcome = run(&config, &cli.query).await?;

    match outcome.termination {
        TerminationReason::ExplicitComplete => {
            tracing::info!(rounds = outcome.rounds, "research completed")
        }
        TerminationReason::IterationBudgetExhausted => {
            tracing::info!(rounds = outcome.rounds, "research stopped at budget ceiling")
        }
        TerminationReason::Error => tracing::error!("research aborted"),
    }

    if outcome.notes.is_empty() {
        println!("No research notes were produced.");
    } else {
        println!("{}", outcome.joined_notes());
    }

    Ok(())
}

#[cfg(feature = "ollama")]
async fn run(config: &Config, brief: &str) -> anyhow::Result<delver::ResearchOutcome> {
    use delver::{DuckDuckGoProvider, OllamaClient, SearchPipeline, Supervisor};
    use std::sync::Arc;

    let llm = Arc::new(OllamaClient::new(&config.llm.ollama_url, &config.llm.model));
    let summarizer = Arc::new(OllamaClient::new(
        &config.llm.ollama_url,
        &config.llm.summarization_model,
    ));
    let pipeline = Arc::new(SearchPipeline::new(
        Arc::new(DuckDuckGoProvider::new()),
        summarizer,
        config.search.clone(),
    ));

    let supervisor = Supervisor::new(llm, pipeline, config.research.clone())?;
    Ok(supervisor.run(brief).await?)
}

#[cfg(not(feature = "ollama"))]
async fn run(_config: &Config, _brief: &str) -> anyhow::Result<delver::ResearchOutcome> {
    anyhow::bail!("built without an LLM provider; enable the `ollama` feature")
}
