use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dapur_core::corpus::Corpus;
use dapur_core::persist::ModelStore;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dapur-indexer")]
#[command(about = "Fit and cache the recipe recommendation model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the vector space model from a recipe dataset
    Build {
        /// Recipe dataset (JSON with a top-level `recipes` array)
        #[arg(long)]
        input: String,
        /// Output model directory
        #[arg(long)]
        output: String,
        /// Refit even when a matching cached artifact exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, force } => build(&input, &output, force),
    }
}

fn build(input: &str, output: &str, force: bool) -> Result<()> {
    let corpus = Corpus::load(input)
        .with_context(|| format!("loading recipe dataset from {input}"))?;
    tracing::info!(num_recipes = corpus.len(), "loaded corpus");

    let store = ModelStore::new(output);
    let model = if force {
        store.rebuild(&corpus)?
    } else {
        store.load_or_build(&corpus)?
    };
    tracing::info!(output, vocab = model.vocabulary_len(), "model ready");
    Ok(())
}
