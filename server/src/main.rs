use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use dapur_core::recommend::RecommenderConfig;
use dapur_core::service::RecommendationService;
use dapur_server::build_app;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Recipe dataset path
    #[arg(long, default_value = "./data/recipes.json")]
    corpus: String,
    /// Model cache directory
    #[arg(long, default_value = "./model")]
    model_dir: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Default number of recommendations per request
    #[arg(long, default_value_t = 5)]
    top_k: usize,
    /// Minimum similarity for a recipe to be returned
    #[arg(long, default_value_t = 0.05)]
    min_score: f32,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = RecommenderConfig {
        top_k: args.top_k,
        min_score: args.min_score,
    };
    let service = RecommendationService::open_or_build(&args.corpus, &args.model_dir, config)
        .context("recommendation service unavailable")?;
    let app: Router = build_app(Arc::new(service));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
