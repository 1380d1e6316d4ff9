// src/main.rs
//
// Developer harness for the compute worker.
// Reads request envelopes as JSON Lines, feeds them to the worker and prints
// each response envelope as one JSON line.

use anyhow::Context;
use clap::Parser;
use quant_worker::config::{default_config_template, Config};
use quant_worker::engine::{Dispatcher, RequestSender, Worker};
use quant_worker::models::RequestEnvelope;
use quant_worker::traits::ResponseStream;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

#[derive(Parser)]
#[command(name = "quant-worker")]
#[command(about = "Background engine for price-path simulation, portfolio optimization and account normalization")]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<String>,

    /// JSON Lines file of request envelopes (stdin when omitted)
    #[arg(long, short)]
    input: Option<String>,

    /// Seed for reproducible runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Print a default configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", default_config_template());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).map_err(anyhow::Error::msg)?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.global.seed = args.seed;
    }

    let default_level = config.global.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let (sender, mut responses) = Worker::spawn(Dispatcher::new(&config), &config);

    // Print responses as they arrive
    let printer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(response) = responses.next().await {
            match serde_json::to_string(&response) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to serialize response [{}]: {}", response.correlation_id(), e),
            }
            count += 1;
        }
        count
    });

    let reader: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input file {}", path))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let submitted = feed_requests(reader, &sender).await?;
    drop(sender);

    let answered = printer.await.context("Response printer failed")?;
    info!("Submitted {} requests, received {} responses.", submitted, answered);

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Submits every parseable line of `reader` as a request.
async fn feed_requests(
    reader: Box<dyn AsyncRead + Unpin + Send>,
    sender: &RequestSender,
) -> anyhow::Result<usize> {
    let mut lines = BufReader::new(reader).lines();
    let mut submitted = 0usize;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RequestEnvelope>(line) {
            Ok(request) => {
                sender.submit(request).await?;
                submitted += 1;
            }
            Err(e) => warn!("Skipping line {}: not a request envelope: {}", line_no, e),
        }
    }

    Ok(submitted)
}
