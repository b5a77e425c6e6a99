// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use normalization_lib::{
    config::{self, ClassifierKind, EngineConfig},
    input, output, results, Classifier, KeywordClassifier, RemoteZeroShotClassifier,
    TfidfGrouper,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read mentions from a file, one per line, instead of prompting
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the CSV file is written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Classifier backing the categorizer
    #[arg(long, value_enum)]
    classifier: Option<ClassifierKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(_) => info!("No .env file found, using environment variables from system"),
    }

    let args = Args::parse();
    let mut engine_config = EngineConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = args.output_dir {
        engine_config.output_dir = dir;
    }
    if let Some(kind) = args.classifier {
        engine_config.classifier = kind;
    }
    engine_config.log_config();

    let mentions = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            input::collect_mentions(BufReader::new(file), &mut io::sink())?
        }
        None => {
            let mut stdout = io::stdout();
            input::write_banner(&mut stdout)?;
            input::collect_mentions(io::stdin().lock(), &mut stdout)?
        }
    };
    info!("Collected {} mentions", mentions.len());
    if args.input.is_none() {
        println!("\nEntity clustering will start now.\n");
    }

    let start_time = Instant::now();
    let classifier = build_classifier(&engine_config)?;
    let grouper = TfidfGrouper::new(config::NGRAM_SIZE);

    let resolution = normalization_lib::resolve_mentions(
        &mentions,
        classifier.as_ref(),
        &grouper,
        &engine_config,
    )
    .await?;

    let path = output::write_cluster_csv(&resolution.rows, &engine_config.output_dir)?;
    let runtime = start_time.elapsed().as_secs_f64();

    results::log_report(&resolution.stats);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!(
        "Runtime of the program was {} seconds.\n\n{} has been saved in {}.\n",
        runtime,
        file_name,
        engine_config.output_dir.display()
    );

    Ok(())
}

fn build_classifier(engine_config: &EngineConfig) -> Result<Box<dyn Classifier>> {
    match engine_config.classifier {
        ClassifierKind::Keyword => Ok(Box::new(KeywordClassifier::new())),
        ClassifierKind::Remote => {
            if engine_config.api_token.is_none() {
                warn!("HF_API_TOKEN is not set; the remote classifier may reject requests");
            }
            let classifier = RemoteZeroShotClassifier::new(
                &engine_config.classifier_url,
                engine_config.api_token.clone(),
                Duration::from_secs(engine_config.classifier_timeout_secs),
            )
            .context("Failed to build remote classifier")?;
            Ok(Box::new(classifier))
        }
    }
}
