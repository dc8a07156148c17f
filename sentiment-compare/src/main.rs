//! Sentiment Comparison CLI

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sentiment_compare::{
    analysis::max_weighted_errors,
    backends::{create_backends_with_config, has_credentials, KNOWN_BACKENDS},
    config::Config,
    corpus::load_corpus_from_file,
    reporting::{print_console_report, JsonSummary, TsvWriter},
    runner::{ConsoleProgress, Evaluator},
};

#[derive(Parser)]
#[command(name = "sentiment-compare")]
#[command(about = "Compare sentiment analysis backends against a gold-labelled corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (TOML, or the tab-separated key/value format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every backend against a corpus
    Run {
        /// Tab-separated corpus file (text, gold label)
        #[arg(long)]
        corpus: PathBuf,

        /// Comma-separated backend list (default: from configuration)
        #[arg(short, long)]
        backends: Option<String>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known backends and whether they are usable
    ListBackends,

    /// Validate a corpus file and show its label distribution
    CheckCorpus {
        /// Tab-separated corpus file
        #[arg(long)]
        corpus: PathBuf,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/backends.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run {
            corpus,
            backends,
            output,
        } => {
            run_evaluation(cli.config.as_deref(), corpus, backends, output).await?;
        }

        Commands::ListBackends => {
            list_backends(cli.config.as_deref())?;
        }

        Commands::CheckCorpus { corpus } => {
            check_corpus(corpus)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if verbose {
        EnvFilter::new("sentiment_compare=debug,info")
    } else {
        EnvFilter::new("sentiment_compare=info,warn")
    };

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn run_evaluation(
    config_path: Option<&Path>,
    corpus_path: PathBuf,
    backends_arg: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d-%H%M%S").to_string();

    println!("=== Sentiment Backend Comparison ===");
    println!("Run ID: {}", run_id);
    println!();

    let config = Config::load(config_path)?;

    let registry = match backends_arg {
        Some(names) => {
            let names: Vec<&str> = names
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            create_backends_with_config(&config, Some(&names))?
        }
        None => create_backends_with_config(&config, None)?,
    };
    println!("Backends: {}", registry.names().join(", "));

    let corpus = load_corpus_from_file(&corpus_path)?;
    println!(
        "Corpus: {} ({} evaluable documents)",
        corpus_path.display(),
        corpus.gold_labels().len()
    );
    println!();

    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.evaluation.output_dir));
    let run_dir = output_dir.join(&run_id);
    std::fs::create_dir_all(&run_dir)?;

    let evaluator = Evaluator::new(registry).with_progress(Arc::new(ConsoleProgress));

    let results_path = run_dir.join("results.tsv");
    let mut sink = TsvWriter::create(&results_path, &evaluator.backend_names())?;

    println!("Running evaluation...");
    let report = evaluator.evaluate(&corpus, &mut sink).await?;
    sink.into_inner()?;

    print_console_report(&report);

    let summary_path = run_dir.join("summary.json");
    let summary = JsonSummary::from_report(&run_id, &report, "results.tsv");
    summary.write_to_file(&summary_path)?;

    let elapsed = Utc::now() - started_at;
    println!("\nResults saved to: {}", run_dir.display());
    println!("  - {}", results_path.display());
    println!("  - {}", summary_path.display());
    println!("Completed in {}s", elapsed.num_seconds());

    Ok(())
}

fn list_backends(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(config_path)?;

    println!("Known Backends ({}):", KNOWN_BACKENDS.len());
    println!("{:-<60}", "");

    for name in KNOWN_BACKENDS {
        let enabled = config.get_backend(name).map(|b| b.enabled).unwrap_or(false);
        let selected = config.evaluation.backends.iter().any(|b| b == name);
        let credentials = if has_credentials(name, &config) {
            "ok"
        } else {
            "missing"
        };
        println!(
            "  {:<12} | enabled: {:<5} | selected: {:<5} | credentials: {}",
            name, enabled, selected, credentials
        );
    }

    Ok(())
}

fn check_corpus(corpus_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = load_corpus_from_file(&corpus_path)?;
    let gold_labels = corpus.gold_labels();

    println!("Corpus: {}", corpus_path.display());
    println!("{:-<60}", "");
    println!("  Documents:           {}", corpus.len());
    println!("  Evaluable:           {}", gold_labels.len());
    for (label, count) in corpus.label_distribution() {
        println!("    {:<18} {}", label.display_name(), count);
    }
    println!("  Max weighted errors: {}", max_weighted_errors(&gold_labels));

    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
