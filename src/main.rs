use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prayoga::aggregator::{aggregate_directory, load_extracts, AggregateConfig, DEFAULT_AGGREGATE_TITLE};
use prayoga::discovery::{find_documents, DiscoveryConfig};
use prayoga::document::{load_extract, save_json};
use prayoga::enrichment::{enrich_document, EnrichOptions, WordFinder};
use prayoga::pipeline::{run_extractions, write_run_stats, ExtractConfig, DEFAULT_BASE_LINK};
use prayoga::stats::corpus_stats;
use prayoga::CitationExtractor;

#[derive(Parser, Debug)]
#[command(name = "prayoga")]
#[command(about = "Extracts Panini sutra citations and their explaining sentences from Sanskrit commentaries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract sutra sentences from commentary documents
    Extract(ExtractArgs),
    /// Merge extract documents into one index keyed by sutra
    Aggregate(AggregateArgs),
    /// Report coverage and overlap of sutras across extract documents
    Stats(StatsArgs),
    /// Fill empty words and add padas to extract documents in place
    Enrich(EnrichArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Source document, or a directory of *.json source documents
    input: PathBuf,

    /// Directory receiving <name>_Extract.json files
    #[arg(long, default_value = "texts/extract")]
    output_dir: PathBuf,

    /// Prefix of verse reference URLs
    #[arg(long, default_value = DEFAULT_BASE_LINK)]
    base_link: String,

    /// Document name for a single input file (defaults to the file stem)
    #[arg(long)]
    document_name: Option<String>,

    /// Overwrite existing extract files
    #[arg(long)]
    overwrite_all: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Directory of extract documents
    extract_dir: PathBuf,

    #[arg(long, default_value = "KavyaPrayogas.json")]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_AGGREGATE_TITLE)]
    title: String,

    /// Abort on first unreadable extract
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Directory of extract documents
    extract_dir: PathBuf,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EnrichArgs {
    /// Extract documents to enrich
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Leave empty word fields alone
    #[arg(long)]
    no_words: bool,

    /// Do not add pada fields
    #[arg(long)]
    no_pada: bool,
}

fn require_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }
    Ok(())
}

fn progress_bar(len: usize, hidden: bool) -> Result<Option<ProgressBar>> {
    if hidden || len < 2 {
        return Ok(None);
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} documents {elapsed}")?);
    Ok(Some(bar))
}

async fn extract(args: ExtractArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input does not exist: {}", args.input.display());
    }

    let inputs = if args.input.is_dir() {
        let config = DiscoveryConfig {
            fail_fast: args.fail_fast,
            ..Default::default()
        };
        find_documents(&args.input, config).await?
    } else {
        vec![args.input.clone()]
    };

    if inputs.len() > 1 && args.document_name.is_some() {
        anyhow::bail!("--document-name only applies to a single input file");
    }

    info!("Extracting {} documents into {}", inputs.len(), args.output_dir.display());

    let configs: Vec<ExtractConfig> = inputs
        .into_iter()
        .map(|input| {
            let mut config = ExtractConfig::for_input(input, &args.output_dir);
            if let Some(name) = &args.document_name {
                config.document_name = name.clone();
            }
            config.base_link = args.base_link.clone();
            config.overwrite_all = args.overwrite_all;
            config.fail_fast = args.fail_fast;
            config
        })
        .collect();

    let extractor = Arc::new(CitationExtractor::with_default_rules()?);
    let progress = progress_bar(configs.len(), args.no_progress)?;
    let run_stats = run_extractions(configs, extractor, progress).await?;

    println!(
        "Extraction complete: {} processed, {} skipped, {} failed, {} sutra sentences",
        run_stats.documents_processed,
        run_stats.documents_skipped,
        run_stats.documents_failed,
        run_stats.total_occurrences
    );

    if let Some(stats_out) = &args.stats_out {
        write_run_stats(stats_out, &run_stats).await?;
        info!("Run statistics written to {}", stats_out.display());
    }

    if args.fail_fast && run_stats.documents_failed > 0 {
        anyhow::bail!("{} documents failed", run_stats.documents_failed);
    }
    Ok(())
}

async fn aggregate(args: AggregateArgs) -> Result<()> {
    require_dir(&args.extract_dir)?;

    let config = AggregateConfig {
        title: args.title,
        fail_fast: args.fail_fast,
    };
    let aggregated = aggregate_directory(&args.extract_dir, &config).await?;
    save_json(&args.output, &aggregated).await?;

    println!("{}", aggregated.comment);
    println!("Written to {}", args.output.display());
    Ok(())
}

async fn stats(args: StatsArgs) -> Result<()> {
    require_dir(&args.extract_dir)?;

    let documents = load_extracts(&args.extract_dir, false).await?;
    let report = corpus_stats(&documents);

    match &args.output {
        Some(path) => {
            save_json(path, &report).await?;
            println!("Statistics written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

async fn enrich(args: EnrichArgs) -> Result<()> {
    let finder = WordFinder::new()?;
    let options = EnrichOptions {
        fill_words: !args.no_words,
        add_pada: !args.no_pada,
    };

    for path in &args.files {
        let mut document = load_extract(path).await?;
        let stats = enrich_document(&mut document, &finder, &options);
        save_json(path, &document).await?;

        println!(
            "{}: {} sentences, {} words filled, {} still empty, {} padas",
            path.display(),
            stats.total_sentences,
            stats.words_filled,
            stats.words_still_empty,
            stats.padas_added
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays usable for reports
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Command::Extract(args) => extract(args).await,
        Command::Aggregate(args) => aggregate(args).await,
        Command::Stats(args) => stats(args).await,
        Command::Enrich(args) => enrich(args).await,
    }
}
