use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shs_eval::catalog::Language;
use shs_eval::config::Config;
use shs_eval::output::{self, ExportFormat, OutputFormat};
use shs_eval::runner::{Runner, compute_statistics};
use shs_eval::{evaluation, input};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// System Hallucination Scale CLI - score SHS questionnaires and summarize batches
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output - debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single questionnaire given as ten responses q1..q10
    Score(ScoreArgs),
    /// Score a JSON or CSV file of questionnaires
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Responses for q1..q10, each in -2..=2
    #[arg(num_args = 10, value_name = "RESPONSE", allow_negative_numbers = true)]
    responses: Vec<i64>,

    /// Language for labels
    #[arg(short, long, default_value = "en")]
    language: Language,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input file (.csv for tabular input, JSON otherwise)
    input: PathBuf,

    /// Output file path for the evaluation results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format for the results file
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Language for labels
    #[arg(short, long)]
    language: Option<Language>,

    /// Print a statistical summary
    #[arg(short, long)]
    stats: bool,

    /// Save statistics to a JSON file
    #[arg(long)]
    stats_output: Option<PathBuf>,

    /// Evaluate the batch in parallel
    #[arg(long)]
    parallel: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let result = evaluation::calculate_from_list(&args.responses, args.language)?;
    output::print_evaluation(&result, args.output);
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let language = args.language.unwrap_or_else(|| config.language());
    let format = args.format.unwrap_or(config.format);
    let parallel = args.parallel || config.parallel;
    let print_stats = args.stats || config.statistics.print;
    let stats_output = args
        .stats_output
        .or_else(|| config.statistics.output.as_ref().map(PathBuf::from));

    info!(path = %args.input.display(), "Loading responses");
    let responses = input::load_responses(&args.input)?;
    info!(count = responses.len(), "Loaded evaluations");

    let outcome = Runner::new(language)
        .with_parallel(parallel)
        .process_batch(&responses);

    if let Some(path) = &args.output {
        output::export_results(&outcome.results, path, format)?;
    }

    if print_stats || stats_output.is_some() {
        let stats = compute_statistics(&outcome.results);

        if print_stats {
            output::print_statistics(&stats, OutputFormat::Plain);
        }
        if let Some(path) = &stats_output {
            output::export_statistics(&stats, path)?;
        }
    }

    Ok(())
}
