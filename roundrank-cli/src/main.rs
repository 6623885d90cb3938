mod config;
mod error;
mod input;
mod llm;
mod output;
mod parse;
mod prompt;
mod retry;
mod tournament;

use clap::Parser;
use roundrank_core::{Pricing, score_round_robin};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::{
    DEFAULT_COMPLETION_COST_PER_MILLION, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROMPT_COST_PER_MILLION,
};
use crate::llm::{DEFAULT_TIMEOUT_SECS, HttpTransport, JudgmentClient};
use crate::output::RunSummary;
use crate::retry::{DEFAULT_INITIAL_WAIT_MS, RetryPolicy};
use crate::tournament::{TournamentPlan, run_tournament};

const DEFAULT_SYMBOLS_FILE: &str = "symbols.txt";
const DEFAULT_OBJECTIVE_FILE: &str = "objective.txt";
const DEFAULT_API_KEY_FILE: &str = "appkey.txt";

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "roundrank", version, about = "Rank symbols against an objective with an LLM-judged round robin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Judge every pair of symbols once and rank them
    Rank(RankArgs),
    /// Create a default config file at ~/.config/roundrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one symbol per line, or a JSON array (default: symbols.txt)
    #[arg(long)]
    symbols: Option<PathBuf>,

    /// Inline symbol (repeatable)
    #[arg(long = "symbol")]
    inline_symbols: Vec<String>,

    /// File whose first line starting with a letter or digit is the objective
    #[arg(long, default_value = DEFAULT_OBJECTIVE_FILE)]
    objective: PathBuf,

    /// Instruction template file with OBJECTIVE, SYMBOL1 and SYMBOL2 tokens
    #[arg(long)]
    instructions: Option<PathBuf>,

    /// OpenAI-compatible base URL (default: https://api.x.ai)
    #[arg(long)]
    endpoint: Option<String>,

    /// Model ID for the API (default: grok-3-fast-beta)
    #[arg(long)]
    model: Option<String>,

    /// Bearer token for the API (also reads XAI_API_KEY / OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// File containing the bearer token (default: appkey.txt if present)
    #[arg(long)]
    api_key_file: Option<PathBuf>,

    /// Give up on a pair after this many transport retries. Default: retry forever.
    #[arg(long)]
    max_retries: Option<usize>,

    /// Seconds before a single oracle request is abandoned and retried. Default: 100
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Price per million prompt tokens. Default: 5.0
    #[arg(long)]
    prompt_cost: Option<f64>,

    /// Price per million completion tokens. Default: 25.0
    #[arg(long)]
    completion_cost: Option<f64>,

    /// Output JSON instead of tables (progress moves to stderr)
    #[arg(long)]
    json: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/roundrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Logs go to stderr; stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "warn,roundrank=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_key_file(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|k| k.trim().to_string())
        .unwrap_or_else(|e| bail(format!("Failed to read API key file {}: {e}", path.display())))
}

/// `--api-key` > env vars > `--api-key-file` > config `api_key_file` > ./appkey.txt
fn resolve_api_key(args: &RankArgs, config_key_file: Option<String>) -> Option<String> {
    if let Some(ref key) = args.api_key {
        return Some(key.clone());
    }
    if let Some(key) = ["XAI_API_KEY", "OPENAI_API_KEY"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
    {
        return Some(key);
    }
    if let Some(path) = args.api_key_file.clone().or_else(|| config_key_file.map(PathBuf::from)) {
        return Some(read_key_file(&path));
    }
    let fallback = Path::new(DEFAULT_API_KEY_FILE);
    if fallback.exists() {
        return Some(read_key_file(fallback));
    }
    tracing::warn!("no API key configured, sending unauthenticated requests");
    None
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => {
            init_tracing(args.verbose);
            run_rank(args).await;
        }
        Commands::Init => {
            let path = config::config_path();
            config::create_default_config(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set your default endpoint, model, prices, etc.");
        }
    }
}

async fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let endpoint = args.endpoint.clone().or(cfg.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let model = args.model.clone().or(cfg.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let max_retries = args.max_retries.or(cfg.max_retries);
    let timeout_secs = args.timeout_secs.or(cfg.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        bail("Request timeout must be at least one second");
    }

    let pricing = Pricing {
        prompt_per_million: args
            .prompt_cost
            .or(cfg.prompt_cost_per_million)
            .unwrap_or(DEFAULT_PROMPT_COST_PER_MILLION),
        completion_per_million: args
            .completion_cost
            .or(cfg.completion_cost_per_million)
            .unwrap_or(DEFAULT_COMPLETION_COST_PER_MILLION),
    };
    if pricing.prompt_per_million < 0.0 || pricing.completion_per_million < 0.0 {
        bail("Token prices must not be negative");
    }

    // Instruction template: CLI arg > config file > built-in default
    let template = match args.instructions.clone().or_else(|| cfg.instructions.map(PathBuf::from)) {
        Some(path) => prompt::load_template(&path),
        None => prompt::DEFAULT_TEMPLATE.to_string(),
    };

    let symbols_path = args.symbols.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SYMBOLS_FILE));
    let symbols = input::load_symbols(&symbols_path, args.symbols.is_some(), &args.inline_symbols);
    let objective = input::load_objective(&args.objective);

    // Every precondition is checked here, before the first oracle call.
    let plan = TournamentPlan::new(symbols, objective, template).unwrap_or_else(|e| bail(e));

    let api_key = resolve_api_key(&args, cfg.api_key_file);
    let transport = HttpTransport::with_timeout(&endpoint, api_key, Duration::from_secs(timeout_secs))
        .unwrap_or_else(|e| bail(format!("Failed to build HTTP client: {e}")));
    let judge = JudgmentClient::new(transport, model.clone(), RetryPolicy::new(DEFAULT_INITIAL_WAIT_MS, max_retries));

    tracing::debug!(%endpoint, %model, ?max_retries, timeout_secs, "oracle configured");

    // With --json, stdout is reserved for the JSON document.
    let mut progress: Box<dyn Write> = if args.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    output::write_preamble(&mut progress, plan.symbols(), plan.objective())
        .unwrap_or_else(|e| bail(format!("Failed to write output: {e}")));

    let report = run_tournament(&judge, &plan, pricing, &mut progress)
        .await
        .unwrap_or_else(|e| bail(format!("Failed to write output: {e}")));

    let rr = &report.round_robin;
    let scores = score_round_robin(rr);
    let win_counts = rr.ranked_win_counts();
    let summary = RunSummary {
        objective: plan.objective(),
        pairs_judged: rr.judged_count(),
        unresolved: rr.unresolved_count(),
        retries: report.total_retries,
        prompt_tokens: report.cost.prompt_tokens(),
        completion_tokens: report.cost.completion_tokens(),
        cost: report.cost.total(),
    };

    if args.json {
        output::print_json(&scores, &win_counts, &summary)
            .unwrap_or_else(|e| bail(format!("Failed to serialize results: {e}")));
    } else {
        output::print_tables(&scores, &win_counts, &summary);
    }
}
