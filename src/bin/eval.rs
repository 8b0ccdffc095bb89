//! Benchmark evaluation runner
//!
//! Usage:
//!   eval --model <id> --benchmark <name> [OPTIONS]
//!   eval --list

use anyhow::{Context, Result};
use bench_console::api::{BackendClient, OllamaCatalog};
use bench_console::evaluation::{EvaluationSession, RunOutcome, MISSING_SELECTION_NOTICE};
use bench_console::Config;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn print_usage() {
    eprintln!(
        r#"
{} - Run a benchmark against an Ollama model via the benchmarking backend

{}
    eval --model <ID> --benchmark <NAME> [OPTIONS]
    eval --list

{}
    -m, --model <ID>          Model to evaluate
    -b, --benchmark <NAME>    Benchmark to run
    -l, --list                List available benchmarks and models, then exit
    -u, --backend-url <URL>   Benchmarking backend URL (default: http://localhost:8000)
    -o, --ollama-url <URL>    Ollama server URL for model listing (default: http://localhost:11434)
    -c, --config <PATH>       Load settings from a TOML config file
    -v, --verbose             Enable debug logging
    -h, --help                Print this help message

{}
    BENCH_BACKEND_URL         Overrides the backend URL
    OLLAMA_BASE_URL           Overrides the Ollama URL

{}
    eval --list
    eval -m llama3.2:3b -b simple_math
"#,
        "eval".bold(),
        "USAGE:".bold(),
        "OPTIONS:".bold(),
        "ENVIRONMENT:".bold(),
        "EXAMPLES:".bold(),
    );
}

struct CliArgs {
    model: Option<String>,
    benchmark: Option<String>,
    list: bool,
    backend_url: Option<String>,
    ollama_url: Option<String>,
    config: Option<String>,
    verbose: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        std::process::exit(0);
    }

    let mut parsed = CliArgs {
        model: None,
        benchmark: None,
        list: false,
        backend_url: None,
        ollama_url: None,
        config: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" | "-m" => {
                i += 1;
                if i < args.len() {
                    parsed.model = Some(args[i].clone());
                }
            }
            "--benchmark" | "-b" => {
                i += 1;
                if i < args.len() {
                    parsed.benchmark = Some(args[i].clone());
                }
            }
            "--list" | "-l" => {
                parsed.list = true;
            }
            "--backend-url" | "-u" => {
                i += 1;
                if i < args.len() {
                    parsed.backend_url = Some(args[i].clone());
                }
            }
            "--ollama-url" | "-o" => {
                i += 1;
                if i < args.len() {
                    parsed.ollama_url = Some(args[i].clone());
                }
            }
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    parsed.config = Some(args[i].clone());
                }
            }
            "--verbose" | "-v" => {
                parsed.verbose = true;
            }
            _ => {}
        }
        i += 1;
    }

    parsed
}

fn resolve_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))?
        }
        None => Config::default(),
    };

    if let Ok(url) = std::env::var("BENCH_BACKEND_URL") {
        config.backend_url = url;
    }
    if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
        config.ollama_url = url;
    }
    if let Some(url) = &args.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(url) = &args.ollama_url {
        config.ollama_url = url.clone();
    }

    Ok(config)
}

/// Print every benchmark with its description, then the model listing
///
/// Each description is fetched the same way a selection change fetches it.
async fn print_listing(session: &mut EvaluationSession) {
    println!("{}", "Benchmarks:".bold());
    let options: Vec<_> = session.benchmarks().to_vec();
    if options.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for option in options {
        if option.id.is_empty() {
            println!("  {}", option.label.dimmed());
            continue;
        }
        session.select_benchmark(&option.id).await;
        println!("  {}", option.id.bold());
        println!("    {}", session.description().dimmed());
    }

    println!();
    println!("{}", "Models:".bold());
    for option in session.picker().options() {
        println!("  {}", option.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    if args.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let config = resolve_config(&args)?;
    let timeout = Duration::from_secs(config.timeout_secs);
    let service = Arc::new(BackendClient::new(&config.backend_url, timeout));
    let catalog = Arc::new(OllamaCatalog::new(&config.ollama_url, timeout));
    let mut session = EvaluationSession::new(service, catalog);

    session.load_benchmarks().await;
    session.load_models().await;

    if args.list {
        print_listing(&mut session).await;
        return Ok(());
    }

    if let Some(model) = &args.model {
        if !session.select_model(model) {
            eprintln!(
                "{} model {model:?} is not in the listing",
                "Warning:".yellow()
            );
        }
    }
    if let Some(benchmark) = &args.benchmark {
        session.select_benchmark(benchmark).await;
    }

    eprintln!();
    eprintln!(
        "  {}      {}",
        "Model:".dimmed(),
        session.picker().selected_label()
    );
    eprintln!(
        "  {}  {}",
        "Benchmark:".dimmed(),
        session.selected_benchmark()
    );
    eprintln!("  {}", session.description().dimmed());
    eprintln!();

    match session.run().await {
        RunOutcome::MissingSelection => {
            eprintln!("{}", MISSING_SELECTION_NOTICE.yellow().bold());
            std::process::exit(2);
        }
        RunOutcome::Completed => {
            println!("{}", session.status().text().green().bold());
            for case in session.results() {
                println!();
                println!("{}", "Prompt:".bold());
                println!("  {}", case.prompt);
                println!("{}", "Response:".bold());
                println!("  {}", case.response);
            }
        }
        RunOutcome::Failed => {
            eprintln!("{}", session.status().text().red().bold());
            std::process::exit(1);
        }
    }

    Ok(())
}
