//! Interactive chat console
//!
//! Usage:
//!   chat [--backend-url <url>] [--ollama-url <url>] [--config <path>] [-v]

use anyhow::{Context, Result};
use bench_console::api::{BackendClient, OllamaCatalog};
use bench_console::chat::ChatSession;
use bench_console::transcript::{Role, THINKING_NOTICE};
use bench_console::Config;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn print_usage() {
    eprintln!(
        r#"
{} - Interactive chat against an Ollama benchmarking backend

{}
    chat [OPTIONS]

{}
    -u, --backend-url <URL>   Benchmarking backend URL (default: http://localhost:8000)
    -o, --ollama-url <URL>    Ollama server URL for model listing (default: http://localhost:11434)
    -c, --config <PATH>       Load settings from a TOML config file
    -v, --verbose             Enable debug logging
    -h, --help                Print this help message

{}
    BENCH_BACKEND_URL         Overrides the backend URL
    OLLAMA_BASE_URL           Overrides the Ollama URL

{}
    /model <id>               Switch to another listed model
    /models                   Show the model listing
    /clear                    Clear the chat
    /quit                     Exit
"#,
        "chat".bold(),
        "USAGE:".bold(),
        "OPTIONS:".bold(),
        "ENVIRONMENT:".bold(),
        "COMMANDS:".bold(),
    );
}

struct CliArgs {
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
        backend_url: None,
        ollama_url: None,
        config: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
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

fn print_header(config: &Config) {
    eprintln!();
    eprintln!("{}", "Chat Console".bold());
    eprintln!("  {}  {}", "Backend:".dimmed(), config.backend_url);
    eprintln!("  {}   {}", "Ollama:".dimmed(), config.ollama_url);
    eprintln!(
        "  {}",
        "Type a message and press Enter. /model <id>, /models, /clear, /quit".dimmed()
    );
    eprintln!();
}

/// Print transcript entries appended since the last call
///
/// User entries are skipped; the user just typed them on the line above.
fn render_new_entries(session: &ChatSession, rendered: &mut usize) {
    let entries = session.transcript().entries();
    if entries.len() < *rendered {
        *rendered = 0;
    }

    for entry in &entries[*rendered..] {
        match entry.role {
            Role::User => {}
            Role::Bot => println!("{} {}", "model>".green().bold(), entry.text),
            Role::System => println!("{}", format!("· {}", entry.text).dimmed()),
        }
    }
    *rendered = entries.len();
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
    let mut session = ChatSession::new(service, catalog);

    print_header(&config);

    let mut rendered = 0;
    session.load_models().await;
    render_new_entries(&session, &mut rendered);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(
            "{} ",
            format!("[{}] you>", session.message_count()).cyan().bold()
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => session.clear(),
            "/models" => {
                for option in session.picker().options() {
                    let marker =
                        if !option.id.is_empty() && option.id == session.picker().selected_id() {
                            "*"
                        } else {
                            " "
                        };
                    println!("{marker} {}", option.label);
                }
            }
            "/model" => {
                println!(
                    "{}",
                    format!("Current model: {}", session.current_model()).dimmed()
                );
            }
            command if command.starts_with("/model ") => {
                let id = command["/model ".len()..].trim();
                if !session.select_model(id) {
                    println!("{}", format!("Not in the model list: {id}").dimmed());
                }
            }
            command if command.starts_with('/') => {
                println!("{}", format!("Unknown command: {command}").dimmed());
            }
            message => {
                println!("{}", THINKING_NOTICE.dimmed());
                session.send(message).await;
            }
        }

        render_new_entries(&session, &mut rendered);
    }

    Ok(())
}
