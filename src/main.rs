//! Runs a single statement through the tabular serializer and prints the result.
//!
//! Usage:
//!   shapeless [--config <path>] query  "<select statement>"
//!   shapeless [--config <path>] list   "<select statement>"
//!   shapeless [--config <path>] update "<insert/update/delete statement>"
//!
//! Settings come from the config file (default `shapeless.toml`, optional)
//! and `SHAPELESS_*` environment variables. Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use shapeless::serializer::Serializer;
use shapeless::settings::Settings;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "shapeless.toml";
const USAGE: &str = "usage: shapeless [--config <path>] <query|list|update> <statement>";

enum Command {
    Query,
    List,
    Update,
}

struct Invocation {
    config: PathBuf,
    command: Command,
    statement: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, String> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config = args.next().map(PathBuf::from).ok_or("--config needs a path")?;
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ => positional.push(arg),
        }
    }
    let [command, statement] = <[String; 2]>::try_from(positional).map_err(|_| USAGE.to_string())?;
    let command = match command.as_str() {
        "query" => Command::Query,
        "list" => Command::List,
        "update" => Command::Update,
        other => return Err(format!("unknown command '{}'\n{}", other, USAGE)),
    };
    Ok(Invocation { config, command, statement })
}

fn run(invocation: Invocation) -> shapeless::Result<String> {
    let settings = Settings::load(Some(&invocation.config))?;
    let serializer = Serializer::new(&settings);
    match invocation.command {
        Command::Query => serializer.execute_query(&invocation.statement),
        Command::List => serializer.execute_query_list(&invocation.statement),
        Command::Update => serializer.execute_update(&invocation.statement).map(|n| n.to_string()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shapeless=warn")))
        .init();

    let invocation = match parse_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };
    match run(invocation) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "statement failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
