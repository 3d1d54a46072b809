//! Command-line entry point.
//!
//! # Responsibility
//! - Build weak-label JSONL datasets from `{text, action}` JSON arrays.
//! - Run the rule-only interpreter for one text or a stdin line loop.

use clap::{Parser, Subcommand};
use log::error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasknl_core::{
    build_dataset, core_version, init_logging, interpret_heuristic, Action, CommandAssembler,
    InterpreterConfig,
};

/// Natural-language task command tooling.
#[derive(Parser, Debug)]
#[command(name = "tasknl", version, about, long_about = None)]
struct Cli {
    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, env = "TASKNL_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "TASKNL_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// JSON interpreter config (`intent_dir`, `slots_dir`, `log_level`)
    #[arg(long, env = "TASKNL_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a JSON array of {text, action} records into JSONL with slots
    BuildDataset {
        /// Path to the JSON dataset (array)
        #[arg(long)]
        input: PathBuf,

        /// Path to the output JSONL file
        #[arg(long)]
        output: PathBuf,
    },

    /// Interpret text with the rule-only slot tagger
    Parse {
        /// Action reported by the upstream classifier
        #[arg(long, default_value = "add", value_parser = parse_action)]
        action: Action,

        /// Classifier confidence passed through to the command
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,

        /// Text to interpret
        #[arg(long, required_unless_present = "interactive", conflicts_with = "interactive")]
        text: Option<String>,

        /// Read one text per stdin line and print one JSON command per line
        #[arg(long)]
        interactive: bool,
    },
}

fn parse_action(value: &str) -> Result<Action, String> {
    Action::parse(value).ok_or_else(|| {
        format!("unknown action `{value}`; expected add|update|done|reopen|remove")
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error version={}", core_version());
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<InterpreterConfig, String> {
    match path {
        Some(path) => InterpreterConfig::from_json_file(path).map_err(|err| err.to_string()),
        None => Ok(InterpreterConfig::default()),
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::BuildDataset { input, output } => {
            let written = build_dataset(&input, &output).map_err(|err| err.to_string())?;
            println!("wrote {written} records to {}", output.display());
            Ok(())
        }
        Commands::Parse {
            action,
            confidence,
            text,
            interactive,
        } => {
            if interactive {
                return parse_lines(action, confidence);
            }
            let text = text.unwrap_or_default();
            let command =
                interpret_heuristic(&text, action, confidence, &CommandAssembler::for_today());
            let json = serde_json::to_string_pretty(&command).map_err(|err| err.to_string())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_lines(action: Action, confidence: f64) -> Result<(), String> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| err.to_string())?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let command =
            interpret_heuristic(text, action, confidence, &CommandAssembler::for_today());
        let json = serde_json::to_string(&command).map_err(|err| err.to_string())?;
        writeln!(out, "{json}").map_err(|err| err.to_string())?;
        out.flush().map_err(|err| err.to_string())?;
    }
    Ok(())
}
