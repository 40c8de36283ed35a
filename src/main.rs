use anyhow::Context;
use clap::Parser;
use minish::shell::DEFAULT_PROMPT;
use minish::{platform, Shell};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// A small interactive shell.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run a single command line and exit with its status
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    command: Option<String>,

    /// Prompt printed before each line is read
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let shell = Shell::new(platform::host()).with_prompt(cli.prompt);
    let stdout = io::stdout();
    let stderr = io::stderr();

    match cli.command {
        Some(line) => {
            let status = shell
                .execute_line(&line, &mut stdout.lock(), &mut stderr.lock())
                .context("failed to run command")?;
            Ok(status.code())
        }
        None => shell.run(io::stdin().lock(), stdout.lock(), stderr.lock()),
    }
}

fn main() {
    // Set RUST_LOG=debug for verbose logging; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            1
        }
    };
    process::exit(code);
}
