//! CLI entry point for tasklane.

mod cli;
mod commands;
mod output;

use clap::Parser;

use tasklane_observability::ObservabilityConfig;

use crate::cli::{Cli, Command};

/// Load env files: ~/.tasklane/env first, then the working directory's .env.
fn load_env() {
    if let Some(home) = dirs::home_dir() {
        let env_file = home
            .join(tasklane_constant::app::DATA_DIR)
            .join("env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
        }
    }
    let _ = dotenvy::dotenv();
}

/// One-shot commands log to stderr (quiet by default); the TUI draws on the
/// alternate screen, so it logs to a rolling file under the data dir instead.
fn init_observability(cli: &Cli) {
    let mut obs = ObservabilityConfig::from_env();
    match cli.command {
        Command::Tui => {
            obs = obs
                .with_console(false)
                .with_log_dir(commands::data_dir().join(tasklane_core::db::LOGS_DIR));
        }
        _ => {
            if obs.log_level.is_none() {
                obs = obs.with_log_level("warn");
            }
        }
    }
    if let Err(e) = tasklane_observability::init(obs) {
        output::warning(&format!("Observability init failed (continuing): {}", e));
    }
}

#[tokio::main]
async fn main() {
    load_env();
    let cli = Cli::parse();
    output::init(cli.output);
    init_observability(&cli);

    if let Err(e) = commands::handle(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
