mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{admin, completions, list, tui, Context};
use crate::error::{exit_code_for, report_error};
use crm_config as config;

#[derive(Debug, Parser)]
#[command(name = "crm", version, about = "crm-dash CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the customer endpoint, e.g. http://127.0.0.1:8000/api/clientes/
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List customers with search, birthday filter and sorting
    List(list::ListArgs),
    #[command(subcommand)]
    Admin(admin::AdminCommand),
    Tui(tui::TuiArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        api_url,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Tui(args) => tui::launch(config_path, api_url, args, verbose),
        Command::Completions(args) => completions::emit(args),
        command => {
            let mut app_config =
                config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }
            if let Some(raw) = api_url {
                app_config.api.base_url = config::parse_base_url(&raw)?;
            }
            debug!(url = %app_config.api.base_url, "api endpoint resolved");

            let ctx = Context {
                json,
                config: &app_config,
            };

            match command {
                Command::List(args) => list::list_customers(&ctx, args),
                Command::Admin(cmd) => match cmd {
                    admin::AdminCommand::Generate => admin::generate(&ctx),
                    admin::AdminCommand::Reset(args) => admin::reset(&ctx, args),
                },
                Command::Tui(_) => unreachable!("tui command handled before config load"),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
