use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loan_core::Field;
use tracing::debug;

use loan_ui::app::{self, Controller};
use loan_ui::events::Command;
use loan_ui::terminal::render;
use loan_ui::{AppConfig, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Loan payment estimator.
///
/// Computes a 15% down payment and the monthly payment for a sales price,
/// APR and number of payments. The last valid inputs are remembered between
/// runs.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML). Defaults to `loan-estimator.toml` if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend for remembered values (`sqlite` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Storage connection string, e.g. `sqlite:loan.db`.
    #[arg(long)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `loan_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Suppress console log output.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Print the form with the remembered values (default).
    Show,
    /// Change one or more fields, then print the form.
    Set {
        /// Sales price; currency symbols and separators are accepted.
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
        /// APR, one of the configured options.
        #[arg(long, allow_hyphen_values = true)]
        apr: Option<String>,
        /// Number of payments, one of the configured options.
        #[arg(long, allow_hyphen_values = true)]
        payments: Option<String>,
    },
    /// Reset the form and forget remembered values.
    Clear,
    /// Read commands from standard input.
    Interactive,
}

impl Mode {
    /// The commands a one-shot mode replays against the restored form.
    fn commands(&self) -> Vec<Command> {
        match self {
            Mode::Show | Mode::Interactive => Vec::new(),
            Mode::Clear => vec![Command::Clear],
            Mode::Set {
                price,
                apr,
                payments,
            } => {
                let mut commands = Vec::new();
                if let Some(price) = price {
                    commands.push(Command::Edit(Field::SalesPrice, price.clone()));
                    commands.push(Command::Blur);
                }
                if let Some(apr) = apr {
                    commands.push(Command::Edit(Field::Apr, apr.clone()));
                }
                if let Some(payments) = payments {
                    commands.push(Command::Edit(Field::NumPayments, payments.clone()));
                }
                commands
            }
        }
    }
}

// ─── configuration ───────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(backend) = &cli.backend {
        config.store.backend = backend.clone();
    }
    if let Some(db) = &cli.db {
        config.store.connection_string = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

async fn run_once(
    controller: &mut Controller,
    commands: &[Command],
) -> Result<()> {
    for command in commands {
        debug!(?command, "applying");
        app::apply(controller, command)
            .await
            .context("Failed to update saved values")?;
    }

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render(controller.view()))?;
    stdout.flush()?;
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init_logging(&config.logging)?;
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }

    let mut controller = app::start(&config).await?;

    match cli.mode.unwrap_or(Mode::Show) {
        Mode::Interactive => {
            let stdin = io::stdin().lock();
            app::run_interactive(&mut controller, stdin, io::stdout()).await
        }
        mode => run_once(&mut controller, &mode.commands()).await,
    }
}
