//! Wiring between configuration, the preference store, the controller and
//! the terminal session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use loan_core::store::{MemoryStoreFactory, StoreConfig, StoreRegistry};
use loan_core::{Field, FormController, FormEvent, FormState, FormView, PreferenceStore, StoreError};
use loan_store_sqlite::SqliteStoreFactory;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, FormConfig};
use crate::events::{Command, HELP};
use crate::logging;
use crate::terminal::render;

pub type Controller = FormController<FormState, Box<dyn PreferenceStore>>;

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Build the store registry with every backend this binary knows about.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

pub async fn open_store(config: &StoreConfig) -> Result<Box<dyn PreferenceStore>> {
    build_registry()
        .create(config)
        .await
        .with_context(|| format!("Failed to open '{}' store", config.backend))
}

pub fn new_form(config: &FormConfig) -> FormState {
    FormState::new(
        config.apr_options.clone(),
        config.num_payments_options.clone(),
        &config.defaults(),
    )
}

/// Opens the configured store and restores the previous session into a
/// fresh form.
pub async fn start(config: &AppConfig) -> Result<Controller> {
    let store = open_store(&config.store).await?;
    let mut controller =
        FormController::with_defaults(new_form(&config.form), store, config.form.defaults());

    let status = controller
        .restore_and_init()
        .await
        .context("Failed to restore saved values")?;
    info!(backend = %config.store.backend, shown = status.is_shown(), "form ready");
    Ok(controller)
}

/// Applies one command to the form.
pub async fn apply(
    controller: &mut Controller,
    command: &Command,
) -> Result<Flow, StoreError> {
    match command {
        Command::Edit(field, value) => {
            controller.view_mut().set_value(*field, value);
            controller.handle(FormEvent::Changed(*field)).await?;
        }
        Command::Blur => controller.handle(FormEvent::Committed(Field::SalesPrice)).await?,
        Command::Clear => controller.handle(FormEvent::Cleared).await?,
        Command::LogLevel(level) => {
            if let Err(e) = logging::set_log_level(level) {
                warn!("{e:#}");
            }
        }
        Command::Show | Command::Help => {}
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Reads commands line by line until `quit` or end of input, printing the
/// form after every command that can change it.
///
/// Store failures are logged and the session carries on.
pub async fn run_interactive<R, W>(
    controller: &mut Controller,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render(controller.view()))?;
    writeln!(output, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };
        debug!(?command, "command received");

        match apply(controller, &command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => error!(error = %e, "failed to update saved values"),
        }

        match command {
            Command::Help => writeln!(output, "{HELP}")?,
            Command::LogLevel(_) => {}
            _ => write!(output, "{}", render(controller.view()))?,
        }
        output.flush()?;
    }
    Ok(())
}
