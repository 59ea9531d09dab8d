//! Log output for the estimator binary.
//!
//! Records go to stderr, so they never interleave with the form printed on
//! stdout, and optionally to a log file. Both sinks share one level filter
//! that can be changed while the session runs (`log debug`).

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

const FALLBACK_LEVEL: &str = "info";

/// `2025-01-01T12:00:00.000+01:00  INFO app.rs:60 form ready backend=memory`
struct LogLine;

impl<S, N> FormatEvent<S, N> for LogLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        let level = meta.level();

        if ansi {
            write!(
                writer,
                "\x1b[2m{timestamp}\x1b[0m {}{level:>5}\x1b[0m ",
                level_color(level)
            )?;
        } else {
            write!(writer, "{timestamp} {level:>5} ")?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = source_name(file);
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// Last path component of a source file, for either separator.
fn source_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Log file that can be opened after the subscriber is installed. Records
/// written while it is closed are dropped.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

struct LogFileWriter<'a>(Option<MutexGuard<'a, Option<File>>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_deref_mut() {
            Some(Some(file)) => file.write(buf),
            _ => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_deref_mut() {
            Some(Some(file)) => file.flush(),
            _ => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // Poisoned means a writer panicked mid-record; drop output.
        LogFileWriter(self.0.lock().ok())
    }
}

/// Swaps a reloadable filter. Boxed because each handle is typed by the
/// subscriber stack beneath its layer.
type ReloadFn = Box<dyn Fn(EnvFilter) -> Result<(), reload::Error> + Send + Sync>;

/// Runtime switches kept once the subscriber is installed.
struct LogControls {
    level: ReloadFn,
    console: ReloadFn,
    file: LogFile,
}

static CONTROLS: OnceLock<LogControls> = OnceLock::new();

fn controls() -> Result<&'static LogControls> {
    CONTROLS
        .get()
        .ok_or_else(|| anyhow!("logging not yet initialized"))
}

fn initial_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Replaces the level filter. Takes a bare level (`debug`) or any
/// `EnvFilter` directive (`loan_core=trace,info`).
pub fn set_log_level(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;
    (controls()?.level)(filter).map_err(|e| anyhow!("log level reload failed: {e}"))
}

/// Turns stderr output on or off. The log file is unaffected.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
    (controls()?.console)(gate).map_err(|e| anyhow!("console reload failed: {e}"))
}

/// Appends log records to `path` from now on, closing any previous log file.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    let mut slot = controls()?
        .file
        .0
        .lock()
        .map_err(|_| anyhow!("log file slot poisoned"))?;
    *slot = Some(file);
    Ok(())
}

/// Installs the global subscriber from `config`. `RUST_LOG`, when set, wins
/// over `config.level`. Calling it a second time only reopens the log file.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file = LogFile::default();
    let (level_filter, level) = reload::Layer::new(initial_filter(&config.level));
    // Open gate; the level filter above is still the ceiling.
    let (console_gate, console) = reload::Layer::new(EnvFilter::new("trace"));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LogLine)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LogLine)
        .with_ansi(false)
        .with_writer(file.clone());

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        let _ = CONTROLS.set(LogControls {
            level: Box::new(move |filter| level.reload(filter)),
            console: Box::new(move |filter| console.reload(filter)),
            file,
        });
    } else if CONTROLS.get().is_none() {
        bail!("another tracing subscriber is already installed");
    }

    if let Some(path) = &config.file {
        enable_file_logging(path)?;
    }
    Ok(())
}
