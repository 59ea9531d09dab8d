pub mod app;
pub mod config;
pub mod events;
pub mod logging;
pub mod terminal;

pub use app::{Controller, Flow, apply, run_interactive, start};
pub use config::AppConfig;
