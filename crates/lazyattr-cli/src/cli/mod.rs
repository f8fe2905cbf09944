//! CLI layer: the only place that knows about stdout, stderr and exit codes.
//!
//! - `setup`: argument parsing via clap
//! - `config`: layered configuration via confique
//! - `commands`: per-command handlers, each returning the text to print
//! - `render`: output formatting

mod commands;
mod config;
mod render;
mod setup;

pub use commands::run;
