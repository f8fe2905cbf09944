//! # Lazyattr CLI
//!
//! A thin terminal client for the `lazyattr` library: it loads property
//! declarations from a schema file, builds a record from a JSON document, and
//! prints resolved values. All resolution rules live in the library; this crate
//! only deals with arguments, configuration, files and output.
//!
//! ```text
//! lazyattr properties --schema repo.toml
//! lazyattr read --schema repo.toml summary.json
//! lazyattr read --schema repo.toml summary.json --reload-from detail.json stars language
//! ```
//!
//! `--reload-from` plays the part of the detail endpoint: it is only read if a
//! requested property cannot be resolved from the summary (or its default).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{} {:#}", console::style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
