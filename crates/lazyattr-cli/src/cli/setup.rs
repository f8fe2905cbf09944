use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Parser, Subcommand};

/// "v0.3.0" for tagged releases, "v0.3.0 (abc1234)" otherwise.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const BUILD_HASH: &str = env!("LAZYATTR_BUILD_HASH");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if BUILD_HASH.is_empty() {
            format!("v{VERSION}")
        } else {
            format!("v{VERSION} ({BUILD_HASH})")
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "lazyattr",
    bin_name = "lazyattr",
    version = get_version(),
    about = "Resolve declared properties of JSON records",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Schema declaring the properties (.toml or .json)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub schema: Option<PathBuf>,

    /// Configuration file (defaults to lazyattr.toml in the user config dir)
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true, help_heading = "Options")]
    pub compact: bool,

    /// Log resolution steps to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the properties declared by the schema
    Properties,

    /// Resolve properties of a JSON record
    Read {
        /// JSON object with the record's raw attributes ("-" reads stdin)
        input: PathBuf,

        /// Properties to resolve; all declared properties when omitted
        properties: Vec<String>,

        /// JSON object merged in when a property is missing (the reload hook)
        #[arg(long, value_name = "FILE")]
        reload_from: Option<PathBuf>,

        /// Treat the record as fully loaded: never reload
        #[arg(long)]
        complete: bool,
    },
}
