//! # Command Handlers
//!
//! Each handler takes parsed arguments plus the loaded [`Context`] and returns
//! the text to print. `run` wires parsing, logging, configuration and dispatch
//! together and is the only function that writes to stdout.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use lazyattr::{AttributeSet, Model, ModelExt, Record, Registry, Schema};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::config::CliConfig;
use super::render;
use super::setup::{Cli, Commands};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let ctx = Context::new(&cli, config)?;

    let output = match &cli.command {
        Commands::Properties => properties(&ctx),
        Commands::Read {
            input,
            properties,
            reload_from,
            complete,
        } => read(&ctx, input, properties, reload_from.as_deref(), *complete)?,
    };
    print!("{output}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "lazyattr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Everything a handler needs: the declared properties and output settings.
pub struct Context {
    pub registry: Arc<Registry>,
    pub pretty: bool,
}

impl Context {
    fn new(cli: &Cli, config: CliConfig) -> Result<Self> {
        let schema_path = config.schema_path(cli.schema.as_deref()).ok_or_else(|| {
            anyhow!("no schema given: pass --schema or set `schema` in lazyattr.toml")
        })?;
        debug!(schema = %schema_path.display(), "loading schema");
        let schema = Schema::from_path(&schema_path)
            .with_context(|| format!("loading schema {}", schema_path.display()))?;

        Ok(Self {
            registry: Arc::new(schema.to_registry()?),
            pretty: config.pretty && !cli.compact,
        })
    }
}

pub fn properties(ctx: &Context) -> String {
    render::properties(&ctx.registry)
}

pub fn read(
    ctx: &Context,
    input: &Path,
    properties: &[String],
    reload_from: Option<&Path>,
    complete: bool,
) -> Result<String> {
    let raw = AttributeSet::from_json(read_json(input)?)
        .with_context(|| format!("reading record {}", input.display()))?;
    let mut record = Record::new(Arc::clone(&ctx.registry), raw);

    if let Some(path) = reload_from {
        record = record.with_reloader(file_reloader(path.to_path_buf()));
    }
    if complete {
        record.set_fully_loaded(true);
    }

    let resolved: serde_json::Map<String, serde_json::Value> = if properties.is_empty() {
        record
            .to_hash()?
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect()
    } else {
        let mut out = serde_json::Map::new();
        for name in properties {
            out.insert(name.clone(), record.get(name)?.into());
        }
        out
    };

    Ok(render::json(&serde_json::Value::Object(resolved), ctx.pretty)?)
}

/// Reload hook that merges the JSON object in `path` and marks the record
/// complete: the file is the whole record, so nothing more can arrive.
fn file_reloader(path: PathBuf) -> impl FnMut(&mut AttributeSet) -> lazyattr::Result<()> {
    move |attrs: &mut AttributeSet| {
        debug!(path = %path.display(), "reloading record");
        let text = std::fs::read_to_string(&path)?;
        let detail = AttributeSet::from_json(serde_json::from_str(&text)?)?;
        attrs.merge(detail.raw().clone());
        attrs.set_fully_loaded(true);
        Ok(())
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
