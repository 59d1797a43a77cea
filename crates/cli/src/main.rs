//! `factlog-tail`: print the most recent events of a store, optionally
//! filtered.
//!
//! With no filter flags the last `-n` records are read with a backward
//! tail scan. Any filter turns the call into a newest-first query capped at
//! `-n`.

mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use factlog_core::Query;
use factlog_engine::{JsonlStore, StateStore, StoreConfig, ENV_DATA_DIR};
use tracing_subscriber::EnvFilter;

use crate::render::{render_json, render_line};

#[derive(Parser, Debug)]
#[command(name = "factlog-tail")]
#[command(about = "Tail and filter state events")]
#[command(version)]
struct Args {
    /// How many events to display [default: the store's default_tail]
    #[arg(short = 'n', long = "num")]
    num: Option<usize>,

    /// Subject filter (exact)
    #[arg(long = "s", value_name = "SUBJECT")]
    subject: Option<String>,

    /// Predicate filter (exact)
    #[arg(long = "p", value_name = "PREDICATE")]
    predicate: Option<String>,

    /// Object filter (exact)
    #[arg(long = "o", value_name = "OBJECT")]
    object: Option<String>,

    /// Filter by meta.tags
    #[arg(long)]
    tag: Option<String>,

    /// Lower time bound, ISO or relative (-10m, -2h, -3d)
    #[arg(long, allow_hyphen_values = true)]
    since: Option<String>,

    /// Upper time bound, ISO or relative
    #[arg(long, allow_hyphen_values = true)]
    until: Option<String>,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Store directory
    #[arg(long, env = ENV_DATA_DIR, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// TOML store configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    fn has_filter(&self) -> bool {
        self.subject.is_some()
            || self.predicate.is_some()
            || self.object.is_some()
            || self.tag.is_some()
            || self.since.is_some()
            || self.until.is_some()
    }

    fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => StoreConfig::from_env(),
        };
        if let Some(dir) = &self.data_dir {
            config = config.data_dir(dir);
        }
        Ok(config)
    }

    fn query(&self, limit: usize) -> Query {
        Query {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
            since: self.since.clone(),
            until: self.until.clone(),
            tag: self.tag.clone(),
            limit,
            newest_first: true,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.store_config()?;
    let data_dir = config.data_dir.clone();
    let num = args.num.unwrap_or(config.default_tail);

    let store = JsonlStore::open(config)
        .with_context(|| format!("opening store in {}", data_dir.display()))?;

    let events = if args.has_filter() {
        store.query(&args.query(num))?
    } else {
        store.tail(num)?
    };
    tracing::debug!(count = events.len(), filtered = args.has_filter(), "events fetched");

    if args.json {
        println!("{}", render_json(&events)?);
    } else {
        for event in &events {
            println!("{}", render_line(event));
        }
    }
    Ok(())
}
