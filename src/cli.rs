// src/cli.rs
use std::{ffi::OsString, path::PathBuf};

use chrono::Local;
use clap::{Args, Parser, Subcommand};

use crate::{
    config::{AppOptions, consts},
    error::ScrapeError,
    log, runner,
    store::{self, Observation},
};

#[derive(Parser, Debug)]
#[command(name = "gas_scrape", version, about = "Track tomorrow's GTA gas price prediction")]
pub struct Cli {
    /// Options file (TOML). Defaults to ./gas_scrape.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append debug logs to this file instead of printing them to stderr.
    #[arg(long, global = true)]
    pub debug_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the page, extract tomorrow's price, add it to the series (default).
    Scrape(ScrapeArgs),
    /// Print the newest recorded price.
    Latest(LatestArgs),
}

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Page to fetch.
    #[arg(long)]
    pub url: Option<String>,
    /// Read the page from this file instead of fetching it.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Series file to update.
    #[arg(long)]
    pub data_file: Option<PathBuf>,
    /// Save the page to <DIR>/page_content.html before extracting.
    #[arg(long, num_args = 0..=1, default_missing_value = consts::DEBUG_DIR)]
    pub dump_dir: Option<PathBuf>,
    /// Extract and merge, but don't write the series file.
    #[arg(long)]
    pub dry_run: bool,
}

impl ScrapeArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(u) = &self.url { opts.source.url = u.clone(); }
        if let Some(d) = &self.data_file { opts.store.data_file = d.clone(); }
        if let Some(d) = &self.dump_dir { opts.source.dump_dir = Some(d.clone()); }
    }
}

#[derive(Args, Debug, Default)]
pub struct LatestArgs {
    /// Series file to read.
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

pub fn run() -> Result<(), ScrapeError> {
    match parse_from(std::env::args_os())? {
        Some(cli) => run_with(cli),
        None => Ok(()),
    }
}

/// `Ok(None)` after `--help`/`--version` has been printed. Usage errors
/// become [`ScrapeError::Usage`] so they exit 1, not clap's 2.
pub fn parse_from<I, T>(args: I) -> Result<Option<Cli>, ScrapeError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if !e.use_stderr() => {
            e.print()?;
            Ok(None)
        }
        Err(e) => Err(ScrapeError::Usage(e.render().to_string())),
    }
}

pub fn run_with(cli: Cli) -> Result<(), ScrapeError> {
    if let Err(e) = log::init(cli.debug_log.as_deref()) {
        eprintln!("Warning: logging not initialised: {e}");
    }
    let mut opts = AppOptions::load(cli.config.as_deref())?;

    match cli.command.unwrap_or_else(|| Command::Scrape(ScrapeArgs::default())) {
        Command::Scrape(args) => {
            args.apply(&mut opts);
            let doc = runner::acquire(&opts, args.input.as_deref())?;
            let summary = runner::run(&opts, &doc, Local::now().naive_local(), args.dry_run)?;
            println!("{}", format_summary(&summary));
        }
        Command::Latest(args) => {
            if let Some(d) = args.data_file { opts.store.data_file = d; }
            let series = store::load_file(&opts.store.data_file);
            println!("{}", format_latest(series.latest()));
        }
    }
    Ok(())
}

pub fn format_summary(s: &runner::RunSummary) -> String {
    let o = &s.observation;
    match (s.inserted, s.written) {
        (true, true) => format!("Added {}: {}¢ (via {}, {} records)", o.date, o.price, s.strategy, s.series_len),
        (true, false) => format!("Would add {}: {}¢ (via {}, dry run)", o.date, o.price, s.strategy),
        (false, _) => format!("{} already recorded; found {}¢ (via {})", o.date, o.price, s.strategy),
    }
}

/// `Monday, July 21, 2025: 139.9¢ / litre`
pub fn format_latest(latest: Option<&Observation>) -> String {
    match latest {
        Some(o) => format!("{}: {}¢ / litre", o.date.format("%A, %B %d, %Y"), o.price),
        None => s!("No prices recorded yet."),
    }
}
