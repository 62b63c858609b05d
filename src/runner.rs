// src/runner.rs
//! One run, start to finish: get the page, pull tomorrow's price out of it,
//! and fold it into the series file.
//!
//! ```text
//! acquire (fetch | --input) ─► Extractor ─► normalize ─► store::merge ─► save
//! ```
//!
//! Any error before the merge leaves the snapshot untouched; it is only
//! rewritten when a new date was actually inserted.

use std::{fs, path::Path};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::{
    config::AppOptions,
    core::net,
    error::ScrapeError,
    extract::Extractor,
    file, normalize,
    store::{self, Observation},
};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub observation: Observation,
    /// `false` when the date was already in the series.
    pub inserted: bool,
    /// Whether the snapshot file was rewritten.
    pub written: bool,
    pub strategy: &'static str,
    pub series_len: usize,
}

/// Get the page body: from `input` if given, otherwise over the network.
/// With a dump dir configured, the body is saved there first.
pub fn acquire(opts: &AppOptions, input: Option<&Path>) -> Result<String, ScrapeError> {
    let body = match input {
        Some(path) => {
            info!("Reading page from {}", path.display());
            String::from_utf8_lossy(&fs::read(path)?).into_owned()
        }
        None => {
            info!("Fetching {}", opts.source.url);
            net::http_get(&opts.source)?
        }
    };

    if let Some(dir) = &opts.source.dump_dir {
        match file::write_page_dump(dir, &body) {
            Ok(p) => info!("Saved page to {}", p.display()),
            Err(e) => warn!("Could not save page to {}: {e}", dir.display()),
        }
    }
    Ok(body)
}

/// Extract, validate and merge. `now` is the local time of the run; it
/// dates prices the page doesn't date itself.
pub fn run(
    opts: &AppOptions,
    document: &str,
    now: NaiveDateTime,
    dry_run: bool,
) -> Result<RunSummary, ScrapeError> {
    let found = Extractor::new(&opts.selectors).extract(document)?;
    let observation = normalize::observation(&found, now)?;
    info!("Tomorrow's price: {}¢ for {}", observation.price, observation.date);

    let path = &opts.store.data_file;
    let series = store::load_file(path);
    let (series, inserted) = store::merge(series, observation.clone());

    let written = inserted && !dry_run;
    if written {
        store::save_file(path, &series)?;
        info!("Added {} to {} ({} records)", observation.date, path.display(), series.len());
    } else if inserted {
        info!("Dry run: {} not written", observation.date);
    } else {
        info!("{} already recorded; {} unchanged", observation.date, path.display());
    }

    Ok(RunSummary {
        observation,
        inserted,
        written,
        strategy: found.strategy,
        series_len: series.len(),
    })
}
