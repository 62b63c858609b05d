// src/log.rs
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt::time::uptime};

/// Install the global subscriber. Lines carry time elapsed since start.
///
/// Without `debug_file` events go to stderr at `RUST_LOG` (default `info`).
/// With it they are appended to that file at `RUST_LOG` (default `debug`),
/// e.g. `--debug-log debug_artifacts/debug.log` next to the page dump.
pub fn init(debug_file: Option<&Path>) -> io::Result<()> {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    let installed = match debug_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    crate::file::ensure_directory(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_timer(uptime())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter("debug"))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_timer(uptime())
            .with_writer(io::stderr)
            .with_target(false)
            .with_env_filter(filter("info"))
            .try_init(),
    };

    installed.map_err(io::Error::other)
}
