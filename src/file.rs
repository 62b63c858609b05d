// src/file.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::config::consts::PAGE_DUMP_FILE;

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Save a fetched page as `<dir>/page_content.html` for post-mortems.
/// Overwrites the previous dump. Returns the path written.
pub fn write_page_dump(dir: &Path, body: &str) -> io::Result<PathBuf> {
    ensure_directory(dir)?;
    let path = dir.join(PAGE_DUMP_FILE);
    fs::write(&path, body)?;
    Ok(path)
}
