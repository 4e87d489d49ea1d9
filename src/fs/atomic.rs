//! Crash-safe replacement of small state files.
//!
//! The new content lands in a sibling `.<name>.tmp`, is flushed, and is then
//! renamed over the destination. Readers see either the old file or the new
//! one. A stray `.tmp` sibling after a crash is harmless and is overwritten
//! on the next write.

use crate::error::{FlowError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replace `path` with `content`, creating the parent directory on demand.
pub fn replace_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let dest = path.as_ref();
    let dir = dest.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| state_error("create", dir, e))?;

    let staging = staging_path(dest)?;
    if let Err(err) = stage(&staging, content.as_bytes()) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    if let Err(e) = fs::rename(&staging, dest) {
        let _ = fs::remove_file(&staging);
        return Err(state_error("replace", dest, e));
    }

    // Persist the rename itself where the platform allows opening directories.
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
    Ok(())
}

fn staging_path(dest: &Path) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FlowError::UserError(format!("'{}' names no file", dest.display())))?;
    Ok(dest.with_file_name(format!(".{}.tmp", name)))
}

fn stage(staging: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(staging).map_err(|e| state_error("create", staging, e))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| state_error("write", staging, e))
}

fn state_error(verb: &str, path: &Path, err: std::io::Error) -> FlowError {
    FlowError::UserError(format!("failed to {} '{}': {}", verb, path.display(), err))
}
