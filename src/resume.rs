//! Conflict-resume marker for interrupted finishes.
//!
//! When a merge performed by `finish` stops on conflicts, the name of the
//! branch being merged into is written to `.git/.gitflow/MERGE_BASE`. The
//! next `finish` reads it to decide whether the operator resolved the merge
//! (continue with cleanup) or aborted it (start over). The marker exists at
//! most once per repository and holds nothing but the target branch name.

use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::fs::replace_file;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the marker inside the state directory.
pub const MARKER_FILE: &str = "MERGE_BASE";

/// Handle to the persisted marker.
#[derive(Debug, Clone)]
pub struct ResumeMarker {
    path: PathBuf,
}

impl ResumeMarker {
    /// Marker stored in `state_dir`.
    pub fn new<P: AsRef<Path>>(state_dir: P) -> Self {
        Self {
            path: state_dir.as_ref().join(MARKER_FILE),
        }
    }

    /// Marker for the repository described by `ctx`.
    pub fn for_context(ctx: &FlowContext) -> Self {
        Self::new(ctx.state_dir())
    }

    /// The merge target recorded by a paused finish, if any.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let target = content.trim();
                if target.is_empty() {
                    Err(FlowError::UserError(format!(
                        "merge marker '{}' is empty. Remove it and run finish again.",
                        self.path.display()
                    )))
                } else {
                    Ok(Some(target.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FlowError::UserError(format!(
                "failed to read merge marker '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Record that a merge into `target` is waiting for conflict resolution.
    pub fn record(&self, target: &str) -> Result<()> {
        replace_file(&self.path, &format!("{}\n", target))
    }

    /// Delete the marker. Deleting an absent marker is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlowError::UserError(format!(
                "failed to remove merge marker '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }
}
