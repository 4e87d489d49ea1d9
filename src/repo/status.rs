//! Working tree and repository location queries.

use crate::error::{FlowError, Result};
use crate::git::Git;
use std::path::PathBuf;

/// Cleanliness of the working tree and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingTreeState {
    /// No unstaged and no staged changes to tracked files.
    Clean,
    /// Tracked files differ from the index (includes unmerged paths).
    UnstagedChanges,
    /// The index differs from HEAD.
    StagedChanges,
}

impl WorkingTreeState {
    /// Returns true for [`WorkingTreeState::Clean`].
    pub fn is_clean(self) -> bool {
        self == WorkingTreeState::Clean
    }
}

/// Classify the working tree. Untracked files are ignored.
pub fn working_tree_state(git: &Git) -> Result<WorkingTreeState> {
    if !git.run_successful(&[
        "diff",
        "--no-ext-diff",
        "--ignore-submodules",
        "--quiet",
        "--exit-code",
    ])? {
        return Ok(WorkingTreeState::UnstagedChanges);
    }

    if !git.run_successful(&[
        "diff-index",
        "--cached",
        "--quiet",
        "--ignore-submodules",
        "HEAD",
        "--",
    ])? {
        return Ok(WorkingTreeState::StagedChanges);
    }

    Ok(WorkingTreeState::Clean)
}

/// Whether `cwd` is inside a git repository.
pub fn is_git_repo(git: &Git) -> Result<bool> {
    git.run_successful(&["rev-parse", "--git-dir"])
}

/// Whether the repository has no commits yet (HEAD is unborn).
pub fn is_headless(git: &Git) -> Result<bool> {
    Ok(!git.run_successful(&["rev-parse", "--quiet", "--verify", "HEAD"])?)
}

/// Absolute path of the repository's private metadata directory (`.git`).
pub fn git_dir(git: &Git) -> Result<PathBuf> {
    let output = git.execute(&["rev-parse", "--git-dir"])?;
    if !output.success {
        return Err(FlowError::UserError(
            "fatal: Not a git repository".to_string(),
        ));
    }

    let dir = PathBuf::from(&output.stdout);
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(git.cwd().join(dir))
    }
}
