//! Repository context resolution for git-flow.
//!
//! Every lifecycle command starts by resolving a [`FlowContext`]: the git
//! runner bound to the working directory (carrying the verbosity), the loaded
//! configuration, and the repository's private metadata directory where the
//! conflict-resume marker and the event log live.

use crate::config::{FlowConfig, GitConfigStore};
use crate::error::{FlowError, Result};
use crate::git::{Git, Verbosity};
use crate::repo;
use std::env;
use std::path::{Path, PathBuf};

/// Directory under the git dir holding git-flow's own state.
pub const STATE_DIR: &str = ".gitflow";

/// Resolved runner, configuration and paths for one invocation.
#[derive(Debug, Clone)]
pub struct FlowContext {
    /// Git runner for the working directory.
    pub git: Git,

    /// Loaded and validated configuration.
    pub config: FlowConfig,

    /// Absolute path to the repository's `.git` directory.
    pub git_dir: PathBuf,
}

impl FlowContext {
    /// Resolve the context from the current working directory.
    pub fn resolve(verbosity: Verbosity) -> Result<Self> {
        Self::resolve_from(current_dir()?, verbosity)
    }

    /// Resolve the context from a specific directory.
    ///
    /// # Returns
    ///
    /// * `Ok(FlowContext)` - Repository found and initialized for git-flow
    /// * `Err(FlowError::UserError)` - Not a git repository, or `git flow init` not run
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, verbosity: Verbosity) -> Result<Self> {
        let git = require_git_repo(cwd, verbosity)?;
        let git_dir = repo::git_dir(&git)?;
        let config = FlowConfig::load(&GitConfigStore::new(git.clone()))?;

        Ok(Self {
            git,
            config,
            git_dir,
        })
    }

    /// Directory holding git-flow state (`.git/.gitflow/`).
    pub fn state_dir(&self) -> PathBuf {
        self.git_dir.join(STATE_DIR)
    }

    /// The remote-tracking counterpart of a local branch, e.g. `origin/develop`.
    pub fn remote_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.config.origin, branch)
    }
}

/// The process working directory.
pub fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|e| {
        FlowError::UserError(format!("failed to get current working directory: {}", e))
    })
}

/// Build a runner for `cwd`, failing unless it is inside a git repository.
pub fn require_git_repo<P: AsRef<Path>>(cwd: P, verbosity: Verbosity) -> Result<Git> {
    let git = Git::new(cwd, verbosity);
    if !repo::is_git_repo(&git)? {
        return Err(FlowError::UserError(
            "fatal: Not a git repository".to_string(),
        ));
    }
    Ok(git)
}
