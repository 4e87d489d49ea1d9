//! Git command runner for git-flow.
//!
//! Provides a wrapper around git commands with captured stdout/stderr and
//! structured error handling. All git operations go through [`Git`], which
//! carries the working directory and the verbosity used to echo invocations.

use crate::error::{FlowError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// How much of each git invocation is echoed to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Echo nothing.
    #[default]
    Quiet,
    /// Echo each command before it runs.
    Show,
    /// Echo each command, its output and its exit status.
    Debug,
}

impl Verbosity {
    /// Build a verbosity from the global `--show` / `--debug` flags.
    pub fn from_flags(show: bool, debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if show {
            Verbosity::Show
        } else {
            Verbosity::Quiet
        }
    }
}

/// Result of a git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
    /// Whether the command exited with status 0.
    pub success: bool,
}

impl GitOutput {
    /// Create a new GitOutput from raw process output.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            success: output.status.success(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }

    /// The most useful diagnostic text: stderr when present, stdout otherwise.
    pub fn message(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// A git runner bound to one working directory.
#[derive(Debug, Clone)]
pub struct Git {
    cwd: PathBuf,
    verbosity: Verbosity,
}

impl Git {
    /// Create a runner for `cwd` that echoes according to `verbosity`.
    pub fn new<P: AsRef<Path>>(cwd: P, verbosity: Verbosity) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            verbosity,
        }
    }

    /// The working directory commands run in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run a git command and capture its output regardless of exit status.
    ///
    /// Only a failure to spawn git at all is reported as an error.
    pub fn execute(&self, args: &[&str]) -> Result<GitOutput> {
        if self.verbosity >= Verbosity::Show {
            let mut words = vec!["git"];
            words.extend_from_slice(args);
            eprintln!("{}", shell_words::join(words));
        }

        let output = Command::new("git")
            .current_dir(&self.cwd)
            .args(args)
            .output()
            .map_err(|e| {
                FlowError::GitError(format!(
                    "failed to execute git {}: {} (is git installed?)",
                    args.first().unwrap_or(&""),
                    e
                ))
            })?;

        let git_output = GitOutput::from_output(&output);

        if self.verbosity >= Verbosity::Debug {
            if !git_output.stdout.is_empty() {
                eprintln!("{}", git_output.stdout);
            }
            if !git_output.stderr.is_empty() {
                eprintln!("{}", git_output.stderr);
            }
            eprintln!("[{}]", output.status.code().unwrap_or(-1));
        }

        Ok(git_output)
    }

    /// Run a git command that must succeed.
    ///
    /// # Returns
    ///
    /// * `Ok(GitOutput)` - On exit code 0
    /// * `Err(FlowError::GitError)` - On non-zero exit code (mapped to exit code 3)
    pub fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let output = self.execute(args)?;

        if output.success {
            Ok(output)
        } else {
            Err(FlowError::GitError(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                output.message()
            )))
        }
    }

    /// Run a git command and report only whether it succeeded.
    ///
    /// Lets the caller branch on failure instead of aborting.
    pub fn run_successful(&self, args: &[&str]) -> Result<bool> {
        Ok(self.execute(args)?.success)
    }
}
