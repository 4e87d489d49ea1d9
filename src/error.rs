//! Error types for the git-flow CLI.
//!
//! Uses thiserror for derive macros and provides operator-actionable messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for git-flow operations.
///
/// Each variant maps to a specific exit code. Guards fail with
/// `Precondition`, name resolution with `NoMatch`/`Ambiguous`, and a finish
/// that stops for manual conflict resolution with `MergeConflict`.
#[derive(Error, Debug)]
pub enum FlowError {
    /// User provided invalid arguments or the repository is not set up.
    #[error("{0}")]
    UserError(String),

    /// A precondition guard was violated; nothing was changed.
    #[error("{0}")]
    Precondition(String),

    /// No local branch starts with the given name.
    #[error("No branch matches prefix '{0}'")]
    NoMatch(String),

    /// More than one local branch starts with the given name.
    #[error("Multiple branches match prefix '{name}':\n{}", format_candidates(.candidates))]
    Ambiguous {
        /// The abbreviation the operator typed.
        name: String,
        /// Every matching branch, in branch order.
        candidates: Vec<String>,
    },

    /// Git operation failed.
    #[error("{0}")]
    GitError(String),

    /// A merge stopped on conflicts; the message carries resolution steps.
    #[error("{0}")]
    MergeConflict(String),
}

fn format_candidates(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FlowError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowError::UserError(_) => exit_codes::USER_ERROR,
            FlowError::Precondition(_) => exit_codes::PRECONDITION_FAILURE,
            FlowError::NoMatch(_) => exit_codes::PRECONDITION_FAILURE,
            FlowError::Ambiguous { .. } => exit_codes::PRECONDITION_FAILURE,
            FlowError::GitError(_) => exit_codes::GIT_FAILURE,
            FlowError::MergeConflict(_) => exit_codes::MERGE_CONFLICT,
        }
    }
}

/// Result type alias for git-flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
