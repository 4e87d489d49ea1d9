//! Precondition guards for lifecycle operations.
//!
//! Each guard is an independent assertion run before any mutation. A
//! violation returns `FlowError::Precondition` with an actionable message, so
//! the operation aborts with nothing changed.

use crate::compare::{BranchDivergence, compare_branches};
use crate::error::{FlowError, Result};
use crate::git::Git;
use crate::repo::{self, WorkingTreeState};


fn violation(message: impl Into<String>) -> FlowError {
    FlowError::Precondition(message.into())
}

/// Require a non-empty identifying argument such as `<name>` or `<version>`.
pub fn require_name_arg<'a>(name: Option<&'a str>, placeholder: &str) -> Result<&'a str> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(FlowError::UserError(format!(
            "Missing argument <{}>",
            placeholder
        ))),
    }
}

/// Require no unstaged and no staged-but-uncommitted changes.
pub fn require_clean_working_tree(git: &Git) -> Result<()> {
    match repo::working_tree_state(git)? {
        WorkingTreeState::Clean => Ok(()),
        WorkingTreeState::UnstagedChanges => Err(violation(
            "fatal: Working tree contains unstaged changes. Aborting.",
        )),
        WorkingTreeState::StagedChanges => Err(violation(
            "fatal: Index contains uncommitted changes. Aborting.",
        )),
    }
}

/// Require a local branch.
pub fn require_local_branch(git: &Git, branch: &str) -> Result<()> {
    if repo::local_branch_exists(git, branch)? {
        Ok(())
    } else {
        Err(violation(format!(
            "fatal: Local branch '{}' does not exist and is required.",
            branch
        )))
    }
}

/// Require a remote-tracking branch such as `origin/develop`.
pub fn require_remote_branch(git: &Git, branch: &str) -> Result<()> {
    if repo::remote_branch_exists(git, branch)? {
        Ok(())
    } else {
        Err(violation(format!(
            "Remote branch '{}' does not exist and is required.",
            branch
        )))
    }
}

/// Require a branch, local or remote-tracking.
pub fn require_branch(git: &Git, branch: &str) -> Result<()> {
    if repo::branch_exists(git, branch)? {
        Ok(())
    } else {
        Err(violation(format!(
            "Branch '{}' does not exist and is required.",
            branch
        )))
    }
}

/// Require that no local or remote-tracking branch has this name.
pub fn require_branch_absent(git: &Git, branch: &str) -> Result<()> {
    if repo::branch_exists(git, branch)? {
        Err(violation(format!(
            "Branch '{}' already exists. Pick another name.",
            branch
        )))
    } else {
        Ok(())
    }
}

/// Require that no tag has this name.
pub fn require_tag_absent(git: &Git, tag: &str) -> Result<()> {
    if repo::tag_exists(git, tag)? {
        Err(violation(format!(
            "Tag '{}' already exists. Pick another name.",
            tag
        )))
    } else {
        Ok(())
    }
}

/// Require local `b1` to be in sync with remote-tracking `b2`.
///
/// A local branch that is ahead of its remote only produces a warning; a
/// local branch that is behind, diverged, or unrelated aborts.
pub fn require_branches_equal(git: &Git, b1: &str, b2: &str) -> Result<BranchDivergence> {
    require_local_branch(git, b1)?;
    require_remote_branch(git, b2)?;

    let status = compare_branches(git, b1, b2)?;
    let diverged = format!("Branches '{}' and '{}' have diverged.", b1, b2);
    match status {
        BranchDivergence::Equal => Ok(status),
        BranchDivergence::SecondBehind => {
            eprintln!("{}", diverged);
            eprintln!("And local branch '{}' is ahead of '{}'.", b1, b2);
            Ok(status)
        }
        BranchDivergence::FirstBehind => Err(violation(format!(
            "{}\nAnd branch '{}' may be fast-forwarded.",
            diverged, b1
        ))),
        BranchDivergence::Diverged | BranchDivergence::NoCommonAncestor => Err(violation(
            format!("{}\nBranches need merging first.", diverged),
        )),
    }
}

/// Require `base` to be a commit reachable from `branch`.
pub fn require_base_is_on(git: &Git, base: &str, branch: &str) -> Result<()> {
    if repo::is_branch_merged_into(git, base, branch)? {
        Ok(())
    } else {
        Err(violation(format!(
            "fatal: Given base '{}' is not a valid commit on '{}'.",
            base, branch
        )))
    }
}

/// Require that no local branch of a kind exists yet.
pub fn require_no_existing_instance(git: &Git, prefix: &str, kind: &str) -> Result<()> {
    let existing = repo::local_branches(git)?
        .into_iter()
        .find(|b| b.starts_with(prefix));

    match existing {
        None => Ok(()),
        Some(branch) => Err(violation(format!(
            "There is an existing {} branch ({}). Finish that one first.",
            kind,
            branch.strip_prefix(prefix).unwrap_or(&branch)
        ))),
    }
}
