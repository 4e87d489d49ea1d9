//! Branch, tag and ancestry queries.

use crate::error::{FlowError, Result};
use crate::git::Git;

/// List ref names under `namespace`, with the namespace stripped, in ref order.
fn list_refs(git: &Git, namespace: &str) -> Result<Vec<String>> {
    let output = git.run(&["for-each-ref", "--format=%(refname)", namespace])?;
    Ok(output
        .lines()
        .into_iter()
        .filter_map(|line| line.strip_prefix(namespace))
        .map(str::to_string)
        .collect())
}

/// All local branch names (`refs/heads/*`).
pub fn local_branches(git: &Git) -> Result<Vec<String>> {
    list_refs(git, "refs/heads/")
}

/// All remote-tracking branch names, e.g. `origin/develop`.
///
/// Symbolic `<remote>/HEAD` entries are skipped.
pub fn remote_branches(git: &Git) -> Result<Vec<String>> {
    Ok(list_refs(git, "refs/remotes/")?
        .into_iter()
        .filter(|b| !b.ends_with("/HEAD"))
        .collect())
}

/// Local followed by remote-tracking branch names.
pub fn all_branches(git: &Git) -> Result<Vec<String>> {
    let mut branches = local_branches(git)?;
    branches.extend(remote_branches(git)?);
    Ok(branches)
}

/// Check if a branch exists locally.
pub fn local_branch_exists(git: &Git, branch: &str) -> Result<bool> {
    Ok(local_branches(git)?.iter().any(|b| b == branch))
}

/// Check if a remote-tracking branch (e.g. `origin/develop`) exists.
pub fn remote_branch_exists(git: &Git, branch: &str) -> Result<bool> {
    Ok(remote_branches(git)?.iter().any(|b| b == branch))
}

/// Check if a branch exists either locally or as a remote-tracking branch.
pub fn branch_exists(git: &Git, branch: &str) -> Result<bool> {
    Ok(all_branches(git)?.iter().any(|b| b == branch))
}

/// All tag names.
pub fn tags(git: &Git) -> Result<Vec<String>> {
    list_refs(git, "refs/tags/")
}

/// Check if a tag exists.
pub fn tag_exists(git: &Git, tag: &str) -> Result<bool> {
    Ok(tags(git)?.iter().any(|t| t == tag))
}

/// The checked-out branch, or `None` on a detached HEAD.
pub fn current_branch(git: &Git) -> Result<Option<String>> {
    let output = git.execute(&["symbolic-ref", "-q", "--short", "HEAD"])?;
    if output.success && !output.is_empty() {
        Ok(Some(output.stdout))
    } else {
        Ok(None)
    }
}

/// Resolve a revision to its full commit id.
pub fn rev_parse(git: &Git, rev: &str) -> Result<String> {
    let output = git.execute(&["rev-parse", "--verify", "-q", &format!("{}^{{commit}}", rev)])?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(FlowError::GitError(format!(
            "could not resolve '{}' to a commit",
            rev
        )))
    }
}

/// Abbreviated commit id for display.
pub fn short_sha(git: &Git, rev: &str) -> Result<String> {
    Ok(git.run(&["rev-parse", "--short", rev])?.stdout)
}

/// Nearest common ancestor of two commits, or `None` when they share no history.
pub fn merge_base(git: &Git, a: &str, b: &str) -> Result<Option<String>> {
    let output = git.execute(&["merge-base", a, b])?;
    if output.success && !output.is_empty() {
        Ok(Some(output.stdout))
    } else {
        Ok(None)
    }
}

/// Whether `subject` is already contained in `base`, i.e. merged into it.
pub fn is_branch_merged_into(git: &Git, subject: &str, base: &str) -> Result<bool> {
    git.run_successful(&["merge-base", "--is-ancestor", subject, base])
}

/// Number of commits on `branch` that are not on `base`, counting at most `limit`.
pub fn commits_ahead(git: &Git, base: &str, branch: &str, limit: usize) -> Result<usize> {
    let range = format!("{}..{}", base, branch);
    let max = format!("-n{}", limit);
    Ok(git.run(&["rev-list", &max, &range])?.lines().len())
}
