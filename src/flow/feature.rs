//! Feature-only helpers: diff, rebase, checkout and pull.

use super::{BranchKind, FlowBranch};
use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::git::Git;
use crate::guards::{require_branch, require_clean_working_tree};
use crate::repo;
use crate::resolve::resolve_branch;

/// Resolve an explicit name prefix, or fall back to the current feature branch.
fn name_or_current(ctx: &FlowContext, name: Option<&str>) -> Result<FlowBranch> {
    let config = &ctx.config;
    let kind = BranchKind::Feature;
    match name.filter(|n| !n.is_empty()) {
        Some(name) => {
            let branch = resolve_branch(&ctx.git, kind.prefix(config), name)?;
            require_branch(&ctx.git, &branch)?;
            Ok(FlowBranch::from_branch(kind, config, &branch))
        }
        None => current_feature(ctx),
    }
}

fn current_feature(ctx: &FlowContext) -> Result<FlowBranch> {
    let kind = BranchKind::Feature;
    let prefix = kind.prefix(&ctx.config);
    match repo::current_branch(&ctx.git)? {
        Some(current) if current.starts_with(prefix) => {
            Ok(FlowBranch::from_branch(kind, &ctx.config, &current))
        }
        _ => Err(FlowError::Precondition(
            "The current HEAD is no feature branch.\nPlease specify a <name> argument.".to_string(),
        )),
    }
}

/// Check out `branch` and rebase it onto `onto`. Returns false on conflicts.
pub(super) fn rebase_onto(git: &Git, branch: &str, onto: &str) -> Result<bool> {
    if !git.run_successful(&["checkout", "-q", branch])? {
        return Err(FlowError::GitError(format!("Could not check out {}.", branch)));
    }
    git.run_successful(&["rebase", onto])
}

/// Print the changes a feature introduces relative to the integration line.
pub fn diff(ctx: &FlowContext, name: Option<&str>) -> Result<()> {
    let git = &ctx.git;
    let develop = &ctx.config.develop_branch;

    let range = match name.filter(|n| !n.is_empty()) {
        None => {
            current_feature(ctx).map_err(|_| {
                FlowError::Precondition("Not on a feature branch. Name one explicitly.".to_string())
            })?;
            base_of(git, develop, "HEAD")?
        }
        Some(_) => {
            let flow = name_or_current(ctx, name)?;
            format!("{}..{}", base_of(git, develop, &flow.branch)?, flow.branch)
        }
    };

    let output = git.run(&["diff", &range])?;
    if !output.is_empty() {
        println!("{}", output.stdout);
    }
    Ok(())
}

fn base_of(git: &Git, develop: &str, rev: &str) -> Result<String> {
    repo::merge_base(git, develop, rev)?.ok_or_else(|| {
        FlowError::GitError(format!("'{}' shares no history with '{}'.", rev, develop))
    })
}

/// Rebase a feature onto the integration line.
///
/// Interactive mode only checks the branch out and explains how to proceed.
pub fn rebase(ctx: &FlowContext, name: Option<&str>, interactive: bool) -> Result<()> {
    let git = &ctx.git;
    let flow = name_or_current(ctx, name)?;
    let develop = &ctx.config.develop_branch;

    eprintln!("Will try to rebase '{}'...", flow.name);
    require_clean_working_tree(git)?;

    if interactive {
        if !git.run_successful(&["checkout", "-q", &flow.branch])? {
            return Err(FlowError::GitError(format!(
                "Could not check out {}.",
                flow.branch
            )));
        }
        println!("Interactive rebase not available yet.");
        println!("You are currently on branch '{}'", flow.branch);
        println!();
        println!("To rebase, please run");
        println!("    git rebase -i {}", develop);
        return Ok(());
    }

    if !rebase_onto(git, &flow.branch, develop)? {
        return Err(FlowError::GitError(format!(
            "Rebase of '{}' onto '{}' stopped on conflicts.\n\
             Resolve them and run:\n    git rebase --continue",
            flow.branch, develop
        )));
    }
    Ok(())
}

/// Check out a feature by name prefix.
pub fn checkout(ctx: &FlowContext, name: Option<&str>) -> Result<()> {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return Err(FlowError::UserError(
            "Name a feature branch explicitly.".to_string(),
        ));
    };
    let flow = name_or_current(ctx, Some(name))?;
    if !ctx.git.run_successful(&["checkout", &flow.branch])? {
        return Err(FlowError::GitError(format!(
            "Could not check out {}.",
            flow.branch
        )));
    }
    Ok(())
}

/// Pull a feature from `remote`, or create it locally from the remote copy.
pub fn pull(ctx: &FlowContext, remote: Option<&str>, name: Option<&str>) -> Result<()> {
    let git = &ctx.git;
    let Some(remote) = remote.filter(|r| !r.is_empty()) else {
        return Err(FlowError::UserError("Name a remote explicitly.".to_string()));
    };

    let flow = match name.filter(|n| !n.is_empty()) {
        Some(name) => FlowBranch::from_name(BranchKind::Feature, &ctx.config, name),
        None => current_feature(ctx)?,
    };

    let prefix = BranchKind::Feature.prefix(&ctx.config);
    let current = repo::current_branch(git)?;
    let on_feature = current.as_deref().is_some_and(|c| c.starts_with(prefix));
    let local_exists = repo::local_branch_exists(git, &flow.branch)?;

    if (on_feature || local_exists) && current.as_deref() != Some(flow.branch.as_str()) {
        return Err(FlowError::Precondition(format!(
            "Trying to pull from '{}' while currently on branch '{}'.\n\
             To avoid unintended merges, git-flow aborted.",
            flow.branch,
            current.as_deref().unwrap_or("HEAD")
        )));
    }

    require_clean_working_tree(git)?;

    if local_exists {
        if !git.run_successful(&["pull", "-q", remote, &flow.branch])? {
            return Err(FlowError::GitError(format!(
                "Failed to pull from remote '{}'.",
                remote
            )));
        }
        println!("Pulled {}'s changes into {}.", remote, flow.branch);
        return Ok(());
    }

    if !git.run_successful(&["fetch", "-q", remote, &flow.branch])? {
        return Err(FlowError::GitError(format!(
            "Could not fetch {} from {}.",
            flow.branch, remote
        )));
    }
    if !git.run_successful(&["branch", "--no-track", &flow.branch, "FETCH_HEAD"])? {
        return Err(FlowError::GitError(format!(
            "Could not create branch '{}'.",
            flow.branch
        )));
    }
    if !git.run_successful(&["checkout", "-q", &flow.branch])? {
        return Err(FlowError::GitError(format!(
            "Could not check out {}.",
            flow.branch
        )));
    }
    println!(
        "Created local branch {} based on {}'s {}.",
        flow.branch, remote, flow.branch
    );
    Ok(())
}
