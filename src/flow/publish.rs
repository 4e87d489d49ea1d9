//! Sharing supporting branches through the remote.

use super::{BranchKind, FlowBranch, fetch_all, record_event};
use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction};
use crate::guards::{
    require_branch, require_branch_absent, require_clean_working_tree, require_name_arg,
    require_remote_branch,
};
use crate::resolve::resolve_branch;
use serde_json::json;

/// Push a local branch to the remote and make it track the pushed copy.
pub fn publish(ctx: &FlowContext, kind: BranchKind, name: Option<&str>) -> Result<FlowBranch> {
    let git = &ctx.git;
    let origin = &ctx.config.origin;

    let name = require_name_arg(name, kind.arg_name())?;
    let branch = resolve_branch(git, kind.prefix(&ctx.config), name)?;
    let flow = FlowBranch::from_branch(kind, &ctx.config, &branch);

    require_clean_working_tree(git)?;
    require_branch(git, &flow.branch)?;
    fetch_all(ctx)?;
    require_branch_absent(git, &ctx.remote_ref(&flow.branch))?;

    let refspec = format!("{0}:refs/heads/{0}", flow.branch);
    if !git.run_successful(&["push", origin, &refspec])? {
        return Err(FlowError::GitError(format!(
            "Could not push {} to {}.",
            flow.branch, origin
        )));
    }
    fetch_all(ctx)?;

    let remote_key = format!("branch.{}.remote", flow.branch);
    let merge_key = format!("branch.{}.merge", flow.branch);
    let merge_ref = format!("refs/heads/{}", flow.branch);
    git.run(&["config", &remote_key, origin])?;
    git.run(&["config", &merge_key, &merge_ref])?;
    git.run(&["checkout", "-q", &flow.branch])?;

    record_event(
        ctx,
        Event::new(EventAction::Publish).with_details(json!({ "remote": origin })),
        &flow,
    )?;

    println!();
    println!("Summary of actions:");
    println!("- A new remote branch '{}' was created", flow.branch);
    println!(
        "- The local branch '{}' was configured to track the remote branch",
        flow.branch
    );
    println!("- You are now on branch '{}'", flow.branch);
    println!();

    Ok(flow)
}

/// Create a local branch tracking an existing remote supporting branch.
pub fn track(ctx: &FlowContext, kind: BranchKind, name: Option<&str>) -> Result<FlowBranch> {
    let git = &ctx.git;

    let name = require_name_arg(name, kind.arg_name())?;
    let flow = FlowBranch::from_name(kind, &ctx.config, name);
    let remote_branch = ctx.remote_ref(&flow.branch);

    require_clean_working_tree(git)?;
    require_branch_absent(git, &flow.branch)?;
    fetch_all(ctx)?;
    require_remote_branch(git, &remote_branch)?;

    if !git.run_successful(&["checkout", "-b", &flow.branch, &remote_branch])? {
        return Err(FlowError::GitError(format!(
            "Could not create {} branch '{}'.",
            kind, flow.branch
        )));
    }

    record_event(
        ctx,
        Event::new(EventAction::Track).with_details(json!({ "remote": remote_branch })),
        &flow,
    )?;

    println!();
    println!("Summary of actions:");
    println!("- A new remote tracking branch '{}' was created", flow.branch);
    println!("- You are now on branch '{}'", flow.branch);
    println!();

    Ok(flow)
}
