//! Creating supporting branches.

use super::{BranchKind, FlowBranch, fetch_branch, record_event};
use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction};
use crate::guards::{
    require_base_is_on, require_branch_absent, require_branches_equal,
    require_clean_working_tree, require_name_arg, require_no_existing_instance,
    require_tag_absent,
};
use crate::repo;
use serde_json::json;

/// Arguments for `git flow <kind> start`.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// Short name of the new branch.
    pub name: Option<String>,
    /// Commit to branch from; defaults to the kind's source line.
    pub base: Option<String>,
    /// Fetch the source line from the remote first.
    pub fetch: bool,
}

/// Create a new `kind` branch and check it out.
pub fn start(ctx: &FlowContext, kind: BranchKind, opts: &StartOptions) -> Result<FlowBranch> {
    let git = &ctx.git;
    let config = &ctx.config;

    let name = require_name_arg(opts.name.as_deref(), kind.arg_name())?;
    let flow = FlowBranch::from_name(kind, config, name);
    let source = kind.source_branch(config);
    let base = opts.base.as_deref().unwrap_or(source);

    if kind.base_must_be_on_source() {
        require_base_is_on(git, base, source)?;
    }
    if kind.single_instance() {
        require_no_existing_instance(git, kind.prefix(config), kind.as_str())?;
    }
    if kind.tags_on_finish() {
        require_clean_working_tree(git)?;
        require_tag_absent(git, &kind.tag_name(config, name))?;
    }
    require_branch_absent(git, &flow.branch)?;

    if opts.fetch {
        fetch_branch(ctx, source)?;
    }
    let remote_source = ctx.remote_ref(source);
    if repo::remote_branch_exists(git, &remote_source)? {
        require_branches_equal(git, source, &remote_source)?;
    }

    if !git.run_successful(&["checkout", "-b", &flow.branch, base])? {
        return Err(FlowError::GitError(format!(
            "Could not create {} branch '{}'.",
            kind, flow.branch
        )));
    }

    record_event(
        ctx,
        Event::new(EventAction::Start).with_details(json!({
            "name": flow.name,
            "base": base,
            "fetched": opts.fetch,
        })),
        &flow,
    )?;

    println!();
    println!("Summary of actions:");
    if opts.fetch {
        println!(
            "- The latest '{}' was fetched from '{}'",
            source, config.origin
        );
    }
    println!(
        "- A new branch '{}' was created, based on '{}'",
        flow.branch, base
    );
    println!("- You are now on branch '{}'", flow.branch);
    println!();
    print_next_steps(kind, &flow, source);

    Ok(flow)
}

fn print_next_steps(kind: BranchKind, flow: &FlowBranch, source: &str) {
    if kind == BranchKind::Support {
        println!(
            "Support branches are never merged back into '{}'. To share it, use:",
            source
        );
        println!();
        println!("     git flow support publish {}", flow.name);
        println!();
        return;
    }

    println!("Now, start committing on your {}. When done, use:", kind);
    println!();
    println!("     git flow {} finish {}", kind, flow.name);
    println!();
}
