//! Finishing supporting branches.
//!
//! Finish is a resumable protocol:
//!
//! ```text
//! idle -> merging(target1) -> tagging? -> merging(target2)? -> cleanup -> done
//!              \________________________________/
//!                              |
//!                        conflict-wait
//! ```
//!
//! A conflicting merge records its target in the resume marker and stops
//! with [`FlowError::MergeConflict`]. The next run inspects the marker before
//! doing anything else. Every step after working-tree validation checks
//! whether it already happened (branch already merged, tag already present),
//! so re-running after any failure picks up where the last run stopped.

use super::{BranchKind, FlowBranch, feature, fetch_branch, record_event};
use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction};
use crate::guards::{
    require_branch, require_branches_equal, require_clean_working_tree, require_name_arg,
};
use crate::repo;
use crate::resolve::resolve_branch;
use crate::resume::ResumeMarker;
use serde_json::json;

/// Arguments for `git flow <kind> finish`.
#[derive(Debug, Clone)]
pub struct FinishOptions {
    /// Name or unambiguous name prefix of the branch.
    pub name: Option<String>,
    /// Fetch the branch and its targets from the remote first.
    pub fetch: bool,
    /// Rebase onto the integration line before merging (features only).
    pub rebase: bool,
    /// Keep the branch after finishing.
    pub keep: bool,
    /// Create a version tag (tagging kinds only).
    pub tag: bool,
    /// Sign the version tag.
    pub sign: bool,
    /// GPG key for signing; implies `sign`.
    pub signing_key: Option<String>,
    /// Tag message; defaults to `Tag <tagname>`.
    pub message: Option<String>,
    /// Push targets and tags to the remote afterwards.
    pub push: bool,
}

impl Default for FinishOptions {
    fn default() -> Self {
        Self {
            name: None,
            fetch: false,
            rebase: false,
            keep: false,
            tag: true,
            sign: false,
            signing_key: None,
            message: None,
            push: false,
        }
    }
}

/// What the resume check found.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resume {
    /// No finish was paused.
    Fresh,
    /// The paused merge into the target was committed.
    Resolved(String),
    /// The paused merge was aborted; the protocol starts over.
    Abandoned,
}

/// How one merge target was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeStep {
    AlreadyMerged,
    Merged,
}

/// Record of what a finish run did, for the summary.
#[derive(Debug, Default)]
struct FinishReport {
    fetched: bool,
    merges: Vec<(String, MergeStep)>,
    tag: Option<(String, bool)>,
    remote_deleted: bool,
    pushed: bool,
}

/// Merge `kind` branch `opts.name` into its targets and clean up.
pub fn finish(ctx: &FlowContext, kind: BranchKind, opts: &FinishOptions) -> Result<()> {
    if !kind.is_finishable() {
        return Err(FlowError::UserError(format!(
            "{} branches cannot be finished.",
            kind.title()
        )));
    }

    let git = &ctx.git;
    let config = &ctx.config;

    let name = require_name_arg(opts.name.as_deref(), kind.arg_name())?;
    let branch = resolve_branch(git, kind.prefix(config), name)?;
    let flow = FlowBranch::from_branch(kind, config, &branch);
    require_branch(git, &flow.branch)?;

    let marker = ResumeMarker::for_context(ctx);
    let resume = check_resume(ctx, &marker, &flow)?;
    let targets = kind.merge_targets(config);
    let mut report = FinishReport::default();

    match resume {
        Resume::Resolved(ref target) if targets.len() == 1 => {
            report.merges.push((target.clone(), MergeStep::Merged));
        }
        Resume::Resolved(_) => {
            run_merges(ctx, &flow, &targets, opts, &marker, &mut report)?;
        }
        Resume::Fresh | Resume::Abandoned => {
            preflight(ctx, &flow, &targets, opts, &mut report)?;
            run_merges(ctx, &flow, &targets, opts, &marker, &mut report)?;
        }
    }

    cleanup(ctx, &flow, &targets, opts, &mut report)?;

    record_event(
        ctx,
        Event::new(EventAction::Finish).with_details(json!({
            "targets": targets,
            "tag": report.tag.as_ref().map(|(t, _)| t.clone()),
            "kept": opts.keep,
            "pushed": report.pushed,
            "resumed": matches!(resume, Resume::Resolved(_)),
        })),
        &flow,
    )?;

    print_summary(ctx, &flow, &targets, opts, &report);
    Ok(())
}

/// Inspect the resume marker left by an earlier conflicting run.
fn check_resume(ctx: &FlowContext, marker: &ResumeMarker, flow: &FlowBranch) -> Result<Resume> {
    let git = &ctx.git;
    let Some(target) = marker.load()? else {
        return Ok(Resume::Fresh);
    };

    if !repo::working_tree_state(git)?.is_clean() {
        return Err(FlowError::MergeConflict(conflict_instructions(
            flow,
            "Merge conflicts not resolved yet, use:",
        )));
    }

    marker.clear()?;
    if repo::is_branch_merged_into(git, &flow.branch, &target)? {
        record_event(
            ctx,
            Event::new(EventAction::ConflictResume).with_details(json!({ "target": target })),
            flow,
        )?;
        Ok(Resume::Resolved(target))
    } else {
        eprintln!(
            "Merge into '{}' was not completed. Starting the finish over.",
            target
        );
        Ok(Resume::Abandoned)
    }
}

/// Validate the working tree and remote state before the first merge.
fn preflight(
    ctx: &FlowContext,
    flow: &FlowBranch,
    targets: &[String],
    opts: &FinishOptions,
    report: &mut FinishReport,
) -> Result<()> {
    let git = &ctx.git;
    require_clean_working_tree(git)?;

    let remote_branch = ctx.remote_ref(&flow.branch);
    if opts.fetch {
        if repo::remote_branch_exists(git, &remote_branch)? {
            fetch_branch(ctx, &flow.branch)?;
        }
        for target in targets {
            fetch_branch(ctx, target)?;
        }
        report.fetched = true;
    }

    if repo::remote_branch_exists(git, &remote_branch)? {
        require_branches_equal(git, &flow.branch, &remote_branch)?;
    }
    for target in targets {
        let remote_target = ctx.remote_ref(target);
        if repo::remote_branch_exists(git, &remote_target)? {
            require_branches_equal(git, target, &remote_target)?;
        }
    }

    if opts.rebase && flow.kind == BranchKind::Feature {
        let onto = flow.kind.source_branch(&ctx.config);
        if !feature::rebase_onto(git, &flow.branch, onto)? {
            return Err(FlowError::GitError(format!(
                "Finish was aborted due to conflicts during rebase.\n\
                 Please finish the rebase manually now.\n\
                 When finished, re-run:\n    git flow {} finish '{}'",
                flow.kind, flow.name
            )));
        }
    }

    Ok(())
}

/// Merge into every target in order, tagging after the first.
fn run_merges(
    ctx: &FlowContext,
    flow: &FlowBranch,
    targets: &[String],
    opts: &FinishOptions,
    marker: &ResumeMarker,
    report: &mut FinishReport,
) -> Result<()> {
    for (i, target) in targets.iter().enumerate() {
        let step = merge_into(ctx, flow, target, marker)?;
        report.merges.push((target.clone(), step));

        if i == 0 && flow.kind.tags_on_finish() && opts.tag {
            report.tag = Some(create_tag(ctx, flow, target, opts)?);
        }
    }
    Ok(())
}

fn merge_into(
    ctx: &FlowContext,
    flow: &FlowBranch,
    target: &str,
    marker: &ResumeMarker,
) -> Result<MergeStep> {
    let git = &ctx.git;
    if repo::is_branch_merged_into(git, &flow.branch, target)? {
        return Ok(MergeStep::AlreadyMerged);
    }

    if !git.run_successful(&["checkout", "-q", target])? {
        return Err(FlowError::GitError(format!("Could not check out {}.", target)));
    }

    let fast_forward =
        flow.kind.allows_fast_forward() && repo::commits_ahead(git, target, &flow.branch, 2)? == 1;
    let style = if fast_forward { "--ff" } else { "--no-ff" };

    if !git.run_successful(&["merge", style, "--no-edit", &flow.branch])? {
        marker.record(target)?;
        record_event(
            ctx,
            Event::new(EventAction::ConflictPause).with_details(json!({ "target": target })),
            flow,
        )?;
        return Err(FlowError::MergeConflict(conflict_instructions(
            flow,
            "There were merge conflicts. To resolve the merge conflict manually, use:",
        )));
    }

    Ok(MergeStep::Merged)
}

/// Tag the tip of `target`. Returns the tag name and whether it was created.
fn create_tag(
    ctx: &FlowContext,
    flow: &FlowBranch,
    target: &str,
    opts: &FinishOptions,
) -> Result<(String, bool)> {
    let git = &ctx.git;
    let tagname = flow.kind.tag_name(&ctx.config, &flow.name);
    if repo::tag_exists(git, &tagname)? {
        return Ok((tagname, false));
    }

    let message = match opts.message.as_deref() {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("Tag {}", tagname),
    };

    let mut args = vec!["tag", "-a"];
    if opts.sign || opts.signing_key.is_some() {
        args.push("-s");
    }
    if let Some(key) = opts.signing_key.as_deref() {
        args.extend(["-u", key]);
    }
    args.extend(["-m", message.as_str(), tagname.as_str(), target]);

    if !git.run_successful(&args)? {
        return Err(FlowError::GitError(
            "Tagging failed. Please run finish again to retry.".to_string(),
        ));
    }
    Ok((tagname, true))
}

/// Delete the finished branch and publish the results.
fn cleanup(
    ctx: &FlowContext,
    flow: &FlowBranch,
    targets: &[String],
    opts: &FinishOptions,
    report: &mut FinishReport,
) -> Result<()> {
    let git = &ctx.git;
    let origin = &ctx.config.origin;
    require_branch(git, &flow.branch)?;
    require_clean_working_tree(git)?;

    if let Some(last) = targets.last()
        && repo::current_branch(git)?.as_deref() != Some(last.as_str())
        && !git.run_successful(&["checkout", "-q", last])?
    {
        return Err(FlowError::GitError(format!("Could not check out {}.", last)));
    }

    if !opts.keep {
        let remote_requested = match flow.kind {
            BranchKind::Feature => opts.fetch,
            _ => opts.push,
        };
        if remote_requested && repo::remote_branch_exists(git, &ctx.remote_ref(&flow.branch))? {
            let refspec = format!(":refs/heads/{}", flow.branch);
            if !git.run_successful(&["push", origin, &refspec])? {
                return Err(FlowError::GitError(format!(
                    "Could not delete the remote {} in {}.",
                    flow.branch, origin
                )));
            }
            report.remote_deleted = true;
        }

        // `branch -d` measures against the upstream, which lags when the
        // branch is ahead of its published copy. Check the targets instead.
        for target in targets {
            if !repo::is_branch_merged_into(git, &flow.branch, target)? {
                return Err(FlowError::GitError(format!(
                    "Branch '{}' is not merged into '{}'; refusing to delete it.",
                    flow.branch, target
                )));
            }
        }
        if !git.run_successful(&["branch", "-D", &flow.branch])? {
            return Err(FlowError::GitError(format!(
                "Could not delete branch '{}'.",
                flow.branch
            )));
        }
    }

    if opts.push {
        for target in targets.iter().rev() {
            if !git.run_successful(&["push", origin, target])? {
                return Err(FlowError::GitError(format!(
                    "Could not push {} to {}.",
                    target, origin
                )));
            }
        }
        if flow.kind.tags_on_finish()
            && opts.tag
            && !git.run_successful(&["push", "--tags", origin])?
        {
            return Err(FlowError::GitError(format!(
                "Could not push tags to {}.",
                origin
            )));
        }
        report.pushed = true;
    }

    Ok(())
}

fn conflict_instructions(flow: &FlowBranch, headline: &str) -> String {
    format!(
        "{}\n    git mergetool\n    git commit\n\n\
         You can then complete the finish by running it again:\n    git flow {} finish {}",
        headline, flow.kind, flow.name
    )
}

fn print_summary(
    ctx: &FlowContext,
    flow: &FlowBranch,
    targets: &[String],
    opts: &FinishOptions,
    report: &FinishReport,
) {
    let origin = &ctx.config.origin;
    println!();
    println!("Summary of actions:");
    if report.fetched {
        println!("- Latest objects have been fetched from '{}'", origin);
    }
    for (i, (target, step)) in report.merges.iter().enumerate() {
        let verb = if i == 0 { "merged" } else { "back-merged" };
        match step {
            MergeStep::Merged => println!(
                "- The {} branch '{}' was {} into '{}'",
                flow.kind, flow.branch, verb, target
            ),
            MergeStep::AlreadyMerged => println!(
                "- The {} branch '{}' was already {} into '{}'",
                flow.kind, flow.branch, verb, target
            ),
        }
    }
    if let Some((tag, created)) = &report.tag {
        if *created {
            println!("- The {} was tagged '{}'", flow.kind, tag);
        } else {
            println!("- Tag '{}' already existed", tag);
        }
    }
    if opts.keep {
        println!(
            "- {} branch '{}' is still available",
            flow.kind.title(),
            flow.branch
        );
    } else {
        println!(
            "- {} branch '{}' has been removed",
            flow.kind.title(),
            flow.branch
        );
    }
    if report.remote_deleted {
        println!("- Remote branch '{}' was deleted from '{}'", flow.branch, origin);
    }
    if report.pushed {
        let pushed: Vec<String> = targets.iter().rev().map(|t| format!("'{}'", t)).collect();
        let tags = if report.tag.is_some() { " and tags" } else { "" };
        println!(
            "- {}{} have been pushed to '{}'",
            pushed.join(", "),
            tags,
            origin
        );
    }
    if let Some(last) = targets.last() {
        println!("- You are now on branch '{}'", last);
    }
    println!();
}
