//! Command implementations for git-flow.
//!
//! This module maps the parsed CLI onto the lifecycle drivers in
//! [`crate::flow`]. Every branch-kind command resolves a [`FlowContext`]
//! first, so a repository that was never initialized fails before any
//! git state is touched.

mod config;
mod init;

use crate::cli::{
    Command, FeatureAction, FeatureFinishArgs, ListArgs, StartArgs, SupportAction, TaggedAction,
    TaggedFinishArgs,
};
use crate::context::FlowContext;
use crate::error::Result;
use crate::flow::{self, BranchKind, FinishOptions, StartOptions};
use crate::git::Verbosity;

/// Version reported by `git flow version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(&args, verbosity),
        Command::Feature(cmd) => dispatch_feature(cmd.action, verbosity),
        Command::Release(cmd) => dispatch_tagged(BranchKind::Release, cmd.action, verbosity),
        Command::Hotfix(cmd) => dispatch_tagged(BranchKind::Hotfix, cmd.action, verbosity),
        Command::Support(cmd) => dispatch_support(cmd.action, verbosity),
        Command::Version => {
            println!("{}", VERSION);
            Ok(())
        }
        Command::Config => config::cmd_config(verbosity),
    }
}

fn dispatch_feature(action: Option<FeatureAction>, verbosity: Verbosity) -> Result<()> {
    let ctx = FlowContext::resolve(verbosity)?;
    let kind = BranchKind::Feature;

    match action.unwrap_or(FeatureAction::List(ListArgs::default())) {
        FeatureAction::List(args) => flow::list(&ctx, kind, args.verbose),
        FeatureAction::Start(args) => start(&ctx, kind, args),
        FeatureAction::Finish(args) => flow::finish(&ctx, kind, &feature_finish_options(args)),
        FeatureAction::Publish(args) => flow::publish(&ctx, kind, args.name.as_deref()).map(drop),
        FeatureAction::Track(args) => flow::track(&ctx, kind, args.name.as_deref()).map(drop),
        FeatureAction::Diff(args) => flow::diff(&ctx, args.name.as_deref()),
        FeatureAction::Rebase(args) => flow::rebase(&ctx, args.name.as_deref(), args.interactive),
        FeatureAction::Checkout(args) => flow::checkout(&ctx, args.name.as_deref()),
        FeatureAction::Pull(args) => flow::pull(&ctx, args.remote.as_deref(), args.name.as_deref()),
    }
}

fn dispatch_tagged(
    kind: BranchKind,
    action: Option<TaggedAction>,
    verbosity: Verbosity,
) -> Result<()> {
    let ctx = FlowContext::resolve(verbosity)?;

    match action.unwrap_or(TaggedAction::List(ListArgs::default())) {
        TaggedAction::List(args) => flow::list(&ctx, kind, args.verbose),
        TaggedAction::Start(args) => start(&ctx, kind, args),
        TaggedAction::Finish(args) => flow::finish(&ctx, kind, &tagged_finish_options(args)),
        TaggedAction::Publish(args) => flow::publish(&ctx, kind, args.name.as_deref()).map(drop),
        TaggedAction::Track(args) => flow::track(&ctx, kind, args.name.as_deref()).map(drop),
    }
}

fn dispatch_support(action: Option<SupportAction>, verbosity: Verbosity) -> Result<()> {
    let ctx = FlowContext::resolve(verbosity)?;
    let kind = BranchKind::Support;

    match action.unwrap_or(SupportAction::List(ListArgs::default())) {
        SupportAction::List(args) => flow::list(&ctx, kind, args.verbose),
        SupportAction::Start(args) => start(&ctx, kind, args),
        SupportAction::Publish(args) => flow::publish(&ctx, kind, args.name.as_deref()).map(drop),
        SupportAction::Track(args) => flow::track(&ctx, kind, args.name.as_deref()).map(drop),
    }
}

fn start(ctx: &FlowContext, kind: BranchKind, args: StartArgs) -> Result<()> {
    let opts = StartOptions {
        name: args.name,
        base: args.base,
        fetch: args.fetch,
    };
    flow::start(ctx, kind, &opts).map(drop)
}

fn feature_finish_options(args: FeatureFinishArgs) -> FinishOptions {
    FinishOptions {
        name: args.name,
        fetch: args.fetch,
        rebase: args.rebase,
        keep: args.keep,
        tag: false,
        ..Default::default()
    }
}

fn tagged_finish_options(args: TaggedFinishArgs) -> FinishOptions {
    FinishOptions {
        tag: args.tagging(),
        name: args.name,
        fetch: args.fetch,
        rebase: false,
        keep: args.keep,
        sign: args.sign || args.signing_key.is_some(),
        signing_key: args.signing_key,
        message: args.message,
        push: args.push,
    }
}
