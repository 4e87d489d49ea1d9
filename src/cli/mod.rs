//! CLI argument parsing for git-flow.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::exit_codes;
use crate::git::Verbosity;
use clap::{Args, Parser, Subcommand};

/// git-flow: high-level repository operations for the feature / release /
/// hotfix / support branching model.
///
/// Long-lived lines:
/// - the production line (default `master`) holds released code
/// - the integration line (default `develop`) collects finished work
#[derive(Parser, Debug)]
#[command(name = "git-flow", bin_name = "git flow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Echo every git command before running it.
    #[arg(long, global = true)]
    pub show: bool,

    /// Echo git commands together with their output and exit status.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for git-flow.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a repository for the branching model.
    ///
    /// Chooses the production and integration branches, creates them if
    /// needed, and stores the branch prefixes.
    Init(InitArgs),

    /// Manage feature branches.
    Feature(FeatureCommand),

    /// Manage release branches.
    Release(TaggedCommand),

    /// Manage hotfix branches.
    Hotfix(TaggedCommand),

    /// Manage support branches.
    Support(SupportCommand),

    /// Show version information.
    Version,

    /// Show the resolved git-flow configuration as YAML.
    Config,
}

/// Arguments for the `init` command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force setting of gitflow branches, even if already configured.
    #[arg(short, long)]
    pub force: bool,

    /// Use default branch naming conventions without prompting.
    #[arg(short, long)]
    pub defaults: bool,
}

/// Feature subcommands. Without one, features are listed.
#[derive(Args, Debug)]
pub struct FeatureCommand {
    #[command(subcommand)]
    pub action: Option<FeatureAction>,
}

/// Available feature actions.
#[derive(Subcommand, Debug)]
pub enum FeatureAction {
    /// List feature branches.
    List(ListArgs),

    /// Start a new feature branch off the integration line.
    Start(StartArgs),

    /// Merge a feature into the integration line and remove it.
    Finish(FeatureFinishArgs),

    /// Push a feature to the remote.
    Publish(NameArgs),

    /// Create a local branch tracking a remote feature.
    Track(NameArgs),

    /// Show the changes a feature introduces.
    Diff(OptionalNameArgs),

    /// Rebase a feature onto the integration line.
    Rebase(RebaseArgs),

    /// Check out a feature by name prefix.
    #[command(alias = "co")]
    Checkout(OptionalNameArgs),

    /// Pull a feature from a remote.
    Pull(PullArgs),
}

/// Release and hotfix subcommands. Without one, branches are listed.
#[derive(Args, Debug)]
pub struct TaggedCommand {
    #[command(subcommand)]
    pub action: Option<TaggedAction>,
}

/// Actions shared by release and hotfix branches.
#[derive(Subcommand, Debug)]
pub enum TaggedAction {
    /// List branches.
    List(ListArgs),

    /// Start a new branch.
    Start(StartArgs),

    /// Merge into both permanent lines, tag, and remove the branch.
    Finish(TaggedFinishArgs),

    /// Push a branch to the remote.
    Publish(NameArgs),

    /// Create a local branch tracking a remote one.
    Track(NameArgs),
}

/// Support subcommands. Without one, support branches are listed.
#[derive(Args, Debug)]
pub struct SupportCommand {
    #[command(subcommand)]
    pub action: Option<SupportAction>,
}

/// Available support actions. Support branches are never finished.
#[derive(Subcommand, Debug)]
pub enum SupportAction {
    /// List support branches.
    List(ListArgs),

    /// Start a new support branch off the production line.
    Start(StartArgs),

    /// Push a support branch to the remote.
    Publish(NameArgs),

    /// Create a local branch tracking a remote support branch.
    Track(NameArgs),
}

/// Arguments for `list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Show how each branch relates to its source line.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for `start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Fetch from the remote before starting.
    #[arg(short = 'F', long)]
    pub fetch: bool,

    /// Name (or version) of the new branch.
    pub name: Option<String>,

    /// Commit to start from.
    pub base: Option<String>,
}

/// Arguments for `feature finish`.
#[derive(Args, Debug)]
pub struct FeatureFinishArgs {
    /// Rebase onto the integration line before merging.
    #[arg(short, long)]
    pub rebase: bool,

    /// Fetch from the remote before finishing.
    #[arg(short = 'F', long)]
    pub fetch: bool,

    /// Keep the branch after finishing.
    #[arg(short, long)]
    pub keep: bool,

    /// Name or unambiguous name prefix.
    pub name: Option<String>,
}

/// Arguments for `release finish` and `hotfix finish`.
#[derive(Args, Debug)]
pub struct TaggedFinishArgs {
    /// Fetch from the remote before finishing.
    #[arg(short = 'F', long)]
    pub fetch: bool,

    /// Sign the version tag cryptographically.
    #[arg(short, long)]
    pub sign: bool,

    /// Use the given GPG key for the signature (implies --sign).
    #[arg(short = 'u', long = "use-key", value_name = "KEY")]
    pub signing_key: Option<String>,

    /// Use the given tag message.
    #[arg(short, long, value_name = "MSG")]
    pub message: Option<String>,

    /// Push the permanent lines and tags to the remote afterwards.
    #[arg(short, long)]
    pub push: bool,

    /// Keep the branch after finishing.
    #[arg(short, long)]
    pub keep: bool,

    /// Tag the finished version (the default).
    #[arg(short = 't', long = "tag", conflicts_with = "no_tag")]
    pub tag: bool,

    /// Do not tag the finished version.
    #[arg(long = "no-tag")]
    pub no_tag: bool,

    /// Version or unambiguous version prefix.
    pub name: Option<String>,
}

impl TaggedFinishArgs {
    /// Whether a version tag should be created.
    pub fn tagging(&self) -> bool {
        !self.no_tag
    }
}

/// A required name argument (validated by the command, not by clap).
#[derive(Args, Debug)]
pub struct NameArgs {
    /// Name or unambiguous name prefix.
    pub name: Option<String>,
}

/// A name argument that defaults to the current branch.
#[derive(Args, Debug)]
pub struct OptionalNameArgs {
    /// Name or unambiguous name prefix; defaults to the current branch.
    pub name: Option<String>,
}

/// Arguments for `feature rebase`.
#[derive(Args, Debug)]
pub struct RebaseArgs {
    /// Do an interactive rebase.
    #[arg(short, long)]
    pub interactive: bool,

    /// Name or unambiguous name prefix; defaults to the current branch.
    pub name: Option<String>,
}

/// Arguments for `feature pull`.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Remote to pull from.
    pub remote: Option<String>,

    /// Feature name; defaults to the current branch.
    pub name: Option<String>,
}

impl Cli {
    /// Parse command line arguments.
    ///
    /// Usage errors exit with the user-error status rather than clap's own.
    pub fn parse_args() -> Self {
        Cli::try_parse().unwrap_or_else(|err| {
            let code = if err.use_stderr() {
                exit_codes::USER_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        })
    }

    /// Verbosity selected by the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.show, self.debug)
    }
}
