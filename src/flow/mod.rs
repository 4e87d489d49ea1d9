//! Lifecycle drivers for supporting branches.
//!
//! One driver serves every supporting-branch kind. What differs between
//! kinds (source line, merge targets, tagging, single-instance rule, merge
//! style) is expressed as policy on [`BranchKind`]:
//!
//! | kind    | source  | merge targets    | tags | single instance | fast-forward |
//! |---------|---------|------------------|------|-----------------|--------------|
//! | feature | develop | develop          | no   | no              | ≤1 commit    |
//! | release | develop | master, develop  | yes  | no              | never        |
//! | hotfix  | master  | master, develop  | yes  | yes             | never        |
//! | support | master  | (not finishable) | no   | no              | n/a          |

mod feature;
mod finish;
mod list;
mod publish;
mod start;

#[cfg(test)]
mod tests;

pub use feature::{checkout, diff, pull, rebase};
pub use finish::{FinishOptions, finish};
pub use list::{ListEntry, list, list_entries};
pub use publish::{publish, track};
pub use start::{StartOptions, start};

use crate::config::FlowConfig;
use crate::context::FlowContext;
use crate::error::{FlowError, Result};
use crate::events::{Event, append_event};
use std::fmt;

/// A supporting-branch kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    /// Short-lived work merged back into the integration line.
    Feature,
    /// Release preparation merged into both lines and tagged.
    Release,
    /// Production fix merged into both lines and tagged.
    Hotfix,
    /// Long-lived maintenance line branched off production.
    Support,
}

impl BranchKind {
    /// Lower-case kind name used in messages and commands.
    pub fn as_str(self) -> &'static str {
        match self {
            BranchKind::Feature => "feature",
            BranchKind::Release => "release",
            BranchKind::Hotfix => "hotfix",
            BranchKind::Support => "support",
        }
    }

    /// Capitalized kind name for summaries.
    pub fn title(self) -> &'static str {
        match self {
            BranchKind::Feature => "Feature",
            BranchKind::Release => "Release",
            BranchKind::Hotfix => "Hotfix",
            BranchKind::Support => "Support",
        }
    }

    /// Placeholder for the identifying argument in usage messages.
    pub fn arg_name(self) -> &'static str {
        match self {
            BranchKind::Feature | BranchKind::Support => "name",
            BranchKind::Release | BranchKind::Hotfix => "version",
        }
    }

    /// The configured namespace prefix for this kind.
    pub fn prefix(self, config: &FlowConfig) -> &str {
        match self {
            BranchKind::Feature => &config.prefixes.feature,
            BranchKind::Release => &config.prefixes.release,
            BranchKind::Hotfix => &config.prefixes.hotfix,
            BranchKind::Support => &config.prefixes.support,
        }
    }

    /// The permanent line new branches of this kind start from.
    pub fn source_branch(self, config: &FlowConfig) -> &str {
        match self {
            BranchKind::Feature | BranchKind::Release => &config.develop_branch,
            BranchKind::Hotfix | BranchKind::Support => &config.master_branch,
        }
    }

    /// Permanent lines a finished branch is merged into, in merge order.
    pub fn merge_targets(self, config: &FlowConfig) -> Vec<String> {
        match self {
            BranchKind::Feature => vec![config.develop_branch.clone()],
            BranchKind::Release | BranchKind::Hotfix => {
                vec![config.master_branch.clone(), config.develop_branch.clone()]
            }
            BranchKind::Support => Vec::new(),
        }
    }

    /// Whether finishing creates a version tag.
    pub fn tags_on_finish(self) -> bool {
        matches!(self, BranchKind::Release | BranchKind::Hotfix)
    }

    /// Whether at most one branch of this kind may exist at a time.
    pub fn single_instance(self) -> bool {
        self == BranchKind::Hotfix
    }

    /// Whether a single-commit branch may be fast-forwarded into its target.
    pub fn allows_fast_forward(self) -> bool {
        self == BranchKind::Feature
    }

    /// Whether a custom base must be a commit on the source line.
    pub fn base_must_be_on_source(self) -> bool {
        matches!(self, BranchKind::Hotfix | BranchKind::Support)
    }

    /// Whether the kind has a finish protocol at all.
    pub fn is_finishable(self) -> bool {
        self != BranchKind::Support
    }

    /// Full branch name for a short name.
    pub fn branch_name(self, config: &FlowConfig, name: &str) -> String {
        format!("{}{}", self.prefix(config), name)
    }

    /// Version tag name for a short name.
    pub fn tag_name(self, config: &FlowConfig, name: &str) -> String {
        format!("{}{}", config.prefixes.versiontag, name)
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete supporting branch: its kind, short name and full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowBranch {
    /// The branch's kind.
    pub kind: BranchKind,
    /// Short name without the kind prefix (e.g. `1.2.3`).
    pub name: String,
    /// Full branch name (e.g. `hotfix/1.2.3`).
    pub branch: String,
}

impl FlowBranch {
    /// Build from a short name.
    pub fn from_name(kind: BranchKind, config: &FlowConfig, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            branch: kind.branch_name(config, name),
        }
    }

    /// Build from a full branch name carrying the kind prefix.
    pub fn from_branch(kind: BranchKind, config: &FlowConfig, branch: &str) -> Self {
        let prefix = kind.prefix(config);
        Self {
            kind,
            name: branch.strip_prefix(prefix).unwrap_or(branch).to_string(),
            branch: branch.to_string(),
        }
    }
}

/// Append a lifecycle event for `flow` to the repository's event log.
fn record_event(ctx: &FlowContext, event: Event, flow: &FlowBranch) -> Result<()> {
    append_event(
        &ctx.state_dir(),
        &event.with_branch(flow.kind.as_str(), flow.branch.clone()),
    )
}

/// Fetch `branch` from the configured remote, aborting on failure.
fn fetch_branch(ctx: &FlowContext, branch: &str) -> Result<()> {
    let origin = &ctx.config.origin;
    if ctx.git.run_successful(&["fetch", "-q", origin, branch])? {
        Ok(())
    } else {
        Err(FlowError::GitError(format!(
            "Could not fetch {} from {}.",
            branch, origin
        )))
    }
}

/// Fetch everything from the configured remote, aborting on failure.
fn fetch_all(ctx: &FlowContext) -> Result<()> {
    let origin = &ctx.config.origin;
    if ctx.git.run_successful(&["fetch", "-q", origin])? {
        Ok(())
    } else {
        Err(FlowError::GitError(format!("Could not fetch from {}.", origin)))
    }
}
