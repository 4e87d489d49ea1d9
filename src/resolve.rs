//! Abbreviated branch name resolution.
//!
//! Operators may type any unambiguous leading fragment of a supporting
//! branch's short name. An exact `prefix + name` branch always wins; otherwise
//! exactly one local branch may start with `prefix + name`.

use crate::error::{FlowError, Result};
use crate::git::Git;
use crate::repo;

/// Outcome of resolving an abbreviated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    /// Exactly one branch matched; holds the full branch name.
    Unique(String),
    /// No local branch starts with the requested name.
    NoMatch,
    /// Several branches matched, in branch order.
    Ambiguous(Vec<String>),
}

impl NameMatch {
    /// Convert into the full branch name, or the matching resolution error.
    pub fn into_result(self, name: &str) -> Result<String> {
        match self {
            NameMatch::Unique(branch) => Ok(branch),
            NameMatch::NoMatch => Err(FlowError::NoMatch(name.to_string())),
            NameMatch::Ambiguous(candidates) => Err(FlowError::Ambiguous {
                name: name.to_string(),
                candidates,
            }),
        }
    }
}

/// Match `prefix + name` against a list of local branch names.
///
/// The match is a literal string prefix, not a pattern.
pub fn match_name_prefix(branches: &[String], prefix: &str, name: &str) -> NameMatch {
    let wanted = format!("{}{}", prefix, name);

    if branches.iter().any(|b| *b == wanted) {
        return NameMatch::Unique(wanted);
    }

    let mut matches: Vec<String> = branches
        .iter()
        .filter(|b| b.starts_with(&wanted))
        .cloned()
        .collect();

    match matches.len() {
        0 => NameMatch::NoMatch,
        1 => NameMatch::Unique(matches.remove(0)),
        _ => NameMatch::Ambiguous(matches),
    }
}

/// Resolve `name` among the repository's local branches under `prefix`.
pub fn resolve_name_prefix(git: &Git, prefix: &str, name: &str) -> Result<NameMatch> {
    let branches = repo::local_branches(git)?;
    Ok(match_name_prefix(&branches, prefix, name))
}

/// Resolve `name` to a full branch name or fail the caller's operation.
pub fn resolve_branch(git: &Git, prefix: &str, name: &str) -> Result<String> {
    resolve_name_prefix(git, prefix, name)?.into_result(name)
}
