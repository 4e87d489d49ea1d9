//! Branch divergence classification.

use crate::error::Result;
use crate::git::Git;
use crate::repo;

/// Relationship between the tips of two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BranchDivergence {
    /// Both branches point to the same commit.
    Equal,
    /// The first branch is strictly behind and may be fast-forwarded.
    FirstBehind,
    /// The second branch is strictly behind and may be fast-forwarded.
    SecondBehind,
    /// Both branches have unique commits; a real merge is needed.
    Diverged,
    /// The branches share no history.
    NoCommonAncestor,
}

/// Classify two commits given their nearest common ancestor.
pub fn classify(commit1: &str, commit2: &str, base: Option<&str>) -> BranchDivergence {
    if commit1 == commit2 {
        return BranchDivergence::Equal;
    }
    match base {
        None => BranchDivergence::NoCommonAncestor,
        Some(base) if base == commit1 => BranchDivergence::FirstBehind,
        Some(base) if base == commit2 => BranchDivergence::SecondBehind,
        Some(_) => BranchDivergence::Diverged,
    }
}

/// Compare the tips of `b1` and `b2`.
pub fn compare_branches(git: &Git, b1: &str, b2: &str) -> Result<BranchDivergence> {
    let commit1 = repo::rev_parse(git, b1)?;
    let commit2 = repo::rev_parse(git, b2)?;
    if commit1 == commit2 {
        return Ok(BranchDivergence::Equal);
    }

    let base = repo::merge_base(git, &commit1, &commit2)?;
    Ok(classify(&commit1, &commit2, base.as_deref()))
}
