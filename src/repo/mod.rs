//! Repository state queries for git-flow.
//!
//! Everything the guards and lifecycle drivers need to know about the
//! repository is derived here from the git runner:
//!
//! - Local and remote-tracking branch sets, tags and the current branch
//! - Commit ids, merge bases and ancestry ("is merged into")
//! - Working tree cleanliness and the private metadata directory

mod branches;
mod status;

pub use branches::{
    all_branches, branch_exists, commits_ahead, current_branch, is_branch_merged_into,
    local_branch_exists, local_branches, merge_base, remote_branch_exists, remote_branches,
    rev_parse, short_sha, tag_exists, tags,
};
pub use status::{WorkingTreeState, git_dir, is_git_repo, is_headless, working_tree_state};
