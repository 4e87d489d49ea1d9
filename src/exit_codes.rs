//! Exit code constants for the git-flow CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, repository not initialized)
//! - 2: Precondition violation or branch name resolution failure
//! - 3: Git operation failure
//! - 4: Finish paused on a merge conflict

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a repository that is not set up for git-flow.
pub const USER_ERROR: i32 = 1;

/// Precondition violation: dirty tree, missing/existing branch, diverged lines,
/// or an abbreviated name that matched nothing or too much.
pub const PRECONDITION_FAILURE: i32 = 2;

/// Git operation failure: checkout, merge, tag, push or fetch errors.
pub const GIT_FAILURE: i32 = 3;

/// A finish stopped on a merge conflict and is waiting for manual resolution.
pub const MERGE_CONFLICT: i32 = 4;
