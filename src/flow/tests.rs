//! Tests for the lifecycle drivers, run against real repositories.

use super::*;
use crate::error::FlowError;
use crate::events::events_file_path;
use crate::git::Verbosity;
use crate::resume::ResumeMarker;
use crate::test_support::{
    FlowRepo, commit_file, create_flow_repo, create_flow_repo_with_remote, git, rev_parse,
};
use std::path::Path;

fn context(repo: &FlowRepo) -> FlowContext {
    FlowContext::resolve_from(repo.path(), Verbosity::Quiet).unwrap()
}

fn start_opts(name: &str) -> StartOptions {
    StartOptions {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn finish_opts(name: &str) -> FinishOptions {
    FinishOptions {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn parent_count(path: &Path, rev: &str) -> usize {
    git(path, &["rev-list", "--parents", "-n1", rev])
        .split_whitespace()
        .count()
        - 1
}

fn current(path: &Path) -> String {
    git(path, &["symbolic-ref", "--short", "HEAD"])
}

fn branch_exists(path: &Path, branch: &str) -> bool {
    !git(path, &["branch", "--list", branch]).is_empty()
}

fn tag_list(path: &Path) -> String {
    git(path, &["tag", "--list"])
}

/// Feature and develop both rewrite README.md so the merge conflicts.
fn conflicting_feature(repo: &FlowRepo, ctx: &FlowContext) {
    let path = repo.path();
    start(ctx, BranchKind::Feature, &start_opts("clash")).unwrap();
    commit_file(path, "README.md", "feature side\n", "Feature edit");
    git(path, &["checkout", "-q", "develop"]);
    commit_file(path, "README.md", "develop side\n", "Develop edit");
}

// ========== start ==========

#[test]
fn test_start_feature_creates_and_checks_out() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    let flow = start(&ctx, BranchKind::Feature, &start_opts("login")).unwrap();

    assert_eq!(flow.branch, "feature/login");
    assert_eq!(flow.name, "login");
    assert_eq!(current(repo.path()), "feature/login");
    assert_eq!(
        rev_parse(repo.path(), "feature/login"),
        rev_parse(repo.path(), "develop")
    );

    let log = std::fs::read_to_string(events_file_path(&ctx.state_dir())).unwrap();
    assert!(log.contains("\"start\""));
    assert!(log.contains("feature/login"));
}

#[test]
fn test_start_requires_name() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    let err = start(&ctx, BranchKind::Release, &StartOptions::default()).unwrap_err();
    assert!(matches!(err, FlowError::UserError(_)));
    assert_eq!(err.to_string(), "Missing argument <version>");
}

#[test]
fn test_start_refuses_existing_branch() {
    let repo = create_flow_repo();
    git(repo.path(), &["branch", "feature/login"]);
    let ctx = context(&repo);

    let err = start(&ctx, BranchKind::Feature, &start_opts("login")).unwrap_err();
    assert!(matches!(err, FlowError::Precondition(_)));
    assert_eq!(current(repo.path()), "develop");
}

#[test]
fn test_start_from_custom_base() {
    let repo = create_flow_repo();
    let path = repo.path();
    let first = rev_parse(path, "develop");
    commit_file(path, "d.txt", "d\n", "Develop work");
    let ctx = context(&repo);

    let opts = StartOptions {
        base: Some(first.clone()),
        ..start_opts("old")
    };
    start(&ctx, BranchKind::Feature, &opts).unwrap();
    assert_eq!(rev_parse(path, "feature/old"), first);
}

#[test]
fn test_start_hotfix_is_single_instance() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("1.0.1")).unwrap();
    git(repo.path(), &["checkout", "-q", "develop"]);

    let err = start(&ctx, BranchKind::Hotfix, &start_opts("1.0.2")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "There is an existing hotfix branch (1.0.1). Finish that one first."
    );
}

#[test]
fn test_start_hotfix_base_must_be_on_master() {
    let repo = create_flow_repo();
    commit_file(repo.path(), "d.txt", "d\n", "Develop only");
    let ctx = context(&repo);

    let opts = StartOptions {
        base: Some("develop".to_string()),
        ..start_opts("1.0.1")
    };
    let err = start(&ctx, BranchKind::Hotfix, &opts).unwrap_err();
    assert!(err.to_string().contains("is not a valid commit on 'master'"));
    assert!(!branch_exists(repo.path(), "hotfix/1.0.1"));
}

#[test]
fn test_start_release_refuses_existing_tag() {
    let repo = create_flow_repo();
    git(repo.path(), &["tag", "1.0"]);
    let ctx = context(&repo);

    let err = start(&ctx, BranchKind::Release, &start_opts("1.0")).unwrap_err();
    assert!(err.to_string().contains("Tag '1.0' already exists"));
}

#[test]
fn test_start_with_fetch_checks_remote_source() {
    let repo = create_flow_repo_with_remote();
    let ctx = context(&repo);

    let opts = StartOptions {
        fetch: true,
        ..start_opts("remote-aware")
    };
    start(&ctx, BranchKind::Feature, &opts).unwrap();
    assert_eq!(current(repo.path()), "feature/remote-aware");
}

#[test]
fn test_start_support_from_master() {
    let repo = create_flow_repo();
    commit_file(repo.path(), "d.txt", "d\n", "Develop only");
    let ctx = context(&repo);

    start(&ctx, BranchKind::Support, &start_opts("1.x")).unwrap();
    assert_eq!(
        rev_parse(repo.path(), "support/1.x"),
        rev_parse(repo.path(), "master")
    );
}

// ========== finish: feature ==========

#[test]
fn test_finish_feature_single_commit_fast_forwards() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("x")).unwrap();
    commit_file(path, "x.txt", "x\n", "Feature x");
    let feature_tip = rev_parse(path, "feature/x");

    finish(&ctx, BranchKind::Feature, &finish_opts("x")).unwrap();

    assert_eq!(rev_parse(path, "develop"), feature_tip);
    assert_eq!(parent_count(path, "develop"), 1);
    assert!(!branch_exists(path, "feature/x"));
    assert!(tag_list(path).is_empty());
    assert_eq!(current(path), "develop");
    assert!(ResumeMarker::for_context(&ctx).load().unwrap().is_none());
}

#[test]
fn test_finish_feature_multiple_commits_creates_merge_commit() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("wide")).unwrap();
    commit_file(path, "a.txt", "a\n", "First");
    commit_file(path, "b.txt", "b\n", "Second");
    let feature_tip = rev_parse(path, "feature/wide");

    finish(&ctx, BranchKind::Feature, &finish_opts("wide")).unwrap();

    assert_ne!(rev_parse(path, "develop"), feature_tip);
    assert_eq!(parent_count(path, "develop"), 2);
    assert!(!branch_exists(path, "feature/wide"));
}

#[test]
fn test_finish_feature_by_prefix_and_keep() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("login-form")).unwrap();
    commit_file(path, "login.txt", "login\n", "Login form");

    let opts = FinishOptions {
        keep: true,
        ..finish_opts("log")
    };
    finish(&ctx, BranchKind::Feature, &opts).unwrap();

    assert!(branch_exists(path, "feature/login-form"));
    assert_eq!(
        rev_parse(path, "develop"),
        rev_parse(path, "feature/login-form")
    );
}

#[test]
fn test_finish_unknown_prefix_is_no_match() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    let err = finish(&ctx, BranchKind::Feature, &finish_opts("nothing")).unwrap_err();
    assert!(matches!(err, FlowError::NoMatch(_)));
}

#[test]
fn test_finish_requires_clean_tree() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("dirty")).unwrap();
    commit_file(path, "x.txt", "x\n", "Feature");
    std::fs::write(path.join("x.txt"), "uncommitted\n").unwrap();
    let develop_before = rev_parse(path, "develop");

    let err = finish(&ctx, BranchKind::Feature, &finish_opts("dirty")).unwrap_err();
    assert!(matches!(err, FlowError::Precondition(_)));
    assert_eq!(rev_parse(path, "develop"), develop_before);
}

#[test]
fn test_finish_feature_with_rebase() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("rebased")).unwrap();
    commit_file(path, "f.txt", "f\n", "Feature");
    git(path, &["checkout", "-q", "develop"]);
    commit_file(path, "d.txt", "d\n", "Develop");

    let opts = FinishOptions {
        rebase: true,
        ..finish_opts("rebased")
    };
    finish(&ctx, BranchKind::Feature, &opts).unwrap();

    // Rebased onto develop, the single commit fast-forwards.
    assert_eq!(parent_count(path, "develop"), 1);
    assert!(path.join("f.txt").exists());
    assert!(path.join("d.txt").exists());
}

#[test]
fn test_finish_feature_fetch_deletes_remote_branch() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("shared")).unwrap();
    commit_file(path, "s.txt", "s\n", "Shared work");
    publish(&ctx, BranchKind::Feature, Some("shared")).unwrap();

    let opts = FinishOptions {
        fetch: true,
        ..finish_opts("shared")
    };
    finish(&ctx, BranchKind::Feature, &opts).unwrap();

    let remote = repo.remote.as_ref().unwrap().path();
    assert!(!branch_exists(remote, "feature/shared"));
    assert!(!branch_exists(path, "feature/shared"));
}

#[test]
fn test_finish_feature_ahead_of_published_copy() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("ahead")).unwrap();
    commit_file(path, "a.txt", "a\n", "Published work");
    publish(&ctx, BranchKind::Feature, Some("ahead")).unwrap();
    commit_file(path, "b.txt", "b\n", "Local-only work");
    let tip = rev_parse(path, "feature/ahead");

    finish(&ctx, BranchKind::Feature, &finish_opts("ahead")).unwrap();

    git(path, &["merge-base", "--is-ancestor", &tip, "develop"]);
    assert!(!branch_exists(path, "feature/ahead"));
    assert_eq!(current(path), "develop");
    // Without -F the published copy is left alone.
    let remote = repo.remote.as_ref().unwrap().path();
    assert!(branch_exists(remote, "feature/ahead"));
}

// ========== finish: conflicts ==========

#[test]
fn test_conflict_writes_marker_and_pauses() {
    let repo = create_flow_repo();
    let ctx = context(&repo);
    conflicting_feature(&repo, &ctx);
    let marker = ResumeMarker::for_context(&ctx);

    let err = finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();

    assert!(matches!(err, FlowError::MergeConflict(_)));
    assert_eq!(err.exit_code(), crate::exit_codes::MERGE_CONFLICT);
    assert!(err.to_string().contains("git mergetool"));
    assert!(err.to_string().contains("git flow feature finish clash"));
    assert_eq!(marker.load().unwrap().as_deref(), Some("develop"));

    let log = std::fs::read_to_string(events_file_path(&ctx.state_dir())).unwrap();
    assert!(log.contains("\"conflict_pause\""));
}

#[test]
fn test_unresolved_conflict_rerun_changes_nothing() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);
    conflicting_feature(&repo, &ctx);
    let marker = ResumeMarker::for_context(&ctx);

    finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();
    let develop_before = rev_parse(path, "develop");

    let err = finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();

    assert!(matches!(err, FlowError::MergeConflict(_)));
    assert!(err.to_string().starts_with("Merge conflicts not resolved yet"));
    assert!(marker.load().unwrap().is_some());
    assert_eq!(rev_parse(path, "develop"), develop_before);
    assert!(branch_exists(path, "feature/clash"));
}

#[test]
fn test_resolved_conflict_rerun_goes_to_cleanup() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);
    conflicting_feature(&repo, &ctx);
    let marker = ResumeMarker::for_context(&ctx);

    finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();
    std::fs::write(path.join("README.md"), "resolved\n").unwrap();
    git(path, &["add", "README.md"]);
    git(path, &["commit", "-q", "--no-edit"]);
    let resolved = rev_parse(path, "develop");

    finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap();

    assert!(marker.load().unwrap().is_none());
    assert!(!branch_exists(path, "feature/clash"));
    assert_eq!(rev_parse(path, "develop"), resolved);
    assert_eq!(current(path), "develop");

    let log = std::fs::read_to_string(events_file_path(&ctx.state_dir())).unwrap();
    assert!(log.contains("\"conflict_resume\""));
    assert!(log.contains("\"finish\""));
}

#[test]
fn test_aborted_merge_reruns_full_protocol() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);
    conflicting_feature(&repo, &ctx);
    let marker = ResumeMarker::for_context(&ctx);

    finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();
    git(path, &["merge", "--abort"]);

    // The marker is dropped, the merge is attempted again and conflicts again.
    let err = finish(&ctx, BranchKind::Feature, &finish_opts("clash")).unwrap_err();
    assert!(err.to_string().starts_with("There were merge conflicts"));
    assert!(marker.load().unwrap().is_some());
}

// ========== finish: hotfix / release ==========

#[test]
fn test_finish_hotfix_merges_both_lines_and_tags() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("1.2.3")).unwrap();
    commit_file(path, "fix.txt", "fix\n", "Fix production");
    let fix_tip = rev_parse(path, "hotfix/1.2.3");

    finish(&ctx, BranchKind::Hotfix, &finish_opts("1.2.3")).unwrap();

    assert_eq!(tag_list(path), "1.2.3");
    assert_eq!(
        rev_parse(path, "1.2.3^{commit}"),
        rev_parse(path, "master")
    );
    assert_eq!(parent_count(path, "master"), 2);
    git(path, &["merge-base", "--is-ancestor", &fix_tip, "master"]);
    git(path, &["merge-base", "--is-ancestor", &fix_tip, "develop"]);
    assert_eq!(parent_count(path, "develop"), 2);
    assert!(!branch_exists(path, "hotfix/1.2.3"));
    assert_eq!(current(path), "develop");
}

#[test]
fn test_finish_hotfix_aborts_when_develop_diverged_from_remote() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("1.2.3")).unwrap();
    commit_file(path, "fix.txt", "fix\n", "Fix production");

    git(path, &["checkout", "-q", "develop"]);
    let base = rev_parse(path, "develop");
    commit_file(path, "remote.txt", "r\n", "Remote develop work");
    git(path, &["push", "-q", "origin", "develop"]);
    git(path, &["reset", "-q", "--hard", &base]);
    commit_file(path, "local.txt", "l\n", "Local develop work");

    let master_before = rev_parse(path, "master");
    let develop_before = rev_parse(path, "develop");

    let err = finish(&ctx, BranchKind::Hotfix, &finish_opts("1.2.3")).unwrap_err();

    assert!(matches!(err, FlowError::Precondition(_)));
    assert!(err.to_string().contains("Branches need merging first."));
    assert_eq!(rev_parse(path, "master"), master_before);
    assert_eq!(rev_parse(path, "develop"), develop_before);
    assert!(branch_exists(path, "hotfix/1.2.3"));
    assert!(tag_list(path).is_empty());
    assert!(ResumeMarker::for_context(&ctx).load().unwrap().is_none());
}

#[test]
fn test_hotfix_rerun_does_not_remerge_master() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("1.2.3")).unwrap();
    commit_file(path, "README.md", "hotfix side\n", "Fix readme");
    git(path, &["checkout", "-q", "develop"]);
    commit_file(path, "README.md", "develop side\n", "Develop readme");

    let err = finish(&ctx, BranchKind::Hotfix, &finish_opts("1.2.3")).unwrap_err();
    assert!(matches!(err, FlowError::MergeConflict(_)));
    let marker = ResumeMarker::for_context(&ctx);
    assert_eq!(marker.load().unwrap().as_deref(), Some("develop"));

    let master_after_first_run = rev_parse(path, "master");
    assert_eq!(tag_list(path), "1.2.3");

    std::fs::write(path.join("README.md"), "both sides\n").unwrap();
    git(path, &["add", "README.md"]);
    git(path, &["commit", "-q", "--no-edit"]);

    finish(&ctx, BranchKind::Hotfix, &finish_opts("1.2.3")).unwrap();

    assert_eq!(rev_parse(path, "master"), master_after_first_run);
    assert_eq!(tag_list(path), "1.2.3");
    assert!(marker.load().unwrap().is_none());
    assert!(!branch_exists(path, "hotfix/1.2.3"));
}

#[test]
fn test_hotfix_conflict_on_master_tags_and_back_merges_on_rerun() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("9.9.9")).unwrap();
    commit_file(path, "README.md", "hotfix side\n", "Fix readme");
    let fix_tip = rev_parse(path, "hotfix/9.9.9");
    git(path, &["checkout", "-q", "master"]);
    commit_file(path, "README.md", "master side\n", "Production readme");
    let develop_before = rev_parse(path, "develop");

    let err = finish(&ctx, BranchKind::Hotfix, &finish_opts("9.9.9")).unwrap_err();
    assert!(matches!(err, FlowError::MergeConflict(_)));
    let marker = ResumeMarker::for_context(&ctx);
    assert_eq!(marker.load().unwrap().as_deref(), Some("master"));
    assert!(tag_list(path).is_empty());
    assert_eq!(rev_parse(path, "develop"), develop_before);

    std::fs::write(path.join("README.md"), "both sides\n").unwrap();
    git(path, &["add", "README.md"]);
    git(path, &["commit", "-q", "--no-edit"]);
    let resolved_master = rev_parse(path, "master");

    finish(&ctx, BranchKind::Hotfix, &finish_opts("9.9.9")).unwrap();

    assert_eq!(tag_list(path), "9.9.9");
    assert_eq!(rev_parse(path, "9.9.9^{commit}"), resolved_master);
    assert_eq!(rev_parse(path, "master"), resolved_master);
    assert_eq!(parent_count(path, "develop"), 2);
    git(path, &["merge-base", "--is-ancestor", &fix_tip, "develop"]);
    assert!(marker.load().unwrap().is_none());
    assert!(!branch_exists(path, "hotfix/9.9.9"));
    assert_eq!(current(path), "develop");
}

#[test]
fn test_finish_release_without_tag_keeps_branch() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Release, &start_opts("2.0")).unwrap();
    commit_file(path, "VERSION", "2.0\n", "Bump version");

    let opts = FinishOptions {
        tag: false,
        keep: true,
        ..finish_opts("2.0")
    };
    finish(&ctx, BranchKind::Release, &opts).unwrap();

    assert!(tag_list(path).is_empty());
    assert!(branch_exists(path, "release/2.0"));
    git(path, &["merge-base", "--is-ancestor", "release/2.0", "master"]);
    git(path, &["merge-base", "--is-ancestor", "release/2.0", "develop"]);
}

#[test]
fn test_finish_release_uses_tag_message_and_versiontag() {
    let repo = create_flow_repo();
    let path = repo.path();
    git(path, &["config", "gitflow.prefix.versiontag", "v"]);
    let ctx = context(&repo);

    start(&ctx, BranchKind::Release, &start_opts("2.1")).unwrap();
    commit_file(path, "VERSION", "2.1\n", "Bump version");

    let opts = FinishOptions {
        message: Some("Second release".to_string()),
        ..finish_opts("2.1")
    };
    finish(&ctx, BranchKind::Release, &opts).unwrap();

    assert_eq!(tag_list(path), "v2.1");
    let message = git(path, &["tag", "-l", "--format=%(contents:subject)", "v2.1"]);
    assert_eq!(message, "Second release");
}

#[test]
fn test_finish_hotfix_push_publishes_lines_and_tags() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Hotfix, &start_opts("1.0.1")).unwrap();
    commit_file(path, "fix.txt", "fix\n", "Fix");

    let opts = FinishOptions {
        push: true,
        ..finish_opts("1.0.1")
    };
    finish(&ctx, BranchKind::Hotfix, &opts).unwrap();

    let remote = repo.remote.as_ref().unwrap().path();
    assert_eq!(rev_parse(remote, "master"), rev_parse(path, "master"));
    assert_eq!(rev_parse(remote, "develop"), rev_parse(path, "develop"));
    assert_eq!(tag_list(remote), "1.0.1");
}

#[test]
fn test_support_cannot_be_finished() {
    let repo = create_flow_repo();
    let ctx = context(&repo);
    start(&ctx, BranchKind::Support, &start_opts("1.x")).unwrap();

    let err = finish(&ctx, BranchKind::Support, &finish_opts("1.x")).unwrap_err();
    assert!(matches!(err, FlowError::UserError(_)));
    assert!(branch_exists(repo.path(), "support/1.x"));
}

// ========== publish / track ==========

#[test]
fn test_publish_pushes_and_configures_tracking() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("share")).unwrap();
    commit_file(path, "s.txt", "s\n", "Share");
    git(path, &["checkout", "-q", "develop"]);

    publish(&ctx, BranchKind::Feature, Some("sh")).unwrap();

    let remote = repo.remote.as_ref().unwrap().path();
    assert_eq!(
        rev_parse(remote, "feature/share"),
        rev_parse(path, "feature/share")
    );
    assert_eq!(git(path, &["config", "branch.feature/share.remote"]), "origin");
    assert_eq!(
        git(path, &["config", "branch.feature/share.merge"]),
        "refs/heads/feature/share"
    );
    assert_eq!(current(path), "feature/share");
}

#[test]
fn test_publish_twice_is_refused() {
    let repo = create_flow_repo_with_remote();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("once")).unwrap();
    publish(&ctx, BranchKind::Feature, Some("once")).unwrap();

    let err = publish(&ctx, BranchKind::Feature, Some("once")).unwrap_err();
    assert!(matches!(err, FlowError::Precondition(_)));
}

#[test]
fn test_track_creates_local_branch_from_remote() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Release, &start_opts("3.0")).unwrap();
    publish(&ctx, BranchKind::Release, Some("3.0")).unwrap();
    git(path, &["checkout", "-q", "develop"]);
    git(path, &["branch", "-q", "-D", "release/3.0"]);

    track(&ctx, BranchKind::Release, Some("3.0")).unwrap();

    assert_eq!(current(path), "release/3.0");
    assert_eq!(
        rev_parse(path, "release/3.0"),
        rev_parse(path, "origin/release/3.0")
    );
}

#[test]
fn test_track_requires_remote_branch() {
    let repo = create_flow_repo_with_remote();
    let ctx = context(&repo);

    let err = track(&ctx, BranchKind::Feature, Some("ghost")).unwrap_err();
    assert!(err.to_string().contains("origin/feature/ghost"));
}

// ========== list ==========

#[test]
fn test_list_entries_plain() {
    let repo = create_flow_repo();
    git(repo.path(), &["branch", "feature/b"]);
    git(repo.path(), &["branch", "feature/a"]);
    git(repo.path(), &["checkout", "-q", "feature/b"]);
    let ctx = context(&repo);

    let entries = list_entries(&ctx, BranchKind::Feature, false).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(!entries[0].current);
    assert!(entries[1].current);
    assert!(entries.iter().all(|e| e.annotation.is_none()));
}

#[test]
fn test_list_entries_verbose_feature_annotations() {
    let repo = create_flow_repo();
    let path = repo.path();
    git(path, &["branch", "feature/empty"]);
    git(path, &["branch", "feature/stale"]);

    git(path, &["checkout", "-q", "-b", "feature/fresh"]);
    commit_file(path, "fresh.txt", "f\n", "Fresh");
    git(path, &["checkout", "-q", "develop"]);
    commit_file(path, "d.txt", "d\n", "Develop moves on");
    git(path, &["branch", "feature/latest"]);
    git(path, &["checkout", "-q", "feature/latest"]);
    commit_file(path, "l.txt", "l\n", "Latest");
    git(path, &["checkout", "-q", "develop"]);
    git(path, &["branch", "feature/zero"]);
    let ctx = context(&repo);

    let entries = list_entries(&ctx, BranchKind::Feature, true).unwrap();
    let note = |name: &str| {
        entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.annotation.clone())
            .unwrap()
    };

    assert_eq!(note("zero"), "(no commits yet)");
    assert_eq!(note("stale"), "(is behind develop, may ff)");
    assert_eq!(note("latest"), "(based on latest develop)");
    assert_eq!(note("fresh"), "(may be rebased)");
    assert_eq!(note("empty"), "(is behind develop, may ff)");
}

#[test]
fn test_list_entries_verbose_hotfix_names_base_tag() {
    let repo = create_flow_repo();
    let path = repo.path();
    git(path, &["tag", "1.0.0", "master"]);
    git(path, &["checkout", "-q", "-b", "hotfix/1.0.1", "master"]);
    commit_file(path, "fix.txt", "fix\n", "Fix");
    let ctx = context(&repo);

    let entries = list_entries(&ctx, BranchKind::Hotfix, true).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].current);
    assert_eq!(entries[0].annotation.as_deref(), Some("(based on 1.0.0)"));
}

#[test]
fn test_list_with_no_branches_succeeds() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    assert!(list_entries(&ctx, BranchKind::Release, true).unwrap().is_empty());
    list(&ctx, BranchKind::Release, true).unwrap();
}

// ========== feature extras ==========

#[test]
fn test_checkout_by_prefix() {
    let repo = create_flow_repo();
    git(repo.path(), &["branch", "feature/navigation"]);
    let ctx = context(&repo);

    checkout(&ctx, Some("nav")).unwrap();
    assert_eq!(current(repo.path()), "feature/navigation");

    let err = checkout(&ctx, None).unwrap_err();
    assert!(matches!(err, FlowError::UserError(_)));
}

#[test]
fn test_diff_outside_feature_branch_is_refused() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    let err = diff(&ctx, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not on a feature branch. Name one explicitly."
    );
}

#[test]
fn test_diff_named_feature() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);
    start(&ctx, BranchKind::Feature, &start_opts("docs")).unwrap();
    commit_file(path, "docs.txt", "docs\n", "Docs");
    git(path, &["checkout", "-q", "develop"]);

    diff(&ctx, Some("docs")).unwrap();
}

#[test]
fn test_rebase_current_feature() {
    let repo = create_flow_repo();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("moving")).unwrap();
    commit_file(path, "m.txt", "m\n", "Moving");
    git(path, &["checkout", "-q", "develop"]);
    commit_file(path, "d.txt", "d\n", "Develop");
    git(path, &["checkout", "-q", "feature/moving"]);

    rebase(&ctx, None, false).unwrap();

    assert_eq!(
        git(path, &["merge-base", "develop", "feature/moving"]),
        rev_parse(path, "develop")
    );
}

#[test]
fn test_rebase_without_name_off_feature_is_refused() {
    let repo = create_flow_repo();
    let ctx = context(&repo);

    let err = rebase(&ctx, None, false).unwrap_err();
    assert!(err.to_string().contains("The current HEAD is no feature branch."));
}

#[test]
fn test_pull_refuses_cross_branch_merge() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    git(path, &["branch", "feature/other"]);
    git(path, &["checkout", "-q", "-b", "feature/mine"]);
    let ctx = context(&repo);

    let err = pull(&ctx, Some("origin"), Some("other")).unwrap_err();
    assert!(matches!(err, FlowError::Precondition(_)));
    assert!(err.to_string().contains("To avoid unintended merges"));

    let err = pull(&ctx, None, Some("other")).unwrap_err();
    assert_eq!(err.to_string(), "Name a remote explicitly.");
}

#[test]
fn test_pull_creates_local_branch_from_remote() {
    let repo = create_flow_repo_with_remote();
    let path = repo.path();
    let ctx = context(&repo);

    start(&ctx, BranchKind::Feature, &start_opts("remote-only")).unwrap();
    commit_file(path, "r.txt", "r\n", "Remote work");
    publish(&ctx, BranchKind::Feature, Some("remote-only")).unwrap();
    let tip = rev_parse(path, "feature/remote-only");
    git(path, &["checkout", "-q", "develop"]);
    git(path, &["branch", "-q", "-D", "feature/remote-only"]);

    pull(&ctx, Some("origin"), Some("remote-only")).unwrap();

    assert_eq!(current(path), "feature/remote-only");
    assert_eq!(rev_parse(path, "feature/remote-only"), tip);
}

// ========== kind policy ==========

#[test]
fn test_kind_policy_table() {
    let config = crate::config::FlowConfig::default();

    assert_eq!(BranchKind::Feature.merge_targets(&config), vec!["develop"]);
    assert_eq!(
        BranchKind::Hotfix.merge_targets(&config),
        vec!["master", "develop"]
    );
    assert!(BranchKind::Support.merge_targets(&config).is_empty());

    assert_eq!(BranchKind::Release.source_branch(&config), "develop");
    assert_eq!(BranchKind::Support.source_branch(&config), "master");

    assert!(BranchKind::Release.tags_on_finish());
    assert!(!BranchKind::Feature.tags_on_finish());
    assert!(BranchKind::Hotfix.single_instance());
    assert!(BranchKind::Feature.allows_fast_forward());
    assert!(!BranchKind::Release.allows_fast_forward());
    assert!(!BranchKind::Support.is_finishable());

    assert_eq!(
        FlowBranch::from_branch(BranchKind::Hotfix, &config, "hotfix/1.2.3").name,
        "1.2.3"
    );
}
