use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A working repository plus the bare repository registered as its `origin`.
pub(crate) struct FlowRepo {
    pub(crate) work: TempDir,
    pub(crate) remote: Option<TempDir>,
}

impl FlowRepo {
    pub(crate) fn path(&self) -> &Path {
        self.work.path()
    }
}

/// A plain repository on `master` with a single commit and no git-flow config.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init", "-q"]);
    // Deterministic production branch name regardless of init.defaultBranch.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/master"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    git(path, &["config", "tag.gpgsign", "false"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-q", "-m", "Initial commit"]);

    temp_dir
}

/// A repository initialised for git-flow: `master`, `develop` (checked out)
/// and the default prefixes.
pub(crate) fn create_flow_repo() -> FlowRepo {
    let work = create_test_repo();
    let path = work.path();

    git(path, &["branch", "develop", "master"]);
    configure_flow(path);
    git(path, &["checkout", "-q", "develop"]);

    FlowRepo { work, remote: None }
}

/// Like [`create_flow_repo`], with a bare `origin` holding both permanent lines.
pub(crate) fn create_flow_repo_with_remote() -> FlowRepo {
    let mut repo = create_flow_repo();
    let remote = TempDir::new().unwrap();

    git(remote.path(), &["init", "-q", "--bare"]);
    let remote_str = remote.path().to_string_lossy().to_string();
    git(repo.path(), &["remote", "add", "origin", &remote_str]);
    git(repo.path(), &["push", "-q", "origin", "master", "develop"]);
    git(repo.path(), &["fetch", "-q", "origin"]);

    repo.remote = Some(remote);
    repo
}

fn configure_flow(path: &Path) {
    git(path, &["config", "gitflow.branch.master", "master"]);
    git(path, &["config", "gitflow.branch.develop", "develop"]);
    git(path, &["config", "gitflow.prefix.feature", "feature/"]);
    git(path, &["config", "gitflow.prefix.release", "release/"]);
    git(path, &["config", "gitflow.prefix.hotfix", "hotfix/"]);
    git(path, &["config", "gitflow.prefix.support", "support/"]);
    git(path, &["config", "gitflow.prefix.versiontag", ""]);
}

/// Write `content` to `file` and commit it on the current branch.
pub(crate) fn commit_file(repo_dir: &Path, file: &str, content: &str, message: &str) {
    std::fs::write(repo_dir.join(file), content).unwrap();
    git(repo_dir, &["add", file]);
    git(repo_dir, &["commit", "-q", "-m", message]);
}

/// Resolve a revision to its full SHA.
pub(crate) fn rev_parse(repo_dir: &Path, rev: &str) -> String {
    git(repo_dir, &["rev-parse", rev])
}

/// Run git in `repo_dir`, panicking on failure, and return trimmed stdout.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
