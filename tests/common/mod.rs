use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Create a new temporary git repository with user config set.
pub fn create_git_repo() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");

    git(temp.path(), &["init"]);
    git(temp.path(), &["config", "user.email", "test@example.com"]);
    git(temp.path(), &["config", "user.name", "Test User"]);
    git(temp.path(), &["config", "commit.gpgsign", "false"]);

    temp
}

/// Run a git command in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Write a file below `root`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dirs");
    }
    fs::write(path, content).expect("failed to write file");
}

/// Extract the block for `path` from a dump, from `Path:` to `===== END FILE =====`.
#[allow(dead_code)]
pub fn file_block<'a>(dump: &'a str, path: &str) -> Option<&'a str> {
    let marker = format!("===== BEGIN FILE =====\nPath: {path}\n");
    let start = dump.find(&marker)?;
    let rest = &dump[start..];
    let end = rest.find("===== END FILE =====")?;
    Some(&rest[..end])
}

/// Body of a file block: everything after the content separator.
#[allow(dead_code)]
pub fn block_body(block: &str) -> &str {
    block
        .split_once("----- CONTENT -----\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

/// Convenience helper for spawning the flatpack binary via assert_cmd.
#[allow(dead_code)]
pub fn flatpack_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("flatpack");
    cmd.env_remove("FLATPACK_INCLUDE_UNTRACKED")
        .env_remove("FLATPACK_LOG");
    cmd
}

/// Run flatpack in `dir` with `args` and return stdout, asserting success.
#[allow(dead_code)]
pub fn run_flatpack(dir: &Path, args: &[&str]) -> String {
    let output = flatpack_cmd()
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run flatpack");
    assert!(
        output.status.success(),
        "flatpack failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("output is not UTF-8")
}
