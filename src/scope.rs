//! # Scope Collection
//!
//! Decides which paths appear in the output at all, independent of redaction.
//!
//! ## Membership
//!
//! ```text
//! scope = (tracked ∪ untracked-not-ignored ∪ submodules) ∩ regular files on disk
//! ```
//!
//! - Untracked paths only join when `include_untracked` is set
//! - Submodules are directories on disk; they skip the regular-file check and
//!   are recorded as tracked with size 0
//! - Paths that vanished or are not regular files are skipped silently
//! - A path whose metadata cannot be read is reported and skipped
//!
//! Records come out sorted by path bytes, deduplicated, and already carry
//! their [`Redaction`].

use crate::error::Result;
use crate::git::WorkTree;
use crate::redact::{decide_entry, Redaction};
use crate::rules::RuleSet;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One path in scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Repository-relative path with `/` separators
    pub path: String,
    /// Location on disk
    pub location: PathBuf,
    pub tracked: bool,
    pub size: u64,
    pub redaction: Redaction,
    /// Gitlink placeholder rather than a file
    pub submodule: bool,
}

impl FileRecord {
    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Ordered records plus their tracked/untracked split
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub records: Vec<FileRecord>,
    pub tracked_count: usize,
    pub untracked_count: usize,
}

impl Scope {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collect every file in scope under `repo_root`.
pub fn collect(
    repo_root: &Path,
    tree: &impl WorkTree,
    include_untracked: bool,
    rules: &RuleSet,
) -> Result<Scope> {
    let tracked: HashSet<Vec<u8>> = tree.tracked_paths()?.into_iter().collect();
    let submodules: HashSet<Vec<u8>> = tree.submodule_paths()?.into_iter().collect();

    let mut paths: BTreeSet<Vec<u8>> = tracked.iter().cloned().collect();
    paths.extend(submodules.iter().cloned());
    if include_untracked {
        paths.extend(tree.untracked_paths()?);
    }

    let mut scope = Scope::default();

    for raw in paths {
        let rel = String::from_utf8_lossy(&raw).into_owned();
        let location = repo_root.join(path_from_bytes(&raw));
        let submodule = submodules.contains(&raw);

        let size = if submodule {
            0
        } else {
            if !location.is_file() {
                debug!("skipping {rel}: not a regular file");
                continue;
            }
            match fs::metadata(&location) {
                Ok(meta) => meta.len(),
                Err(err) => {
                    warn!("cannot stat {rel}: {err}");
                    continue;
                }
            }
        };

        let is_tracked = submodule || tracked.contains(&raw);
        if is_tracked {
            scope.tracked_count += 1;
        } else {
            scope.untracked_count += 1;
        }

        let redaction = decide_entry(&rel, submodule, rules);
        scope.records.push(FileRecord {
            path: rel,
            location,
            tracked: is_tracked,
            size,
            redaction,
            submodule,
        });
    }

    Ok(scope)
}

#[cfg(unix)]
fn path_from_bytes(raw: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(raw))
}

#[cfg(not(unix))]
fn path_from_bytes(raw: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlatpackError;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeTree {
        tracked: Vec<String>,
        untracked: Vec<String>,
        submodules: Vec<String>,
        broken: bool,
    }

    fn list(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn to_bytes(paths: &[String]) -> Vec<Vec<u8>> {
        paths.iter().map(|p| p.as_bytes().to_vec()).collect()
    }

    impl WorkTree for FakeTree {
        fn tracked_paths(&self) -> Result<Vec<Vec<u8>>> {
            if self.broken {
                return Err(FlatpackError::Oracle {
                    query: "ls-files",
                    source: git2::Error::from_str("boom"),
                });
            }
            Ok(to_bytes(&self.tracked))
        }

        fn untracked_paths(&self) -> Result<Vec<Vec<u8>>> {
            Ok(to_bytes(&self.untracked))
        }

        fn submodule_paths(&self) -> Result<Vec<Vec<u8>>> {
            Ok(to_bytes(&self.submodules))
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn paths(scope: &Scope) -> Vec<&str> {
        scope.records.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_collect_many_files_only_existing_included() {
        let temp = TempDir::new().unwrap();
        let many: Vec<String> = (0..3000).map(|i| format!("f{i}.txt")).collect();
        for name in &many[..50] {
            write(temp.path(), name, "x");
        }

        let tree = FakeTree {
            tracked: many,
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, false, &RuleSet::default()).unwrap();

        assert_eq!(scope.len(), 50);
        assert_eq!(scope.tracked_count, 50);
        assert_eq!(scope.untracked_count, 0);
    }

    #[test]
    fn test_collect_union_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        for rel in ["b.txt", "a/x.txt", "c.txt", "dup.txt"] {
            write(temp.path(), rel, "data");
        }

        let tree = FakeTree {
            tracked: list(&["c.txt", "a/x.txt", "dup.txt"]),
            untracked: list(&["b.txt", "dup.txt"]),
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, true, &RuleSet::default()).unwrap();

        assert_eq!(paths(&scope), vec!["a/x.txt", "b.txt", "c.txt", "dup.txt"]);
        assert_eq!(scope.tracked_count, 3);
        assert_eq!(scope.untracked_count, 1);

        let dup = scope.records.iter().find(|r| r.path == "dup.txt").unwrap();
        assert!(dup.tracked);
        let b = scope.records.iter().find(|r| r.path == "b.txt").unwrap();
        assert!(!b.tracked);
    }

    #[test]
    fn test_collect_skips_untracked_when_disabled() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "tracked.txt", "t");
        write(temp.path(), "new.txt", "n");

        let tree = FakeTree {
            tracked: list(&["tracked.txt"]),
            untracked: list(&["new.txt"]),
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, false, &RuleSet::default()).unwrap();

        assert_eq!(paths(&scope), vec!["tracked.txt"]);
        assert_eq!(scope.untracked_count, 0);
    }

    #[test]
    fn test_collect_submodule_is_placeholder() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        write(temp.path(), "sub/inner.txt", "not listed");
        write(temp.path(), "main.rs", "fn main() {}");

        let tree = FakeTree {
            tracked: list(&["main.rs", "sub"]),
            submodules: list(&["sub"]),
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, false, &RuleSet::default()).unwrap();

        assert_eq!(paths(&scope), vec!["main.rs", "sub"]);
        let sub = &scope.records[1];
        assert!(sub.submodule);
        assert!(sub.tracked);
        assert_eq!(sub.size, 0);
        assert_eq!(scope.tracked_count, 2);
    }

    #[test]
    fn test_collect_directory_rule_redacts_submodule() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let tree = FakeTree {
            tracked: list(&["sub"]),
            submodules: list(&["sub"]),
            ..Default::default()
        };
        let rules = RuleSet::from_lines(["sub/"]);
        let scope = collect(temp.path(), &tree, false, &rules).unwrap();

        assert!(scope.records[0].redaction.redact);
        assert_eq!(scope.records[0].redaction.reason, "glob:sub/");
    }

    #[test]
    fn test_collect_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();

        let tree = FakeTree {
            untracked: list(&["nested/"]),
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, true, &RuleSet::default()).unwrap();
        assert!(scope.is_empty());
    }

    #[test]
    fn test_collect_resolves_redaction_and_size() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "keys/prod.pem", "-----BEGIN-----");
        write(temp.path(), "src/lib.rs", "pub fn x() {}");

        let tree = FakeTree {
            tracked: list(&["keys/prod.pem", "src/lib.rs"]),
            ..Default::default()
        };
        let rules = RuleSet::from_lines(["*.pem"]);
        let scope = collect(temp.path(), &tree, true, &rules).unwrap();

        let pem = &scope.records[0];
        assert_eq!(pem.path, "keys/prod.pem");
        assert!(pem.redaction.redact);
        assert_eq!(pem.redaction.reason, "glob:*.pem");
        assert_eq!(pem.size, 15);
        assert_eq!(pem.file_name(), "prod.pem");

        let lib = &scope.records[1];
        assert!(!lib.redaction.redact);
        assert_eq!(lib.redaction.reason, "-");
    }

    #[test]
    fn test_collect_oracle_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let tree = FakeTree {
            broken: true,
            ..Default::default()
        };

        let result = collect(temp.path(), &tree, true, &RuleSet::default());
        assert!(matches!(result, Err(FlatpackError::Oracle { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_follows_symlinks_to_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "real.txt", "data");
        std::os::unix::fs::symlink(temp.path().join("real.txt"), temp.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("dangling"))
            .unwrap();

        let tree = FakeTree {
            untracked: list(&["real.txt", "link.txt", "dangling"]),
            ..Default::default()
        };
        let scope = collect(temp.path(), &tree, true, &RuleSet::default()).unwrap();

        assert_eq!(paths(&scope), vec!["link.txt", "real.txt"]);
        assert_eq!(scope.records[0].size, 4);
    }
}
