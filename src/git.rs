use crate::error::{FlatpackError, Result};
use git2::{Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Index mode of a gitlink (submodule) entry
const GITLINK_MODE: u32 = 0o160000;

/// Read-only listings of a working tree's paths.
///
/// Paths are repository-relative, `/`-separated raw bytes exactly as the
/// version-control tool reports them.
pub trait WorkTree {
    /// Every path in the index (`git ls-files`)
    fn tracked_paths(&self) -> Result<Vec<Vec<u8>>>;

    /// Untracked paths not excluded by ignore rules
    /// (`git ls-files --others --exclude-standard`)
    fn untracked_paths(&self) -> Result<Vec<Vec<u8>>>;

    /// Index entries that point at another repository
    fn submodule_paths(&self) -> Result<Vec<Vec<u8>>>;
}

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path` and resolve its top-level
    /// working directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(FlatpackError::NotADirectory(path.to_path_buf()));
        }

        let repo = Repository::discover(path)
            .map_err(|_| FlatpackError::NotInGitRepo(path.to_path_buf()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| FlatpackError::NotInGitRepo(path.to_path_buf()))?;
        let root = workdir.canonicalize()?;

        debug!("resolved repository root {}", root.display());
        Ok(Self { repo, root })
    }

    /// Top-level working directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_paths(&self, query: &'static str, gitlinks_only: bool) -> Result<Vec<Vec<u8>>> {
        let index = self
            .repo
            .index()
            .map_err(|source| FlatpackError::Oracle { query, source })?;

        Ok(index
            .iter()
            .filter(|entry| !gitlinks_only || entry.mode == GITLINK_MODE)
            .map(|entry| entry.path)
            .collect())
    }
}

impl WorkTree for GitRepo {
    fn tracked_paths(&self) -> Result<Vec<Vec<u8>>> {
        let paths = self.index_paths("ls-files", false)?;
        debug!("{} tracked paths", paths.len());
        Ok(paths)
    }

    fn untracked_paths(&self) -> Result<Vec<Vec<u8>>> {
        let query = "ls-files --others --exclude-standard";

        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|source| FlatpackError::Oracle { query, source })?;

        let paths: Vec<Vec<u8>> = statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .map(|entry| entry.path_bytes().to_vec())
            .collect();

        debug!("{} untracked paths", paths.len());
        Ok(paths)
    }

    fn submodule_paths(&self) -> Result<Vec<Vec<u8>>> {
        let paths = self.index_paths("ls-files --stage", true)?;
        debug!("{} submodule paths", paths.len());
        Ok(paths)
    }
}
