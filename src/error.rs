use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlatpackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not a Git repository.", .0.display())]
    NotInGitRepo(PathBuf),

    #[error("git {query} failed: {source}")]
    Oracle {
        query: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FlatpackError>;
