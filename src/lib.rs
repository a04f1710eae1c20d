//! # flatpack
//!
//! Flatten a Git working tree into a single deterministic text stream: a
//! directory tree summary followed by one metadata/content block per file,
//! with gitignore-style content redaction.
//!
//! ## Features
//!
//! - **Deterministic output**: Paths are sorted, line endings are always `\n`
//! - **Scope from Git**: Tracked files, untracked files that are not ignored,
//!   and submodule placeholders
//! - **Redaction**: A `.flatpackredact` file withholds bodies while keeping the
//!   path, size and hash visible
//! - **Integrity**: Every file carries a SHA-256 of its on-disk content
//! - **Binary safe**: Non-UTF-8 content is emitted as base64
//!
//! ## Quick Start
//!
//! ```bash
//! # Flatten the current repository to stdout
//! flatpack
//!
//! # Flatten another repository into a file, tracked files only
//! flatpack --repo ../service -o service.txt --include-untracked=false
//!
//! # Preview what would be included or redacted
//! flatpack plan
//! ```
//!
//! ## Scope vs. Redaction
//!
//! - **Scope** decides which files appear at all (tree and metadata)
//! - **Redaction** hides bodies but keeps metadata
//!
//! ### Redaction Rules
//!
//! ```text
//! # .flatpackredact
//! *.pem
//! .env*
//! secrets/
//! !secrets/README.md
//! ```
//!
//! Rules follow gitignore conventions and the last matching rule wins.
//!
//! ## Data Flow
//!
//! ```text
//! .flatpackredact → rules → redact ← pattern
//!                              ↑
//! git index/status → scope ────┘ → tree + writer → stream
//! ```
//!
//! ## Module Overview
//!
//! - [`pattern`] - Gitignore-style path matching
//! - [`rules`] - Rule file parsing
//! - [`redact`] - Last-match-wins redaction decisions
//! - [`git`] - Repository discovery and path listings
//! - [`scope`] - Collection of the files in scope
//! - [`tree`] - ASCII tree rendering
//! - [`writer`] - Output stream and plan mode
//! - [`config`] - Settings from flags, environment and `.flatpack.toml`
//! - [`logging`] - Diagnostics on stderr
//! - [`error`] - Error types and unified error handling
//!
//! ## Testing
//!
//! ```bash
//! # Unit tests
//! cargo test --lib
//!
//! # End-to-end tests against real repositories
//! cargo test --test integration_test
//! cargo test --test edge_cases_test
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod pattern;
pub mod redact;
pub mod rules;
pub mod scope;
pub mod tree;
pub mod writer;

// Re-export commonly used types
pub use error::{FlatpackError, Result};
pub use git::{GitRepo, WorkTree};
pub use redact::{decide, decide_entry, Redaction};
pub use rules::RuleSet;
pub use scope::{collect, FileRecord, Scope};
