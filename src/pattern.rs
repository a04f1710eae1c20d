//! # Path Matching
//!
//! Gitignore-style pattern matching for repository-relative paths.
//!
//! ## Pattern Forms
//!
//! - **`/pattern`**: root-anchored, only ever compared with the full path
//! - **`pattern/`**: directory rule, matches everything below that directory
//! - **`/dir`**: no wildcard and no inner slash, treated like `/dir/`
//! - **`a/b*.txt`**: inner slash, compared with the full path
//! - **`*.txt`**: no slash, compared with the basename or the full path
//!
//! ## Glob Syntax
//!
//! | Token  | Matches                                                    |
//! |--------|------------------------------------------------------------|
//! | `*`    | any run of characters except `/`                           |
//! | `?`    | one character except `/`                                   |
//! | `[..]` | one character from the class (`!` or `^` negates)          |
//! | `**/`  | zero or more leading directories                           |
//! | `/**/` | zero or more inner directories                             |
//! | `/**`  | everything below the directory                             |
//! | `\x`   | the literal character `x`                                  |
//!
//! A `**` that is not a whole path segment behaves like `*`.
//!
//! Matching is a pure function of the pattern and the path; compiled
//! patterns hold no mutable state. A body that is not a valid glob (for
//! example an unclosed `[`) is reported and compared literally.

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

/// Strip every literal leading `./` from a path.
///
/// Leading dots that belong to a file name are kept, so `./.env` becomes
/// `.env`.
pub fn normalize_path(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

/// Check a single pattern against a path.
///
/// Compiles the pattern on every call. Use [`Pattern::new`] when the same
/// pattern is applied to many paths.
pub fn matches(path: &str, pattern: &str) -> bool {
    Pattern::new(pattern).matches(path)
}

/// A compiled gitignore-style pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    anchored: bool,
    dir_only: bool,
    has_slash: bool,
    has_wildcard: bool,
    glob: Glob,
}

impl Pattern {
    /// Compile a pattern, keeping the original text for reporting.
    pub fn new(text: &str) -> Self {
        let anchored = text.starts_with('/');
        let dir_only = text.ends_with('/');

        let mut body = text.trim_end_matches('/');
        if anchored {
            body = body.strip_prefix('/').unwrap_or(body);
        }

        Self {
            text: text.to_string(),
            anchored,
            dir_only,
            has_slash: body.contains('/'),
            has_wildcard: body.contains(['*', '?', '[', ']']),
            glob: Glob::compile(body),
        }
    }

    /// The pattern exactly as written in the rule file
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Decide whether this pattern selects the file at `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.matches_entry(path, false)
    }

    /// Decide whether this pattern selects `path`, which names a directory
    /// when `is_dir` is set (a submodule placeholder, for instance).
    pub fn matches_entry(&self, path: &str, is_dir: bool) -> bool {
        let path = normalize_path(path);

        if self.anchored {
            if self.dir_only || (!self.has_wildcard && !self.has_slash) {
                return directory_prefixes(path).any(|prefix| self.glob.matches(prefix));
            }
            return self.glob.matches(path);
        }

        if self.dir_only {
            return self.matches_inner_directory(path, is_dir);
        }

        if self.has_slash {
            return self.glob.matches(path);
        }

        let basename = path.rsplit('/').next().unwrap_or(path);
        self.glob.matches(basename) || self.glob.matches(path)
    }

    /// Unanchored directory rule: some run of consecutive directory segments
    /// must match the pattern. The final segment only counts for directories.
    fn matches_inner_directory(&self, path: &str, is_dir: bool) -> bool {
        let segments: Vec<&str> = path.split('/').collect();
        let dirs = if is_dir {
            &segments[..]
        } else {
            &segments[..segments.len() - 1]
        };

        (0..dirs.len()).any(|start| {
            (start + 1..=dirs.len()).any(|end| self.glob.matches(&dirs[start..end].join("/")))
        })
    }
}

/// `a/b/c` yields `a`, `a/b` and `a/b/c`.
fn directory_prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..idx])
        .chain(std::iter::once(path))
}

/// Glob matcher for a pattern body. `*` and `?` never cross `/`.
#[derive(Debug, Clone)]
enum Glob {
    Compiled(GlobMatcher),
    /// Body that does not compile as a glob; compared verbatim
    Literal(String),
}

impl Glob {
    fn compile(body: &str) -> Self {
        let built = GlobBuilder::new(body)
            .literal_separator(true)
            .backslash_escape(true)
            .build();

        match built {
            Ok(glob) => Glob::Compiled(glob.compile_matcher()),
            Err(err) => {
                warn!("invalid pattern {body:?}, matching it literally: {err}");
                Glob::Literal(body.to_string())
            }
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Glob::Compiled(matcher) => matcher.is_match(path),
            Glob::Literal(text) => text == path,
        }
    }
}
