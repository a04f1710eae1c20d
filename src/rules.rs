//! # Redaction Rules
//!
//! Parsing of the `.flatpackredact` rule file into an ordered [`RuleSet`].
//!
//! ## File Format
//!
//! ```text
//! # comments and blank lines are ignored
//! *.pem
//! secrets/
//! /config/prod.toml
//! !secrets/README.md
//! ```
//!
//! One pattern per line, gitignore style. A leading `!` turns the rule into an
//! exception that shows content again. Later lines override earlier ones.

use crate::pattern::Pattern;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the rule file looked up at the repository root
pub const REDACT_FILE_NAME: &str = ".flatpackredact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Redact,
    Unredact,
}

/// A single compiled rule from the rule file
#[derive(Debug, Clone)]
pub struct Rule {
    disposition: Disposition,
    pattern: Pattern,
}

impl Rule {
    pub fn new(disposition: Disposition, pattern: &str) -> Self {
        Self {
            disposition,
            pattern: Pattern::new(pattern),
        }
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Ordered redaction rules plus the provenance of the file they came from
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    source_hash: Option<String>,
}

impl RuleSet {
    /// Compile rule-file content. Invalid UTF-8 is replaced, never rejected.
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let rules = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match line.strip_prefix('!') {
                Some(rest) => {
                    let rest = rest.trim();
                    (!rest.is_empty()).then(|| Rule::new(Disposition::Unredact, rest))
                }
                None => Some(Rule::new(Disposition::Redact, line)),
            })
            .collect();

        Self {
            rules,
            source_hash: Some(hex::encode(Sha256::digest(raw))),
        }
    }

    /// Build a rule set from in-memory lines, without provenance.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            source_hash: None,
            ..Self::parse(joined.as_bytes())
        }
    }

    /// Load the rule file from the repository root.
    ///
    /// A missing file yields an empty set. An unreadable file is reported
    /// and also yields an empty set.
    pub fn load(repo_root: &Path) -> Self {
        let path = repo_root.join(REDACT_FILE_NAME);
        if !path.is_file() {
            debug!("no {REDACT_FILE_NAME} in {}", repo_root.display());
            return Self::default();
        }

        match fs::read(&path) {
            Ok(raw) => {
                let rules = Self::parse(&raw);
                debug!("loaded {} redaction rules", rules.len());
                rules
            }
            Err(err) => {
                warn!("cannot read {REDACT_FILE_NAME}: {err}");
                Self::default()
            }
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the rules came from a rule file on disk
    pub fn is_found(&self) -> bool {
        self.source_hash.is_some()
    }

    /// SHA-256 hex digest of the raw rule file
    pub fn source_hash(&self) -> Option<&str> {
        self.source_hash.as_deref()
    }
}
