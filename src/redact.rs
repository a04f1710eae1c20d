//! Redaction decisions: the last matching rule wins.

use crate::pattern::normalize_path;
use crate::rules::{Disposition, RuleSet};
use std::fmt;

/// Outcome of applying a [`RuleSet`] to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub redact: bool,
    pub reason: String,
}

impl Redaction {
    /// Content is shown and no rule was involved
    pub fn included() -> Self {
        Self {
            redact: false,
            reason: "-".into(),
        }
    }

    /// Content is shown because an exception rule matched last
    pub fn is_negated(&self) -> bool {
        !self.redact && self.reason.starts_with("negate:!")
    }
}

impl fmt::Display for Redaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.redact {
            write!(f, "[redact:{}]", self.reason)
        } else {
            f.write_str("[inc]")
        }
    }
}

/// Decide whether the file at `path` has its content withheld.
pub fn decide(path: &str, rules: &RuleSet) -> Redaction {
    decide_entry(path, false, rules)
}

/// Like [`decide`], for an entry that may be a directory. Directory rules
/// such as `vendor/` then also select the entry itself.
pub fn decide_entry(path: &str, is_dir: bool, rules: &RuleSet) -> Redaction {
    let path = normalize_path(path);

    let Some(rule) = rules
        .iter()
        .rev()
        .find(|rule| rule.pattern().matches_entry(path, is_dir))
    else {
        return Redaction::included();
    };

    let pattern = rule.pattern().as_str();
    match rule.disposition() {
        Disposition::Redact => Redaction {
            redact: true,
            reason: format!("glob:{pattern}"),
        },
        Disposition::Unredact => Redaction {
            redact: false,
            reason: format!("negate:!{}", pattern.trim_start_matches('!')),
        },
    }
}
