//! ASCII rendering of the records in scope.

use crate::scope::FileRecord;
use std::collections::BTreeMap;
use std::fmt::Write;

const BRANCH: &str = "├── ";
const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

#[derive(Default)]
struct DirNode<'a> {
    dirs: BTreeMap<&'a str, DirNode<'a>>,
    files: Vec<&'a FileRecord>,
}

impl<'a> DirNode<'a> {
    fn build(records: &'a [FileRecord]) -> Self {
        let mut root = DirNode::default();
        for record in records {
            let mut parts: Vec<&str> = record.path.split('/').collect();
            parts.pop();

            let mut node = &mut root;
            for part in parts {
                node = node.dirs.entry(part).or_default();
            }
            node.files.push(record);
        }
        root
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let mut files = self.files.clone();
        files.sort_by(|a, b| a.file_name().cmp(b.file_name()));

        let total = self.dirs.len() + files.len();
        let mut idx = 0;

        for (name, child) in &self.dirs {
            idx += 1;
            let last = idx == total;
            let _ = writeln!(out, "{prefix}{}{name}/", if last { ELBOW } else { BRANCH });
            child.render(&format!("{prefix}{}", if last { BLANK } else { PIPE }), out);
        }

        for record in files {
            idx += 1;
            let connector = if idx == total { ELBOW } else { BRANCH };
            let tag = if record.tracked { "[T]" } else { "[U]" };
            let _ = writeln!(
                out,
                "{prefix}{connector}{} {tag} {} ({})",
                record.file_name(),
                record.redaction,
                human_size(record.size)
            );
        }
    }
}

/// Render records as a tree: directories first, then files, each sorted by
/// name.
pub fn render(records: &[FileRecord]) -> String {
    let mut out = String::new();
    DirNode::build(records).render("", &mut out);
    out
}

/// Format a byte count with binary units: `27B`, `1.5KB`, `1.0MB`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}
