//! # Stream Writer
//!
//! Produces the flattened text stream.
//!
//! ## Layout
//!
//! ```text
//! ===== REPO TREE =====
//! Root: <repo-root-basename>
//! Files: <n>   Tracked: <n>   Untracked: <n>
//! Legend: [T]=tracked [U]=untracked [inc]=included [redact:<reason>]=redacted
//!
//! <tree lines>
//! ===== END TREE =====
//!
//! Redact-File: .flatpackredact (found|absent)
//! Redact-File-Hash: sha256:<hex>|-
//! Resolved:
//!   include_untracked = true|false
//!
//! ===== BEGIN FILE =====
//! Path: <relative/path>
//! Mode: text|binary
//! Encoding: utf-8|base64
//! Size: <bytes>
//! Redacted: yes|no
//! Redact-Reason: <reason>|-
//! Hash: sha256:<hex>|-
//! ----- CONTENT -----
//! <body>
//! ===== END FILE =====
//! ```
//!
//! Every top-level block is followed by one blank line. Lines always end in
//! `\n`, whatever the host convention.
//!
//! ## Content Rules
//!
//! - The hash is a streaming SHA-256 of the file on disk and is computed for
//!   redacted files too
//! - Bodies that are valid UTF-8 are written verbatim, anything else as
//!   standard base64
//! - Redacted and unreadable files get an empty body
//! - Bodies always end with a newline

use crate::config::Settings;
use crate::error::Result;
use crate::rules::{RuleSet, REDACT_FILE_NAME};
use crate::scope::{FileRecord, Scope};
use crate::tree;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::warn;

pub const TREE_BEGIN: &str = "===== REPO TREE =====";
pub const TREE_END: &str = "===== END TREE =====";
pub const SEP_BEGIN: &str = "===== BEGIN FILE =====";
pub const SEP_CONTENT: &str = "----- CONTENT -----";
pub const SEP_END: &str = "===== END FILE =====";

/// Read size for streaming hashes
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Reason reported for files whose body could not be read
pub const UNREADABLE_REASON: &str = "unreadable";

/// Write the tree block followed by the redaction/configuration header.
pub fn write_tree_and_header<W: Write + ?Sized>(
    out: &mut W,
    repo_root: &Path,
    scope: &Scope,
    rules: &RuleSet,
    settings: &Settings,
) -> Result<()> {
    let root_name = repo_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string());

    writeln!(out, "{TREE_BEGIN}")?;
    writeln!(out, "Root: {root_name}")?;
    writeln!(
        out,
        "Files: {}   Tracked: {}   Untracked: {}",
        scope.len(),
        scope.tracked_count,
        scope.untracked_count
    )?;
    writeln!(
        out,
        "Legend: [T]=tracked [U]=untracked [inc]=included [redact:<reason>]=redacted"
    )?;
    writeln!(out)?;
    out.write_all(tree::render(&scope.records).as_bytes())?;
    writeln!(out, "{TREE_END}")?;
    writeln!(out)?;

    let (presence, hash) = match rules.source_hash() {
        Some(hex) => ("found", format!("sha256:{hex}")),
        None => ("absent", "-".to_string()),
    };
    writeln!(out, "Redact-File: {REDACT_FILE_NAME} ({presence})")?;
    writeln!(out, "Redact-File-Hash: {hash}")?;
    writeln!(out, "Resolved:")?;
    writeln!(out, "  include_untracked = {}", settings.include_untracked)?;
    writeln!(out)?;

    Ok(())
}

/// Write the full stream: tree, header and one block per record.
pub fn write_dump<W: Write + ?Sized>(
    out: &mut W,
    repo_root: &Path,
    scope: &Scope,
    rules: &RuleSet,
    settings: &Settings,
) -> Result<()> {
    write_tree_and_header(out, repo_root, scope, rules, settings)?;
    for record in &scope.records {
        write_file_block(out, record)?;
    }
    Ok(())
}

/// Write the tree, header and one decision line per record.
///
/// Nothing is hashed and no file content is read.
pub fn write_plan<W: Write + ?Sized>(
    out: &mut W,
    repo_root: &Path,
    scope: &Scope,
    rules: &RuleSet,
    settings: &Settings,
) -> Result<()> {
    write_tree_and_header(out, repo_root, scope, rules, settings)?;
    for record in &scope.records {
        let redaction = &record.redaction;
        if redaction.redact {
            writeln!(out, "[redact:{}] {}", redaction.reason, record.path)?;
        } else if redaction.is_negated() {
            writeln!(out, "[include:{}] {}", redaction.reason, record.path)?;
        } else {
            writeln!(out, "[include] {}", record.path)?;
        }
    }
    Ok(())
}

struct BlockHeader<'a> {
    path: &'a str,
    binary: bool,
    size: u64,
    redacted: bool,
    reason: &'a str,
    hash: &'a str,
}

impl BlockHeader<'_> {
    fn write<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let (mode, encoding) = if self.binary {
            ("binary", "base64")
        } else {
            ("text", "utf-8")
        };
        writeln!(out, "{SEP_BEGIN}")?;
        writeln!(out, "Path: {}", self.path)?;
        writeln!(out, "Mode: {mode}")?;
        writeln!(out, "Encoding: {encoding}")?;
        writeln!(out, "Size: {}", self.size)?;
        writeln!(out, "Redacted: {}", if self.redacted { "yes" } else { "no" })?;
        writeln!(out, "Redact-Reason: {}", self.reason)?;
        writeln!(out, "Hash: {}", self.hash)?;
        writeln!(out, "{SEP_CONTENT}")
    }
}

/// Write one file block.
///
/// Hash and body read failures are reported and degrade the block; only
/// failures of `out` itself are returned.
pub fn write_file_block<W: Write + ?Sized>(out: &mut W, record: &FileRecord) -> Result<()> {
    let hash = if record.submodule {
        "-".to_string()
    } else {
        match sha256_file(&record.location) {
            Ok(hex) => format!("sha256:{hex}"),
            Err(err) => {
                warn!("cannot hash {}: {err}", record.path);
                "-".to_string()
            }
        }
    };

    let mut header = BlockHeader {
        path: &record.path,
        binary: true,
        size: record.size,
        redacted: true,
        reason: &record.redaction.reason,
        hash: &hash,
    };

    if record.redaction.redact || record.submodule {
        if !record.redaction.redact {
            header.redacted = false;
            header.reason = "-";
        }
        header.write(out)?;
        writeln!(out, "{SEP_END}")?;
        writeln!(out)?;
        return Ok(());
    }

    let data = match fs::read(&record.location) {
        Ok(data) => data,
        Err(err) => {
            warn!("cannot read {}: {err}", record.path);
            header.reason = UNREADABLE_REASON;
            header.write(out)?;
            writeln!(out, "{SEP_END}")?;
            writeln!(out)?;
            return Ok(());
        }
    };

    header.size = data.len() as u64;
    header.redacted = false;
    header.reason = "-";

    match std::str::from_utf8(&data) {
        Ok(text) => {
            header.binary = false;
            header.write(out)?;
            write_body(out, text)?;
        }
        Err(_) => {
            header.write(out)?;
            write_body(out, &STANDARD.encode(&data))?;
        }
    }

    writeln!(out, "{SEP_END}")?;
    writeln!(out)?;
    Ok(())
}

fn write_body<W: Write + ?Sized>(out: &mut W, body: &str) -> io::Result<()> {
    out.write_all(body.as_bytes())?;
    if !body.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Streaming SHA-256 of a file on disk, as lowercase hex.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
