//! Reads documents from disk and feeds them into a [`SearchIndex`].
//!
//! Plain files become one document each, named by their path. `.jsonl`
//! files hold one `{"name": .., "text": ..}` object per line. Anything that
//! cannot be read or parsed is logged and skipped; only a missing corpus
//! root is an error.

use anyhow::{bail, Result};
use search_core::SearchIndex;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// File extensions to load, without the dot. Empty means every file.
    pub extensions: Vec<String>,
    /// Stop after this many files.
    pub limit: Option<usize>,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self { extensions: vec!["txt".into(), "jsonl".into()], limit: None, recursive: false }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Files visited.
    pub files: usize,
    /// Documents added to the index.
    pub indexed: usize,
    /// Files or records that could not be read.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct JsonlDoc {
    name: String,
    text: String,
}

/// List corpus files under `root` in file-name order, so doc ids are stable across runs.
pub fn collect_files(root: &Path, opts: &CorpusOptions) -> Result<Vec<PathBuf>> {
    if opts.limit == Some(0) {
        return Ok(Vec::new());
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        bail!("corpus path {} is neither a file nor a directory", root.display());
    }

    let max_depth = if opts.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        if opts.limit.is_some_and(|limit| files.len() >= limit) {
            break;
        }
        if !entry.file_type().is_file() || !has_extension(entry.path(), &opts.extensions) {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Load every corpus file under `root` into `index`.
pub fn load_into(index: &mut SearchIndex, root: &Path, opts: &CorpusOptions) -> Result<LoadReport> {
    let files = collect_files(root, opts)?;
    let mut report = LoadReport { files: files.len(), ..LoadReport::default() };
    for path in &files {
        if is_jsonl(path) {
            load_jsonl(index, path, &mut report);
        } else {
            load_text(index, path, &mut report);
        }
    }
    tracing::info!(
        root = %root.display(),
        files = report.files,
        indexed = report.indexed,
        skipped = report.skipped,
        num_terms = index.num_terms(),
        "corpus loaded"
    );
    Ok(report)
}

fn load_text(index: &mut SearchIndex, path: &Path, report: &mut LoadReport) {
    match fs::read_to_string(path) {
        Ok(text) => {
            index.index_document(&text, path.display().to_string());
            report.indexed += 1;
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
            report.skipped += 1;
        }
    }
}

fn load_jsonl(index: &mut SearchIndex, path: &Path, report: &mut LoadReport) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
            report.skipped += 1;
            return;
        }
    };
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                tracing::warn!(path = %path.display(), line = lineno + 1, %err, "skipping unreadable line");
                report.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() { continue; }
        match serde_json::from_str::<JsonlDoc>(&line) {
            Ok(doc) => {
                index.index_document(&doc.text, doc.name);
                report.indexed += 1;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), line = lineno + 1, %err, "skipping malformed record");
                report.skipped += 1;
            }
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        let exts = vec!["txt".to_string(), ".jsonl".to_string()];
        assert!(has_extension(Path::new("a/B.TXT"), &exts));
        assert!(has_extension(Path::new("c.jsonl"), &exts));
        assert!(!has_extension(Path::new("d.md"), &exts));
        assert!(!has_extension(Path::new("noext"), &exts));
        assert!(has_extension(Path::new("noext"), &[]));
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = collect_files(Path::new("/definitely/not/here"), &CorpusOptions::default());
        assert!(err.is_err());
    }
}
