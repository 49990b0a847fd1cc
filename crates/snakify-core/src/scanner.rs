use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::classifier;
use crate::ledger::{ChangeLedger, Occurrence};
use crate::words;
use crate::SnakifyError;

pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".html", ".css"];

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "vendor",
    ".vscode",
    ".idea",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File name suffixes to scan, each with a leading dot.
    pub extensions: Vec<String>,
    /// Directory names pruned from traversal wherever they appear.
    pub excluded_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    pub fn new<E, D>(extensions: E, excluded_dirs: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
            excluded_dirs: excluded_dirs
                .into_iter()
                .map(|d| d.as_ref().to_string())
                .collect(),
        }
    }

    fn wants_file(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.excluded_dirs.iter().any(|d| d == name))
    }
}

/// Adds the leading dot to an extension given as `js`.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

pub struct ScanOutcome {
    pub ledger: ChangeLedger,
    pub files_scanned: usize,
    /// Files that matched the allowlist but could not be read.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Walks `root` and builds the ledger of every camelCase/PascalCase
/// identifier found in matching files.
///
/// Unreadable files and traversal errors are logged and skipped; only an
/// invalid root aborts the scan.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<ScanOutcome> {
    if !root.is_dir() {
        return Err(SnakifyError::InvalidRoot {
            path: root.to_path_buf(),
        }
        .into());
    }

    info!("Scanning directory: {:?}", root);

    let mut outcome = ScanOutcome {
        ledger: ChangeLedger::new(),
        files_scanned: 0,
        skipped: Vec::new(),
    };

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let excluded = options.is_excluded_dir(e);
            if excluded {
                debug!("Pruning excluded directory: {:?}", e.path());
            }
            !excluded
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        if !is_file_entry(&entry) {
            continue;
        }

        let wanted = entry
            .file_name()
            .to_str()
            .is_some_and(|name| options.wants_file(name));
        if !wanted {
            continue;
        }

        let path = entry.path();
        match fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                scan_content(path, &content, &mut outcome.ledger);
                outcome.files_scanned += 1;
            }
            Err(e) => {
                warn!("Could not read {:?}: {}", path, e);
                outcome.skipped.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    info!(
        "Scan complete: {} files scanned, {} unique identifiers to review",
        outcome.files_scanned,
        outcome.ledger.len()
    );

    Ok(outcome)
}

/// Regular files, plus symlinks that do not resolve to a directory.
/// Directory links are never followed; a dangling link is kept so the read
/// failure is reported.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

/// Records every candidate identifier in `content` against `file`.
pub fn scan_content(file: &Path, content: &str, ledger: &mut ChangeLedger) {
    debug!("Scanning file: {:?}", file);

    let proposals: BTreeMap<&str, String> = words::distinct_tokens(content)
        .into_iter()
        .filter_map(|token| classifier::propose(token).map(|proposed| (token, proposed)))
        .collect();

    if proposals.is_empty() {
        return;
    }

    let mut occurrences: BTreeMap<&str, Vec<Occurrence>> = BTreeMap::new();
    for (index, line) in content.lines().enumerate() {
        let mut seen_on_line: Vec<&str> = Vec::new();
        for token in words::tokens(line) {
            if proposals.contains_key(token) && !seen_on_line.contains(&token) {
                seen_on_line.push(token);
                occurrences.entry(token).or_default().push(Occurrence {
                    line_number: index + 1,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    for (token, proposed) in &proposals {
        let lines = occurrences.remove(token).unwrap_or_default();
        ledger.record(token, proposed, file, lines);
    }
}
