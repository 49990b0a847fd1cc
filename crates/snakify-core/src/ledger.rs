use std::collections::btree_map::{self, BTreeMap};
use std::path::{Path, PathBuf};

/// A single line that mentions an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// 1-indexed line number.
    pub line_number: usize,
    /// Line text with surrounding whitespace trimmed, for display only.
    pub text: String,
}

/// Every line in one file where an identifier appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOccurrences {
    pub file: PathBuf,
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub proposed: String,
    pub locations: Vec<FileOccurrences>,
}

impl CandidateRecord {
    fn new(proposed: &str) -> Self {
        Self {
            proposed: proposed.to_string(),
            locations: Vec::new(),
        }
    }

    pub fn occurrence_count(&self) -> usize {
        self.locations.iter().map(|l| l.occurrences.len()).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.locations.iter().map(|l| l.file.as_path())
    }
}

/// Every rename candidate discovered in a tree, keyed by original identifier.
///
/// Iteration is in lexicographic order of the original spelling, which is the
/// order candidates are reviewed in.
#[derive(Debug, Default, Clone)]
pub struct ChangeLedger {
    entries: BTreeMap<String, CandidateRecord>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `original`, creating it with `proposed` the first
    /// time the identifier is seen. Existing records are never replaced.
    pub fn entry_or_insert(&mut self, original: &str, proposed: &str) -> &mut CandidateRecord {
        self.entries
            .entry(original.to_string())
            .or_insert_with(|| CandidateRecord::new(proposed))
    }

    /// Appends the occurrences found in `file` to the record for `original`.
    /// Empty occurrence lists are ignored so a file is never listed without lines.
    pub fn record(
        &mut self,
        original: &str,
        proposed: &str,
        file: &Path,
        occurrences: Vec<Occurrence>,
    ) {
        if occurrences.is_empty() {
            return;
        }
        self.entry_or_insert(original, proposed)
            .locations
            .push(FileOccurrences {
                file: file.to_path_buf(),
                occurrences,
            });
    }

    pub fn get(&self, original: &str) -> Option<&CandidateRecord> {
        self.entries.get(original)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_occurrences(&self) -> usize {
        self.entries.values().map(CandidateRecord::occurrence_count).sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CandidateRecord> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeLedger {
    type Item = (&'a String, &'a CandidateRecord);
    type IntoIter = btree_map::Iter<'a, String, CandidateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
