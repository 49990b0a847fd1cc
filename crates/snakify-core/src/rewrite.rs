use anyhow::Result;
use regex::bytes::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::ledger::ChangeLedger;
use crate::review::ApprovalSet;
use crate::words;
use crate::SnakifyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub original: String,
    pub proposed: String,
}

/// Whole-word substitution of several renames in a single pass.
///
/// Every match is replaced exactly once, so a proposed spelling is never
/// matched again by another rename. Content is handled as bytes, so files
/// that are not valid UTF-8 keep their other bytes untouched.
pub struct Renamer {
    pattern: Regex,
    replacements: HashMap<Vec<u8>, Vec<u8>>,
}

impl Renamer {
    pub fn new(renames: &[Rename]) -> Result<Option<Self>, SnakifyError> {
        if renames.is_empty() {
            return Ok(None);
        }
        let pattern =
            words::whole_word_bytes_pattern(renames.iter().map(|r| r.original.as_str()))?;
        let replacements = renames
            .iter()
            .map(|r| (r.original.as_bytes().to_vec(), r.proposed.as_bytes().to_vec()))
            .collect();
        Ok(Some(Self {
            pattern,
            replacements,
        }))
    }

    /// Returns the rewritten content and the number of replacements made, or
    /// `None` when nothing matched.
    pub fn apply(&self, content: &[u8]) -> Option<(Vec<u8>, usize)> {
        let mut count = 0;
        let rewritten = self.pattern.replace_all(content, |caps: &Captures| {
            let matched = &caps[0];
            count += 1;
            self.replacements
                .get(matched)
                .cloned()
                .unwrap_or_else(|| matched.to_vec())
        });
        if count == 0 {
            None
        } else {
            Some((rewritten.into_owned(), count))
        }
    }
}

/// Applies `renames` to `content` as whole-word replacements in one pass.
pub fn apply_renames(content: &[u8], renames: &[Rename]) -> Result<Option<(Vec<u8>, usize)>> {
    Ok(Renamer::new(renames)?.and_then(|renamer| renamer.apply(content)))
}

/// Approved renames grouped by the files they were found in.
#[derive(Debug, Default)]
pub struct RewritePlan {
    files: BTreeMap<PathBuf, Vec<Rename>>,
}

impl RewritePlan {
    pub fn new(ledger: &ChangeLedger, approvals: &ApprovalSet) -> Self {
        let mut files: BTreeMap<PathBuf, Vec<Rename>> = BTreeMap::new();
        for (original, proposed) in approvals {
            let Some(record) = ledger.get(original) else {
                warn!("Approved identifier {} is not in the ledger", original);
                continue;
            };
            for file in record.files() {
                files.entry(file.to_path_buf()).or_default().push(Rename {
                    original: original.clone(),
                    proposed: proposed.clone(),
                });
            }
        }
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = (&Path, &[Rename])> {
        self.files.iter().map(|(p, r)| (p.as_path(), r.as_slice()))
    }

    pub fn renames_for(&self, file: &Path) -> Option<&[Rename]> {
        self.files.get(file).map(Vec::as_slice)
    }
}

#[derive(Debug, Default)]
pub struct RewriteReport {
    pub files_updated: usize,
    pub files_unchanged: usize,
    pub replacements: usize,
    pub failures: Vec<(PathBuf, String)>,
}

/// Rewrites every file in `plan` in place.
pub fn apply_plan(plan: &RewritePlan, dry_run: bool) -> RewriteReport {
    apply_plan_with_preview(plan, dry_run, |_, _, _| {})
}

/// Rewrites every file in `plan`, calling `preview` with the old and new
/// content of each file before it is written. Preview text is decoded
/// lossily; the file itself is rewritten byte for byte.
///
/// Each file is re-read from disk, so edits made since scanning are kept.
/// Failures are recorded per file and never stop the remaining files.
pub fn apply_plan_with_preview<F>(
    plan: &RewritePlan,
    dry_run: bool,
    mut preview: F,
) -> RewriteReport
where
    F: FnMut(&Path, &str, &str),
{
    let mut report = RewriteReport::default();

    for (file, renames) in plan.files() {
        match rewrite_file(file, renames, dry_run, &mut preview) {
            Ok(Some(count)) => {
                report.files_updated += 1;
                report.replacements += count;
            }
            Ok(None) => {
                debug!("No remaining occurrences in {:?}", file);
                report.files_unchanged += 1;
            }
            Err(e) => {
                warn!("Failed to update {:?}: {}", file, e);
                report.failures.push((file.to_path_buf(), e.to_string()));
            }
        }
    }

    info!(
        "Rewrite complete: {} files updated, {} replacements, {} failures",
        report.files_updated,
        report.replacements,
        report.failures.len()
    );

    report
}

fn rewrite_file<F>(
    file: &Path,
    renames: &[Rename],
    dry_run: bool,
    preview: &mut F,
) -> Result<Option<usize>, SnakifyError>
where
    F: FnMut(&Path, &str, &str),
{
    let content = fs::read(file)?;
    let Some((rewritten, count)) = Renamer::new(renames)?.and_then(|r| r.apply(&content)) else {
        return Ok(None);
    };

    preview(
        file,
        &String::from_utf8_lossy(&content),
        &String::from_utf8_lossy(&rewritten),
    );

    if dry_run {
        info!("Would update {:?} ({} replacements)", file, count);
    } else {
        fs::write(file, rewritten)?;
        info!("Updated {:?} ({} replacements)", file, count);
    }

    Ok(Some(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Occurrence;

    fn rename(original: &str, proposed: &str) -> Rename {
        Rename {
            original: original.to_string(),
            proposed: proposed.to_string(),
        }
    }

    fn rewrite(content: &str, renames: &[Rename]) -> Option<(String, usize)> {
        apply_renames(content.as_bytes(), renames)
            .unwrap()
            .map(|(bytes, count)| (String::from_utf8(bytes).unwrap(), count))
    }

    #[test]
    fn test_whole_word_replacement() {
        let renames = [rename("foo", "bar")];
        let (result, count) = rewrite("foo fooBar myFoo foo_x (foo)", &renames).unwrap();
        assert_eq!(result, "bar fooBar myFoo foo_x (bar)");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_multiple_occurrences_on_one_line() {
        let renames = [rename("myVar", "my_var")];
        let (result, count) = rewrite("myVar = myVar + myVar;\n", &renames).unwrap();
        assert_eq!(result, "my_var = my_var + my_var;\n");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_no_chained_substitution() {
        // The output of the first rename is the input of the second.
        let renames = [rename("fooBar", "bazQux"), rename("bazQux", "baz_qux")];
        let (result, _) = rewrite("fooBar bazQux", &renames).unwrap();
        assert_eq!(result, "bazQux baz_qux");
    }

    #[test]
    fn test_no_match_returns_none() {
        let renames = [rename("myVar", "my_var")];
        assert!(rewrite("nothing here myVariable", &renames).is_none());
        assert!(rewrite("myVar", &[]).is_none());
    }

    #[test]
    fn test_invalid_utf8_bytes_are_preserved() {
        let renames = [rename("myVar", "my_var")];
        let (result, count) = apply_renames(b"// caf\xe9\nvar myVar = 1;\n", &renames)
            .unwrap()
            .unwrap();
        assert_eq!(result, b"// caf\xe9\nvar my_var = 1;\n".to_vec());
        assert_eq!(count, 1);
    }

    #[test]
    fn test_plan_groups_by_file() {
        let mut ledger = ChangeLedger::new();
        let occ = || {
            vec![Occurrence {
                line_number: 1,
                text: String::new(),
            }]
        };
        ledger.record("myVar", "my_var", Path::new("a.js"), occ());
        ledger.record("myVar", "my_var", Path::new("b.js"), occ());
        ledger.record("otherVar", "other_var", Path::new("a.js"), occ());

        let mut approvals = ApprovalSet::new();
        approvals.insert("myVar".to_string(), "my_var".to_string());
        approvals.insert("otherVar".to_string(), "other_var".to_string());

        let plan = RewritePlan::new(&ledger, &approvals);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.renames_for(Path::new("a.js")).unwrap().len(), 2);
        assert_eq!(
            plan.renames_for(Path::new("b.js")).unwrap(),
            &[rename("myVar", "my_var")]
        );
    }

    #[test]
    fn test_plan_only_includes_approved() {
        let mut ledger = ChangeLedger::new();
        let occ = vec![Occurrence {
            line_number: 1,
            text: String::new(),
        }];
        ledger.record("otherVar", "other_var", Path::new("a.js"), occ);

        let plan = RewritePlan::new(&ledger, &ApprovalSet::new());
        assert!(plan.is_empty());
    }
}
