//! Finds camelCase and PascalCase identifiers in a source tree, reviews the
//! proposed snake_case renames, and rewrites the approved ones in place.
//!
//! The pipeline is strictly linear: [`scan_directory`] builds a
//! [`ChangeLedger`], a [`ReviewSession`] turns it into an [`ApprovalSet`], and
//! [`apply_plan`] rewrites the files named by a [`RewritePlan`].

use std::path::PathBuf;

pub mod classifier;
pub mod ledger;
pub mod review;
pub mod rewrite;
pub mod scanner;
pub mod words;

pub use classifier::{is_candidate, propose, to_snake_case};
pub use ledger::{CandidateRecord, ChangeLedger, FileOccurrences, Occurrence};
pub use review::{
    is_affirmative, ApprovalSet, Candidate, Decision, InvalidDecision, ReviewOutcome,
    ReviewSession, ReviewState, Reviewer,
};
pub use rewrite::{
    apply_plan, apply_plan_with_preview, apply_renames, Rename, Renamer, RewritePlan,
    RewriteReport,
};
pub use scanner::{
    scan_directory, ScanOptions, ScanOutcome, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXTENSIONS,
};

#[derive(thiserror::Error, Debug)]
pub enum SnakifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a directory: {path:?}")]
    InvalidRoot { path: PathBuf },
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
