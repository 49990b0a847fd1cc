use anyhow::Result;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

use crate::ledger::{CandidateRecord, ChangeLedger};

/// Approved renames, original identifier to proposed identifier.
pub type ApprovalSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
    ApproveAll,
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid answer '{0}', expected y, n, a, or q")]
pub struct InvalidDecision(pub String);

impl FromStr for Decision {
    type Err = InvalidDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Decision::Approve),
            "n" | "no" => Ok(Decision::Reject),
            "a" | "all" => Ok(Decision::ApproveAll),
            "q" | "quit" => Ok(Decision::Abort),
            _ => Err(InvalidDecision(s.to_string())),
        }
    }
}

/// Only `y` and `yes` confirm; anything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Prompting(usize),
    AutoApplyRemaining(usize),
    Aborted,
    Completed,
}

impl ReviewState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewState::Aborted | ReviewState::Completed)
    }
}

/// One candidate as shown to the operator.
pub struct Candidate<'a> {
    pub index: usize,
    pub total: usize,
    pub original: &'a str,
    pub record: &'a CandidateRecord,
}

/// Terminal side of a review: renders candidates and collects raw answers.
pub trait Reviewer {
    fn present(&mut self, candidate: &Candidate<'_>) -> Result<()>;

    /// Reads the operator's answer for the candidate last presented.
    fn ask(&mut self, candidate: &Candidate<'_>) -> Result<String>;

    fn invalid_answer(&mut self, error: &InvalidDecision) -> Result<()>;

    fn auto_approved(&mut self, _candidate: &Candidate<'_>) -> Result<()> {
        Ok(())
    }

    fn rejected(&mut self, _candidate: &Candidate<'_>) -> Result<()> {
        Ok(())
    }

    fn aborted(&mut self) -> Result<()> {
        Ok(())
    }

    /// Final gate before any file is written. The raw answer is passed
    /// through [`is_affirmative`].
    fn confirm_write(&mut self, approvals: &ApprovalSet) -> Result<String>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    NothingToReview,
    NoneApproved,
    Declined { approved: usize },
    Confirmed(ApprovalSet),
}

/// Sequential walk over a ledger collecting approvals.
pub struct ReviewSession<'a> {
    candidates: Vec<(&'a String, &'a CandidateRecord)>,
    state: ReviewState,
    approvals: ApprovalSet,
}

impl<'a> ReviewSession<'a> {
    pub fn new(ledger: &'a ChangeLedger) -> Self {
        let candidates: Vec<_> = ledger.iter().collect();
        let state = if candidates.is_empty() {
            ReviewState::Completed
        } else {
            ReviewState::Prompting(0)
        };
        Self {
            candidates,
            state,
            approvals: ApprovalSet::new(),
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn approvals(&self) -> &ApprovalSet {
        &self.approvals
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidate at the current position, if the session is not finished.
    pub fn current(&self) -> Option<Candidate<'a>> {
        let index = match self.state {
            ReviewState::Prompting(i) | ReviewState::AutoApplyRemaining(i) => i,
            ReviewState::Aborted | ReviewState::Completed => return None,
        };
        let (original, record) = self.candidates[index];
        Some(Candidate {
            index,
            total: self.candidates.len(),
            original: original.as_str(),
            record,
        })
    }

    /// Applies a decision to the candidate being prompted and advances.
    /// Decisions are ignored outside the `Prompting` state.
    pub fn decide(&mut self, decision: Decision) {
        let ReviewState::Prompting(index) = self.state else {
            return;
        };
        match decision {
            Decision::Approve => {
                self.approve(index);
                self.state = self.advance(index, false);
            }
            Decision::Reject => {
                self.state = self.advance(index, false);
            }
            Decision::ApproveAll => {
                self.approve(index);
                self.state = self.advance(index, true);
            }
            Decision::Abort => {
                self.state = ReviewState::Aborted;
            }
        }
    }

    /// Approves the current candidate while auto-applying.
    pub fn auto_approve(&mut self) {
        if let ReviewState::AutoApplyRemaining(index) = self.state {
            self.approve(index);
            self.state = self.advance(index, true);
        }
    }

    fn approve(&mut self, index: usize) {
        let (original, record) = self.candidates[index];
        debug!("Approved: {} -> {}", original, record.proposed);
        self.approvals
            .insert(original.clone(), record.proposed.clone());
    }

    fn advance(&self, index: usize, auto: bool) -> ReviewState {
        let next = index + 1;
        if next >= self.candidates.len() {
            ReviewState::Completed
        } else if auto {
            ReviewState::AutoApplyRemaining(next)
        } else {
            ReviewState::Prompting(next)
        }
    }

    /// Drives the session to a terminal state, then asks the final write
    /// confirmation when anything was approved.
    pub fn run<R: Reviewer>(mut self, reviewer: &mut R) -> Result<ReviewOutcome> {
        if self.is_empty() {
            info!("No convertible identifiers found");
            return Ok(ReviewOutcome::NothingToReview);
        }

        while let Some(candidate) = self.current() {
            reviewer.present(&candidate)?;

            if let ReviewState::AutoApplyRemaining(_) = self.state {
                reviewer.auto_approved(&candidate)?;
                self.auto_approve();
                continue;
            }

            let decision = loop {
                let answer = reviewer.ask(&candidate)?;
                match answer.parse::<Decision>() {
                    Ok(decision) => break decision,
                    Err(e) => reviewer.invalid_answer(&e)?,
                }
            };

            match decision {
                Decision::Reject => reviewer.rejected(&candidate)?,
                Decision::Abort => reviewer.aborted()?,
                Decision::Approve | Decision::ApproveAll => {}
            }
            self.decide(decision);
        }

        info!(
            "Review finished ({:?}) with {} approved change(s)",
            self.state,
            self.approvals.len()
        );

        if self.approvals.is_empty() {
            return Ok(ReviewOutcome::NoneApproved);
        }

        let answer = reviewer.confirm_write(&self.approvals)?;
        if is_affirmative(&answer) {
            Ok(ReviewOutcome::Confirmed(self.approvals))
        } else {
            info!("Write declined, discarding {} approval(s)", self.approvals.len());
            Ok(ReviewOutcome::Declined {
                approved: self.approvals.len(),
            })
        }
    }
}
