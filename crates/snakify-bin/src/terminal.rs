use anyhow::Result;
use inquire::{InquireError, Text};
use regex::Regex;
use snakify_core::words::whole_word_pattern;
use snakify_core::{ApprovalSet, Candidate, InvalidDecision, Reviewer};

use crate::style::{BLUE, BOLD, CYAN, GREEN, HEADER, RED, RESET, RULE, YELLOW};

/// Reviews candidates on the terminal, one `inquire` prompt per decision.
pub struct TerminalReviewer;

impl Reviewer for TerminalReviewer {
    fn present(&mut self, candidate: &Candidate<'_>) -> Result<()> {
        let record = candidate.record;
        let highlight = whole_word_pattern([candidate.original])?;

        println!("\n{}{}{}", HEADER, RULE, RESET);
        println!(
            "[{}/{}] Identifier:  {}{}{}",
            candidate.index + 1,
            candidate.total,
            YELLOW,
            candidate.original,
            RESET
        );
        println!("Proposed change: {}{}{}", GREEN, record.proposed, RESET);
        println!(
            "{}Found {} time(s) in the following locations:{}",
            BOLD,
            record.occurrence_count(),
            RESET
        );

        for location in &record.locations {
            println!("  - {}{}{}", CYAN, location.file.display(), RESET);
            for occurrence in &location.occurrences {
                println!(
                    "    {}L{:<4}:{} {}",
                    BLUE,
                    occurrence.line_number,
                    RESET,
                    highlight_line(&highlight, &occurrence.text)
                );
            }
        }

        Ok(())
    }

    fn ask(&mut self, _candidate: &Candidate<'_>) -> Result<String> {
        let answer = Text::new("Apply this change everywhere?")
            .with_help_message("(y)es, (n)o, (a)ll remaining, (q)uit")
            .prompt()?;
        Ok(answer)
    }

    fn invalid_answer(&mut self, error: &InvalidDecision) -> Result<()> {
        println!("{}Invalid input '{}'. Please enter y, n, a, or q.{}", RED, error.0, RESET);
        Ok(())
    }

    fn auto_approved(&mut self, _candidate: &Candidate<'_>) -> Result<()> {
        println!("\n{}Applying change automatically ('all' was selected).{}", GREEN, RESET);
        Ok(())
    }

    fn rejected(&mut self, candidate: &Candidate<'_>) -> Result<()> {
        println!("Skipping {}{}{}...", YELLOW, candidate.original, RESET);
        Ok(())
    }

    fn aborted(&mut self) -> Result<()> {
        println!("{}Quitting review.{}", RED, RESET);
        Ok(())
    }

    fn confirm_write(&mut self, approvals: &ApprovalSet) -> Result<String> {
        println!(
            "\n{}{}Review complete. You have approved {} change(s).{}",
            YELLOW,
            BOLD,
            approvals.len(),
            RESET
        );
        let answer = Text::new("Do you want to write all approved changes to disk?")
            .with_help_message("This cannot be undone. (y/n)")
            .prompt();
        decline_on_cancel(answer)
    }
}

/// Treats Esc at a prompt as an empty answer, which declines.
fn decline_on_cancel(answer: Result<String, InquireError>) -> Result<String> {
    match answer {
        Err(InquireError::OperationCanceled) => Ok(String::new()),
        other => Ok(other?),
    }
}

fn highlight_line(pattern: &Regex, line: &str) -> String {
    pattern
        .replace_all(line, |caps: &regex::Captures| format!("{}{}{}", YELLOW, &caps[0], RESET))
        .into_owned()
}
