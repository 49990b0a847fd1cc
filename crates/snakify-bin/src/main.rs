mod cli;
mod diff;
mod style;
mod terminal;

use anyhow::Result;
use cli::Cli;
use inquire::Confirm;
use snakify_core::{ReviewOutcome, ReviewSession, RewritePlan};
use style::{BANNER, BLUE, BOLD, GREEN, HEADER, RED, RESET, YELLOW};
use terminal::TerminalReviewer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting snakify");

    if !cli.root.exists() {
        anyhow::bail!("Root directory does not exist: {:?}", cli.root);
    }

    if !cli.root.is_dir() {
        anyhow::bail!("Root must be a directory: {:?}", cli.root);
    }

    run(&cli)?;

    println!("\n{}{}Snakify finished.{}", GREEN, BOLD, RESET);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.scan_options();

    info!("Root directory: {:?}", cli.root);
    info!("Extensions: {:?}", options.extensions);
    info!("Excluded directories: {:?}", options.excluded_dirs);

    if cli.dry_run {
        warn!("Dry run mode - no changes will be made");
    }

    println!(
        "{}Starting snake_case conversion in directory: {}{}",
        BOLD,
        cli.root.display(),
        RESET
    );
    println!("{}WARNING: Approved changes are written to files in place.{}", YELLOW, RESET);
    println!(
        "{}Please make sure you have a backup or are using version control (git).{}",
        YELLOW, RESET
    );

    let begin = Confirm::new("Begin the scan?").with_default(true).prompt()?;
    if !begin {
        println!("Scan cancelled.");
        return Ok(());
    }

    println!("{}Phase 1: Scanning all files...{}", BLUE, RESET);
    let outcome = snakify_core::scan_directory(&cli.root, &options)?;
    let ledger = outcome.ledger;

    for (path, error) in &outcome.skipped {
        println!("{}Could not read {}: {}{}", RED, path.display(), error, RESET);
    }
    println!(
        "{}Scan complete. {} files scanned, {} skipped. \
         Found {} unique identifiers ({} lines) to review.{}",
        GREEN,
        outcome.files_scanned,
        outcome.skipped.len(),
        ledger.len(),
        ledger.total_occurrences(),
        RESET
    );

    if !ledger.is_empty() {
        println!("\n{}{}{}", HEADER, BANNER, RESET);
        println!("{}{}Phase 2: Reviewing Changes{}", BLUE, BOLD, RESET);
        println!("{}{}{}", HEADER, BANNER, RESET);
    }

    let approvals = match ReviewSession::new(&ledger).run(&mut TerminalReviewer)? {
        ReviewOutcome::NothingToReview => {
            println!(
                "{}No convertible identifiers found anywhere in the project.{}",
                GREEN, RESET
            );
            return Ok(());
        }
        ReviewOutcome::NoneApproved => {
            println!("\n{}No changes were approved. Exiting.{}", GREEN, RESET);
            return Ok(());
        }
        ReviewOutcome::Declined { .. } => {
            println!("{}All changes discarded. No files were modified.{}", RED, RESET);
            return Ok(());
        }
        ReviewOutcome::Confirmed(approvals) => approvals,
    };

    let plan = RewritePlan::new(&ledger, &approvals);

    let report = if cli.dry_run {
        println!("\nPreviewing changes to {} file(s)...", plan.len());
        snakify_core::apply_plan_with_preview(&plan, true, diff::show_diff)
    } else {
        println!("\nWriting changes to {} file(s)...", plan.len());
        snakify_core::apply_plan(&plan, false)
    };

    for (path, error) in &report.failures {
        println!("  {}FAILED to update {}: {}{}", RED, path.display(), error, RESET);
    }

    println!(
        "\n{} file(s) {}, {} replacement(s), {} unchanged, {} failed.",
        report.files_updated,
        if cli.dry_run { "would be updated" } else { "updated" },
        report.replacements,
        report.files_unchanged,
        report.failures.len()
    );

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .with(filter)
        .init();

    Ok(())
}
