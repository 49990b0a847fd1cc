use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

use crate::style::{CYAN, GREEN, RED, RESET};

/// Renders a colored line diff with three lines of context, or `None` when
/// the two texts are identical.
pub fn render_diff(
    old_content: &str,
    new_content: &str,
) -> Result<Option<String>, std::fmt::Error> {
    let diff = TextDiff::from_lines(old_content, new_content);
    let mut output = String::new();
    let mut has_changes = false;

    for (i, group) in diff.grouped_ops(3).iter().enumerate() {
        if i > 0 {
            writeln!(output, "{:-^1$}", "", 40)?;
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("- ", RED),
                    ChangeTag::Insert => ("+ ", GREEN),
                    ChangeTag::Equal => ("  ", RESET),
                };
                write!(output, "{}{}{}{}", style, sign, change.value(), RESET)?;
                if change.missing_newline() {
                    writeln!(output)?;
                }
                if change.tag() != ChangeTag::Equal {
                    has_changes = true;
                }
            }
        }
    }

    Ok(has_changes.then_some(output))
}

pub fn show_diff(file_path: &Path, old_content: &str, new_content: &str) {
    println!("\n📝 Would update: {}{}{}", CYAN, file_path.display(), RESET);
    match render_diff(old_content, new_content) {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => println!("No changes detected."),
        Err(e) => println!("Could not render diff: {}", e),
    }
}
