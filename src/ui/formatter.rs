//! Pure formatting functions for UI output.
//!
//! Release notes are rendered to a `String` so the caller decides where they
//! go; the `display_*` helpers print status lines with `console` styling.

use std::fmt::Write;

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::{LogChunk, ReleaseNotes};
use crate::domain::{ChangeCategory, LogEntry};
use crate::verify::CheckOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
///
/// Goes to stderr so it never mixes with rendered notes on stdout.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    let label = match warning {
        BoundaryWarning::BreakingChanges { .. } => style("⚠ WARNING:").red().bold(),
        BoundaryWarning::UncategorizedChanges { .. } => style("⚠ WARNING:").magenta().bold(),
        _ => style("⚠ WARNING:").yellow(),
    };
    eprintln!("{} {}", label, warning);
}

/// Display the result of one PR check, with help text on failure.
pub fn display_check_outcome(outcome: &CheckOutcome) {
    match &outcome.result {
        Ok(summary) => display_success(&format!("{}: {}", outcome.name, summary.trim_end())),
        Err(e) => {
            display_error(&format!("{}: {}", outcome.name, e));
            eprintln!("{}\n", e.details());
        }
    }
}

/// Heading of a release-notes section
pub fn section_title(category: ChangeCategory) -> &'static str {
    match category {
        ChangeCategory::Breaking => ":warning: Breaking Changes",
        ChangeCategory::Feature => ":sparkles: New Features",
        ChangeCategory::Bugfix => ":bug: Bug Fixes",
        ChangeCategory::Docs => ":book: Documentation",
        ChangeCategory::Infra => ":seedling: Infra & Such",
        ChangeCategory::Release => ":rocket: Releases",
        ChangeCategory::Uncategorized => ":question: Sort these by hand",
    }
}

/// `- title (#pr)`, or just the title when there is no PR number
pub fn format_entry(entry: &LogEntry) -> String {
    if entry.pr_number.is_empty() {
        entry.title.clone()
    } else {
        format!("{} (#{})", entry.title, entry.pr_number)
    }
}

fn write_section(out: &mut String, title: &str, entries: &[LogEntry]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", title);
    let _ = writeln!(out);
    for entry in entries {
        let _ = writeln!(out, "- {}", format_entry(entry));
    }
}

fn write_chunk(out: &mut String, chunk: &LogChunk, project: &str, show_others: &[ChangeCategory]) {
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**changes since [{since}](https://github.com/{project}/releases/{since})**",
        since = chunk.since,
        project = project
    );

    for category in [
        ChangeCategory::Breaking,
        ChangeCategory::Feature,
        ChangeCategory::Bugfix,
    ] {
        write_section(out, section_title(category), chunk.changes.entries(category));
    }

    for category in show_others {
        write_section(out, section_title(*category), chunk.changes.entries(*category));
    }

    let uncategorized = ChangeCategory::Uncategorized;
    write_section(out, section_title(uncategorized), chunk.changes.entries(uncategorized));
}

/// Render release notes as Markdown
///
/// Only the breaking, feature, bugfix and uncategorized sections are shown
/// by default. Other categories appear in the order given in `show_others`.
pub fn render_release_notes(
    notes: &ReleaseNotes,
    project: &str,
    show_others: &[ChangeCategory],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", notes.next);

    for chunk in &notes.chunks {
        write_chunk(&mut out, chunk, project, show_others);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "*Thanks to all our contributors!*");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ReleasePoint;
    use crate::domain::{ChangeLog, ReleaseTag};

    fn notes(changes: ChangeLog) -> ReleaseNotes {
        ReleaseNotes {
            next: ReleaseTag::new(1, 7, 0),
            chunks: vec![LogChunk {
                since: ReleasePoint::Tag(ReleaseTag::new(1, 6, 3)),
                changes,
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_render_release_notes() {
        let changes = ChangeLog::new()
            .with(ChangeCategory::Feature, LogEntry::new("12", "Add a thing"))
            .with(ChangeCategory::Bugfix, LogEntry::new("13", "Fix a thing"))
            .with(ChangeCategory::Docs, LogEntry::new("14", "Document a thing"))
            .with(ChangeCategory::Uncategorized, LogEntry::new("15", "mystery"));

        let rendered = render_release_notes(&notes(changes), "org/repo", &[]);
        let expected = "# v1.7.0

**changes since [v1.6.3](https://github.com/org/repo/releases/v1.6.3)**

## :sparkles: New Features

- Add a thing (#12)

## :bug: Bug Fixes

- Fix a thing (#13)

## :question: Sort these by hand

- mystery (#15)

*Thanks to all our contributors!*
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_optional_sections_in_requested_order() {
        let changes = ChangeLog::new()
            .with(ChangeCategory::Docs, LogEntry::new("14", "Document a thing"))
            .with(ChangeCategory::Infra, LogEntry::new("16", "Bump deps"));

        let rendered = render_release_notes(
            &notes(changes),
            "org/repo",
            &[ChangeCategory::Infra, ChangeCategory::Docs],
        );
        let infra = rendered.find(":seedling: Infra & Such").unwrap();
        let docs = rendered.find(":book: Documentation").unwrap();
        assert!(infra < docs);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let rendered = render_release_notes(&notes(ChangeLog::new()), "org/repo", &[]);
        assert!(!rendered.contains("##"));
        assert!(rendered.ends_with("*Thanks to all our contributors!*\n"));
    }

    #[test]
    fn test_format_entry_without_pr_number() {
        assert_eq!(format_entry(&LogEntry::new("", "Plain")), "Plain");
        assert_eq!(format_entry(&LogEntry::new("7", "Numbered")), "Numbered (#7)");
    }

    #[test]
    fn test_display_helpers_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_boundary_warning(&BoundaryWarning::BreakingChanges { count: 1 });
    }
}
