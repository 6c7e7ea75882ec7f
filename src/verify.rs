//! Pull request checks: title prefix, issue numbers in the title, and body length
//!
//! Each check is a pure function over the PR title or body. A passing check
//! returns a short human summary; a failing one returns a [CheckError] whose
//! [CheckError::details] explains how to fix it.

use crate::domain::{classify, ChangeCategory};
use crate::error::{RelnotesError, Result as RelnotesResult};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Default minimum PR body length, in characters
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 40;

/// Why a pull request check failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("no matching PR type indicator found in title")]
    MissingPrefix { title: String },

    #[error("Your PR has an Issue or PR number in the title.")]
    IssueInTitle,

    #[error("Your PR description is *really* short.")]
    NotDescriptive { min: usize },

    #[error("check could not run: {0}")]
    Pattern(String),
}

impl From<RelnotesError> for CheckError {
    fn from(e: RelnotesError) -> Self {
        CheckError::Pattern(e.to_string())
    }
}

impl CheckError {
    /// Longer help text for the PR author
    pub fn details(&self) -> String {
        match self {
            CheckError::MissingPrefix { title } => format!(
                "I saw a title of `{}`, which doesn't seem to have any of the acceptable prefixes.\n\
                 \n\
                 You need to have one of these as the prefix of your PR title:\n\
                 \n\
                 {}",
                title,
                prefix_help()
            ),
            CheckError::IssueInTitle => "The title should just be descriptive.\n\
                 Issue numbers belong in the PR body as either `Fixes #XYZ` (if it closes the issue or PR), \
                 or something like `Related to #XYZ` (if it's just related)."
                .to_string(),
            CheckError::NotDescriptive { min } => format!(
                "It probably isn't descriptive enough (at least {} characters are expected).\n\
                 You should give a description that highlights both what you're doing it and *why* you're doing it.\n\
                 Someone reading the PR description without clicking any issue links should be able to roughly understand what's going on.",
                min
            ),
            CheckError::Pattern(reason) => format!(
                "The check itself is broken ({}), so the PR could not be verified.",
                reason
            ),
        }
    }
}

/// One bullet per accepted prefix, with its emoji and alias
fn prefix_help() -> String {
    [
        ("Breaking change", ChangeCategory::Breaking),
        ("Non-breaking feature", ChangeCategory::Feature),
        ("Patch fix", ChangeCategory::Bugfix),
        ("Docs", ChangeCategory::Docs),
        ("Infra/Tests/Other", ChangeCategory::Infra),
        ("Release", ChangeCategory::Release),
    ]
    .iter()
    .map(|(label, category)| format!("- {}: {} (`{}`)", label, category.emoji(), category.alias()))
    .collect::<Vec<_>>()
    .join("\n")
}

fn compiled(
    cell: &'static OnceLock<std::result::Result<Regex, regex::Error>>,
    pattern: &str,
) -> RelnotesResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| RelnotesError::Regex(e.clone()))
}

fn wip_re() -> RelnotesResult<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&RE, r"(?i)^\W?WIP\W")
}

fn issue_reference_re() -> RelnotesResult<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&RE, r"#\d+\b")
}

/// Drop a leading WIP marker like `WIP:` or `[WIP] `
fn strip_wip(title: &str) -> RelnotesResult<String> {
    Ok(wip_re()?.replace(title, "").into_owned())
}

/// Check that a PR title starts with a recognized prefix
pub fn verify_title(raw_title: &str) -> Result<String, CheckError> {
    let title = strip_wip(raw_title)?;

    let classified = classify(&title);
    if classified.category == ChangeCategory::Uncategorized {
        return Err(CheckError::MissingPrefix { title });
    }

    Ok(format!(
        "Found {} PR ({}) with final title:\n\n\t{}\n",
        classified.category.emoji(),
        classified.category,
        classified.text
    ))
}

/// Check that the PR title carries no `#123` style references
pub fn check_issue_in_title(raw_title: &str) -> Result<String, CheckError> {
    let title = classify(raw_title).text;

    if issue_reference_re()?.is_match(&title) {
        return Err(CheckError::IssueInTitle);
    }

    Ok("Your PR title does not contain any Issue or PR tags".to_string())
}

/// Check that the PR body is at least `min_length` characters long
pub fn check_descriptiveness(body: &str, min_length: usize) -> Result<String, CheckError> {
    if body.chars().count() < min_length {
        return Err(CheckError::NotDescriptive { min: min_length });
    }
    Ok("Your PR looks descriptive enough!".to_string())
}

/// Result of one named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub result: Result<String, CheckError>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every check against a PR; it passes only if all of them do
pub fn run_checks(title: &str, body: &str, min_description_length: usize) -> Vec<CheckOutcome> {
    vec![
        CheckOutcome {
            name: "PR Type",
            result: verify_title(title),
        },
        CheckOutcome {
            name: "Issue in Title",
            result: check_issue_in_title(title),
        },
        CheckOutcome {
            name: "Descriptiveness",
            result: check_descriptiveness(body, min_description_length),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_title_success_message() {
        let summary = verify_title(":sparkles: Add a thing").unwrap();
        assert_eq!(summary, "Found \u{2728} PR (feature) with final title:\n\n\tAdd a thing\n");
    }

    #[test]
    fn test_verify_title_strips_wip() {
        assert!(verify_title("WIP: :bug: Fix a thing").is_ok());
        assert!(verify_title("[WIP] 🐛 Fix a thing").is_ok());
        assert!(verify_title("wip :book: Fix typo").is_ok());
    }

    #[test]
    fn test_verify_title_missing_prefix() {
        let err = verify_title("Fix a thing").unwrap_err();
        assert_eq!(
            err,
            CheckError::MissingPrefix {
                title: "Fix a thing".to_string()
            }
        );
        let details = err.details();
        assert!(details.contains("`Fix a thing`"));
        assert!(details.contains(":seedling:"));
    }

    #[test]
    fn test_verify_title_marker_must_lead() {
        assert!(verify_title("this is not a ✨ feature").is_err());
    }

    #[test]
    fn test_issue_in_title() {
        assert_eq!(
            check_issue_in_title(":bug: Fix #123").unwrap_err(),
            CheckError::IssueInTitle
        );
        assert!(check_issue_in_title(":bug: Fix the C# generator").is_ok());
        assert!(check_issue_in_title(":bug: Fix a thing").is_ok());
    }

    #[test]
    fn test_patterns_compile_once() {
        let first = issue_reference_re().unwrap();
        let second = issue_reference_re().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(wip_re().unwrap(), wip_re().unwrap()));
    }

    #[test]
    fn test_broken_check_is_a_failure() {
        let err = CheckError::from(RelnotesError::config("bad pattern"));
        assert!(err.details().contains("bad pattern"));
        let outcome = CheckOutcome {
            name: "Issue in Title",
            result: Err(err),
        };
        assert!(!outcome.passed());
    }

    #[test]
    fn test_descriptiveness() {
        assert!(check_descriptiveness("too short", DEFAULT_MIN_DESCRIPTION_LENGTH).is_err());
        let body = "This change fixes the way release notes are grouped by type.";
        assert!(check_descriptiveness(body, DEFAULT_MIN_DESCRIPTION_LENGTH).is_ok());
        assert!(check_descriptiveness("", 0).is_ok());
    }

    #[test]
    fn test_run_checks_reports_each_outcome() {
        let outcomes = run_checks(":bug: Fix #12", "short", 40);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].passed());
        assert!(!outcomes[1].passed());
        assert!(!outcomes[2].passed());
        assert!(!outcomes.iter().all(CheckOutcome::passed));
    }
}
