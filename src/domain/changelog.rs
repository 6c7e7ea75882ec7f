//! Categorized changelog built from merge-commit history.
//!
//! The input is `git rev-list --merges --pretty=format:%B` style text, one
//! block per merge commit:
//!
//! ```text
//! commit <hash>
//! Merge pull request #<N> from <fork>/<branch>
//!
//! <title>
//! ```
//!
//! Parsing is tolerant: stray lines, manual merges (`Merge branch 'x'`) and
//! desynced blocks are logged and skipped, never fatal.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::category::{classify, ChangeCategory};
use super::tag::ReleaseTag;
use super::version::VersionBump;

/// One changelog line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub pr_number: String,
    pub title: String,
}

impl LogEntry {
    pub fn new(pr_number: impl Into<String>, title: impl Into<String>) -> Self {
        LogEntry {
            pr_number: pr_number.into(),
            title: title.into(),
        }
    }
}

/// Entries bucketed by category, each bucket in history-walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    buckets: BTreeMap<ChangeCategory, Vec<LogEntry>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw merge-commit log text into a categorized changelog
    pub fn parse(raw_log: &str) -> Self {
        let mut log = ChangeLog::new();
        let mut lines = LineReader::new(raw_log);

        while lines.more() {
            let Some(commit) = lines.expect_with(parse_commit_line) else {
                // get back to a known good state: the next `commit` line
                if !lines.line().is_empty() {
                    warn!(line = lines.line(), "ignoring seemingly non-commit line");
                }
                continue;
            };

            let Some(pr_number) = lines.expect_with(parse_merge_line) else {
                // manual merges like `Merge branch 'master'` end up here
                warn!(
                    commit,
                    title = lines.line(),
                    "skipping non-GitHub merge commit"
                );
                continue;
            };

            if !lines.expect_blank() {
                warn!(
                    line = lines.line(),
                    "unexpected non-blank line, skipping till next commit"
                );
                continue;
            }

            if !lines.next() {
                break;
            }

            debug!(commit, pr = pr_number, "adding changelog entry");
            log.push_title(pr_number, lines.line());
        }

        log
    }

    /// Classify a PR title and add it to the matching bucket
    pub fn push_title(&mut self, pr_number: impl Into<String>, title: &str) {
        let classified = classify(title);
        self.push(
            classified.category,
            LogEntry::new(pr_number, classified.text),
        );
    }

    /// Add an already-classified entry
    pub fn push(&mut self, category: ChangeCategory, entry: LogEntry) {
        self.buckets.entry(category).or_default().push(entry);
    }

    /// Builder-style variant of [`ChangeLog::push`]
    pub fn with(mut self, category: ChangeCategory, entry: LogEntry) -> Self {
        self.push(category, entry);
        self
    }

    pub fn entries(&self, category: ChangeCategory) -> &[LogEntry] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, category: ChangeCategory) -> bool {
        !self.entries(category).is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How far a final release after `current` has to move
    ///
    /// Breaking changes bump the major version, except on the 0.Y line with
    /// `pre10` set where they bump the minor. Features bump the minor.
    /// Anything else, even no changes at all, bumps the patch.
    pub fn version_bump(&self, current: &ReleaseTag, pre10: bool) -> VersionBump {
        if self.has(ChangeCategory::Breaking) {
            if current.major == 0 && pre10 {
                VersionBump::Minor
            } else {
                VersionBump::Major
            }
        } else if self.has(ChangeCategory::Feature) {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }

    /// Non-empty buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (ChangeCategory, &[LogEntry])> {
        self.buckets
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(category, entries)| (*category, entries.as_slice()))
    }
}

/// `commit <hash>` -> hash
fn parse_commit_line(line: &str) -> Option<&str> {
    let hash = line.strip_prefix("commit ")?.split_whitespace().next()?;
    Some(hash)
}

/// `Merge pull request #<N> from <fork>` -> N
fn parse_merge_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("Merge pull request #")?;
    let (number, fork) = rest.split_once(" from ")?;
    if number.is_empty() || number.contains(char::is_whitespace) || fork.trim().is_empty() {
        return None;
    }
    Some(number)
}

/// Cursor over lines of text, loading one line at a time
struct LineReader<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    cur: &'a str,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        LineReader {
            lines: text.lines().collect(),
            pos: 0,
            cur: "",
        }
    }

    /// Load the next line, returning false if none are left
    fn next(&mut self) -> bool {
        match self.lines.get(self.pos) {
            Some(line) => {
                self.cur = line;
                self.pos += 1;
                true
            }
            None => {
                self.cur = "";
                false
            }
        }
    }

    fn more(&self) -> bool {
        self.pos < self.lines.len()
    }

    fn line(&self) -> &'a str {
        self.cur
    }

    /// Load the next line and run `parse` on it
    fn expect_with<T>(&mut self, parse: impl Fn(&'a str) -> Option<T>) -> Option<T> {
        if !self.next() {
            return None;
        }
        parse(self.cur)
    }

    /// Load the next line and check that it is blank
    fn expect_blank(&mut self) -> bool {
        self.next() && self.cur.is_empty()
    }
}
