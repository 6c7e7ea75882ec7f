//! Release-notes workflow orchestration
//!
//! Drives the resolver over a repository and collects everything the CLI
//! needs to print: the next version, one or two chunks of changes, and any
//! non-fatal warnings. Kept free of clap so it can be called (and tested)
//! programmatically against any [VersionControl].

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzer::{expected_next_version, is_prerelease_to_final, ReleasePoint, VersionResolver};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{ChangeCategory, ChangeLog, ReleaseBranch, ReleaseInfo, ReleaseKind, ReleaseTag};
use crate::error::RelnotesError;
use crate::git::{Committish, VersionControl};

/// Remote assumed to point at the main project when the branch has no upstream
pub const DEFAULT_UPSTREAM_REMOTE: &str = "upstream";

/// Arguments for the notes workflow
///
/// Mirrors the CLI flags, with config values already folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesWorkflowArgs {
    /// Tag or commit to start from instead of the branch's current release
    pub from: Option<String>,

    /// Release branch to run on, the current branch when unset
    pub branch: Option<String>,

    pub release_kind: ReleaseKind,

    pub pre10: bool,

    /// Extra sections to show (`docs`, `infra`, `release`)
    pub show_others: Vec<String>,

    /// GitHub project in `org/repo` form
    pub project: Option<String>,

    pub use_upstream: bool,

    pub refresh_upstream: bool,

    pub print_full_final: bool,
}

impl NotesWorkflowArgs {
    /// Defaults taken from the config file
    pub fn from_config(config: &Config) -> Self {
        NotesWorkflowArgs {
            from: None,
            branch: None,
            release_kind: ReleaseKind::Final,
            pre10: config.release.pre10,
            show_others: config.notes.show_others.clone(),
            project: config.notes.project.clone(),
            use_upstream: config.release.use_upstream,
            refresh_upstream: config.release.refresh_upstream,
            print_full_final: config.release.print_full_final,
        }
    }
}

/// Changes since one point in history
#[derive(Debug, Clone, PartialEq)]
pub struct LogChunk {
    pub since: ReleasePoint,
    pub changes: ChangeLog,
}

/// Everything needed to print release notes
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNotes {
    pub next: ReleaseTag,
    /// Changes since the current release, then optionally since the last final release
    pub chunks: Vec<LogChunk>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a notes run, with the resolved rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct NotesOutcome {
    pub notes: ReleaseNotes,
    pub branch: ReleaseBranch,
    pub project: Option<String>,
    pub show_others: Vec<ChangeCategory>,
}

/// Compute release notes for a release branch
///
/// 1. Resolve the branch (explicit or current)
/// 2. Best-effort refresh of its upstream
/// 3. Collect changes since the current release (or `from`)
/// 4. Work out the next version
/// 5. When promoting a pre-release to final, add the changes since the last final
pub fn run_notes_workflow<V: VersionControl>(
    vcs: &V,
    args: &NotesWorkflowArgs,
) -> Result<NotesOutcome> {
    let branch_name = match &args.branch {
        Some(name) => name.clone(),
        None => vcs
            .current_branch()
            .context("unable to determine the current branch (pass --branch)")?,
    };
    info!(branch = %branch_name, "starting from branch");

    let mut branch = ReleaseBranch::parse(&branch_name)?;
    let mut warnings = Vec::new();

    if args.use_upstream {
        branch.use_upstream = true;
        if args.refresh_upstream {
            if let Err(e) = vcs.fetch_upstream(&branch.name()) {
                // expected on a brand new branch, so only warn
                warnings.push(BoundaryWarning::UpstreamRefreshFailed {
                    branch: branch.name(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let resolver = VersionResolver::new(vcs);
    let (changes, since) = match &args.from {
        Some(from) => {
            let since = ReleasePoint::Custom(Committish::raw(from.as_str()));
            (resolver.changes_since(&branch, &since)?, since)
        }
        None => resolver.changes(&mut branch)?,
    };

    let show_others = parse_sections(&args.show_others, &mut warnings);

    let project = match &args.project {
        Some(project) => Some(project.clone()),
        None => match find_project(vcs, &branch) {
            Ok(project) => Some(project),
            Err(e) => {
                warnings.push(BoundaryWarning::ProjectUnknown {
                    reason: e.to_string(),
                });
                None
            }
        },
    };

    let breaking = changes.entries(ChangeCategory::Breaking).len();
    if breaking > 0 {
        warnings.push(BoundaryWarning::BreakingChanges { count: breaking });
    }
    let uncategorized = changes.entries(ChangeCategory::Uncategorized).len();
    if uncategorized > 0 {
        warnings.push(BoundaryWarning::UncategorizedChanges {
            count: uncategorized,
        });
    }

    let info = ReleaseInfo::new(args.release_kind, args.pre10);
    let next = expected_next_version(&since, &changes, info)?;
    info!(next = %next, since = %since, "computed next version");

    let mut chunks = vec![LogChunk { since, changes }];

    if args.print_full_final && is_prerelease_to_final(&chunks[0].since, &next) {
        if let Some(current) = chunks[0].since.as_tag() {
            let previous = resolver.closest_final(current).context(
                "unable to find last final release (try running with --print-full-final=false if that's expected)",
            )?;
            let previous = ReleasePoint::Tag(previous);
            let changes = resolver.changes_since(&branch, &previous).context(
                "unable to compute changes since last final release (try running with --print-full-final=false if that's expected)",
            )?;
            chunks.push(LogChunk {
                since: previous,
                changes,
            });
        }
    }

    Ok(NotesOutcome {
        notes: ReleaseNotes {
            next,
            chunks,
            warnings,
        },
        branch,
        project,
        show_others,
    })
}

/// Map optional section names to categories, warning about unknown ones
pub fn parse_sections(names: &[String], warnings: &mut Vec<BoundaryWarning>) -> Vec<ChangeCategory> {
    let mut sections = Vec::new();
    for name in names {
        let category = match name.trim() {
            "" => continue,
            "docs" => ChangeCategory::Docs,
            "infra" => ChangeCategory::Infra,
            "release" => ChangeCategory::Release,
            other => {
                warnings.push(BoundaryWarning::UnknownSection {
                    name: other.to_string(),
                });
                continue;
            }
        };
        if !sections.contains(&category) {
            sections.push(category);
        }
    }
    sections
}

/// Work out the `org/repo` of the project from a GitHub remote
///
/// Uses the remote the branch's upstream lives on, or the `upstream` remote
/// when the branch has no upstream.
pub fn find_project<V: VersionControl>(
    vcs: &V,
    branch: &ReleaseBranch,
) -> crate::error::Result<String> {
    let remote = if branch.use_upstream {
        vcs.remote_for(&branch.name())?
    } else {
        info!(
            branch = %branch,
            "branch has no upstream, assuming the project remote is \"upstream\""
        );
        DEFAULT_UPSTREAM_REMOTE.to_string()
    };

    let url = vcs.remote_url(&remote)?;
    project_from_remote_url(&url)
}

/// `git@github.com:org/repo.git` or `https://github.com/org/repo` -> `org/repo`
pub fn project_from_remote_url(url: &str) -> crate::error::Result<String> {
    let project = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .ok_or_else(|| {
            RelnotesError::remote(format!(
                "unrecognized upstream URL format '{}' (expected either git@github.com:* or https://github.com/*)",
                url
            ))
        })?;

    Ok(project.strip_suffix(".git").unwrap_or(project).to_string())
}
