use std::fmt;

/// Warnings raised while composing release notes.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The release contains breaking changes
    BreakingChanges { count: usize },
    /// Some PR titles carry no recognized prefix
    UncategorizedChanges { count: usize },
    /// Fetching the branch's upstream failed
    UpstreamRefreshFailed { branch: String, reason: String },
    /// No `org/repo` could be worked out for release links
    ProjectUnknown { reason: String },
    /// An optional section name that is not known
    UnknownSection { name: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BreakingChanges { count } => {
                write!(f, "breaking changes this version ({})", count)
            }
            BoundaryWarning::UncategorizedChanges { count } => write!(
                f,
                "unknown changes in this release ({}) -- categorize manually",
                count
            ),
            BoundaryWarning::UpstreamRefreshFailed { branch, reason } => write!(
                f,
                "unable to refresh upstream of '{}', continuing without it -- you may want to do this manually: {}",
                branch, reason
            ),
            BoundaryWarning::ProjectUnknown { reason } => write!(
                f,
                "unable to determine the GitHub project (set --project manually): {}",
                reason
            ),
            BoundaryWarning::UnknownSection { name } => {
                write!(f, "unknown optional section '{}', skipping", name)
            }
        }
    }
}
