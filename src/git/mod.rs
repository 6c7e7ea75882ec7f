//! Version-control abstraction layer
//!
//! The release engine never talks to git directly. Everything it needs from
//! history goes through the [VersionControl] trait, with two implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! Points in history are passed around as [Committish] values, which render
//! themselves as revision strings git understands.
//!
//! ```rust
//! # use relnotes::git::{Committish, VersionControl};
//! # fn example<V: VersionControl>(vcs: &V) -> relnotes::Result<()> {
//! let tag = vcs.closest_tag(&Committish::Head)?;
//! let log = vcs.merge_commits_between(&Committish::raw(tag), &Committish::Head)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{ReleaseBranch, ReleaseTag};
use crate::error::Result;
use std::fmt;

/// A named reference: tag or branch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitRef {
    Tag(String),
    /// Branch name as git resolves it, possibly with an `@{u}` suffix
    Branch(String),
    /// Fully qualified local branch (`refs/heads/<name>`)
    LocalBranch(String),
}

impl GitRef {
    /// Short name without any `refs/` qualification
    pub fn name(&self) -> &str {
        match self {
            GitRef::Tag(name) | GitRef::Branch(name) | GitRef::LocalBranch(name) => name,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitRef::Tag(name) | GitRef::Branch(name) => write!(f, "{}", name),
            GitRef::LocalBranch(name) => write!(f, "refs/heads/{}", name),
        }
    }
}

/// Anything that renders as a git revision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Committish {
    /// The symbolic `HEAD`
    Head,
    /// A commit hash
    Commit(String),
    Ref(GitRef),
    /// `start..end`
    Range(Box<Committish>, Box<Committish>),
    /// A user-supplied or derived revision string, used as-is
    Raw(String),
}

impl Committish {
    pub fn raw(rev: impl Into<String>) -> Self {
        Committish::Raw(rev.into())
    }

    pub fn range(start: Committish, end: Committish) -> Self {
        Committish::Range(Box::new(start), Box::new(end))
    }

    pub fn tag(tag: &ReleaseTag) -> Self {
        Committish::Ref(GitRef::Tag(tag.to_string()))
    }

    /// The branch, including its upstream suffix when it uses one
    pub fn branch(branch: &ReleaseBranch) -> Self {
        Committish::Ref(GitRef::Branch(branch.to_string()))
    }

    /// The commit just before this one (`<rev>~1`)
    pub fn parent(&self) -> Self {
        Committish::Raw(format!("{}~1", self))
    }

    /// The named reference, for tags and branches only
    pub fn reference(&self) -> Option<&GitRef> {
        match self {
            Committish::Ref(reference) => Some(reference),
            _ => None,
        }
    }
}

impl fmt::Display for Committish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Committish::Head => write!(f, "HEAD"),
            Committish::Commit(hash) | Committish::Raw(hash) => write!(f, "{}", hash),
            Committish::Ref(reference) => write!(f, "{}", reference),
            Committish::Range(start, end) => write!(f, "{}..{}", start, end),
        }
    }
}

/// History queries the release engine needs
///
/// ## Error Handling
///
/// All fallible methods return [crate::error::Result<T>]. "Nothing found"
/// from [VersionControl::closest_tag] must be reported as
/// [crate::error::RelnotesError::TagNotFound] so callers can fall back to
/// the root commit.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): real repository via `git2`
/// - [MockRepository](mock::MockRepository): canned answers for tests
pub trait VersionControl {
    /// Name of the currently checked out branch
    fn current_branch(&self) -> Result<String>;

    /// Most recent tag reachable from `point`, by name only
    ///
    /// Equivalent to `git describe --tags --abbrev=0 <point>`.
    fn closest_tag(&self, point: &Committish) -> Result<String>;

    /// Hash of the first (parentless) commit reachable from `reference`
    fn root_commit(&self, reference: &GitRef) -> Result<String>;

    /// Whether the local branch has an upstream configured
    fn has_upstream(&self, local_branch: &str) -> bool;

    /// Name of the remote the local branch tracks
    fn remote_for(&self, local_branch: &str) -> Result<String>;

    /// Fetch URL of a remote
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Fetch branches and tags from the remote the local branch tracks
    fn fetch_upstream(&self, local_branch: &str) -> Result<()>;

    /// Merge commits in `start..end`, newest first
    ///
    /// Each commit is rendered as `commit <hash>` followed by its raw
    /// message and a blank line, the shape [crate::domain::ChangeLog::parse]
    /// expects.
    fn merge_commits_between(&self, start: &Committish, end: &Committish) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committish_display() {
        assert_eq!(Committish::Head.to_string(), "HEAD");
        assert_eq!(Committish::Commit("abc123".into()).to_string(), "abc123");
        assert_eq!(Committish::raw("v1.0.0~3").to_string(), "v1.0.0~3");
    }

    #[test]
    fn test_committish_range_display() {
        let range = Committish::range(
            Committish::tag(&ReleaseTag::new(0, 6, 3)),
            Committish::branch(&ReleaseBranch::zero_line(6).with_upstream(true)),
        );
        assert_eq!(range.to_string(), "v0.6.3..release-0.6@{u}");
    }

    #[test]
    fn test_committish_parent() {
        let tag = Committish::tag(&ReleaseTag::new(2, 0, 0));
        assert_eq!(tag.parent().to_string(), "v2.0.0~1");
        assert_eq!(tag.parent().parent().to_string(), "v2.0.0~1~1");
    }

    #[test]
    fn test_local_branch_is_fully_qualified() {
        let reference = GitRef::LocalBranch("release-1".into());
        assert_eq!(reference.to_string(), "refs/heads/release-1");
        assert_eq!(reference.name(), "release-1");
    }

    #[test]
    fn test_only_refs_expose_a_reference() {
        assert!(Committish::tag(&ReleaseTag::new(1, 0, 0)).reference().is_some());
        assert!(Committish::Head.reference().is_none());
        assert!(Committish::raw("abc").reference().is_none());
    }
}
