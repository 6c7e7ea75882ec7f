use crate::domain::{ChangeLog, PreRelease, ReleaseBranch, ReleaseInfo, ReleaseTag};
use crate::error::{RelnotesError, Result};
use crate::git::{Committish, GitRef, VersionControl};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Where the current release line stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleasePoint {
    /// The most recent release tag
    Tag(ReleaseTag),
    /// No release yet: the first commit on the branch
    FirstCommit {
        commit: String,
        branch: ReleaseBranch,
    },
    /// A user-supplied starting point
    Custom(Committish),
}

impl ReleasePoint {
    pub fn committish(&self) -> Committish {
        match self {
            ReleasePoint::Tag(tag) => Committish::tag(tag),
            ReleasePoint::FirstCommit { commit, .. } => Committish::Commit(commit.clone()),
            ReleasePoint::Custom(committish) => committish.clone(),
        }
    }

    pub fn as_tag(&self) -> Option<&ReleaseTag> {
        match self {
            ReleasePoint::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

impl fmt::Display for ReleasePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.committish())
    }
}

/// Works out the current and next release of a branch from its history
pub struct VersionResolver<'a, V: VersionControl> {
    vcs: &'a V,
}

impl<'a, V: VersionControl> VersionResolver<'a, V> {
    /// Create a new resolver over a repository
    pub fn new(vcs: &'a V) -> Self {
        VersionResolver { vcs }
    }

    /// Most recent release on the branch, or its first commit if there is none
    ///
    /// A tag that is not a valid release tag is an error. With `verify` set,
    /// so is a tag that does not belong to the branch.
    pub fn latest_release(&self, branch: &ReleaseBranch, verify: bool) -> Result<ReleasePoint> {
        let tip = Committish::branch(branch);

        let raw_tag = match self.vcs.closest_tag(&tip) {
            Ok(raw_tag) => raw_tag,
            Err(tag_err) => {
                info!(branch = %branch, "no release tag found, using the first commit");
                let reference = GitRef::Branch(branch.to_string());
                return match self.vcs.root_commit(&reference) {
                    Ok(commit) => Ok(ReleasePoint::FirstCommit {
                        commit,
                        branch: *branch,
                    }),
                    Err(commit_err) => Err(RelnotesError::NoReleasePoint {
                        branch: branch.to_string(),
                        tag_error: tag_err.to_string(),
                        commit_error: commit_err.to_string(),
                    }),
                };
            }
        };

        let tag = ReleaseTag::parse(&raw_tag).map_err(|e| {
            RelnotesError::tag(format!(
                "latest tag '{}' on branch '{}' is not a valid release tag: {}",
                raw_tag, branch, e
            ))
        })?;
        if verify {
            branch.verify_tag_belongs(&tag)?;
        }

        debug!(branch = %branch, tag = %tag, "latest release");
        Ok(ReleasePoint::Tag(tag))
    }

    /// Stop using the branch's upstream if it does not have one
    pub fn check_or_clear_upstream(&self, branch: &mut ReleaseBranch) {
        if !branch.use_upstream {
            return;
        }
        if !self.vcs.has_upstream(&branch.name()) {
            warn!(
                branch = %branch.name(),
                "branch has no upstream, falling back to the local branch"
            );
            branch.use_upstream = false;
        }
    }

    /// Current release of the branch, looking through to the previous
    /// release line when the branch was only just cut
    ///
    /// On a fresh `release-0.7` the closest tag is usually `v0.6.0`, since
    /// `v0.Y.0` releases come off the main branch. The real latest release
    /// then lives on `release-0.6` (say `v0.6.3`), so that branch is asked
    /// instead. This looks back one line only.
    pub fn current_version(&self, branch: &mut ReleaseBranch) -> Result<ReleasePoint> {
        let requested_upstream = branch.use_upstream;
        self.check_or_clear_upstream(branch);

        let latest = self.latest_release(branch, false)?;
        let ReleasePoint::Tag(tag) = &latest else {
            debug!("no latest tag, not checking which line it belongs to");
            return Ok(latest);
        };

        match branch.previous_line(tag) {
            Some(previous) => {
                let mut previous = previous.with_upstream(requested_upstream);
                info!(
                    tag = %tag,
                    branch = %previous,
                    "most recent tag is from the previous line, checking that branch for the actual latest release"
                );
                self.check_or_clear_upstream(&mut previous);
                self.latest_release(&previous, true)
            }
            None => {
                branch.verify_tag_belongs(tag)?;
                Ok(latest)
            }
        }
    }

    /// Most recent final release strictly before `current`
    ///
    /// Walks back from just before `current`, skipping pre-releases and
    /// tags that are not release tags.
    pub fn closest_final(&self, current: &ReleaseTag) -> Result<ReleaseTag> {
        let current_final = current.finalized();
        let mut point = Committish::tag(current);
        let mut seen = HashSet::new();

        loop {
            let raw_tag = self.vcs.closest_tag(&point.parent())?;
            if !seen.insert(raw_tag.clone()) {
                return Err(RelnotesError::tag(format!(
                    "unable to locate the final release before {}, history walk stopped at {}",
                    current, raw_tag
                )));
            }

            match ReleaseTag::parse(&raw_tag) {
                Ok(tag) if !tag.is_prerelease() && tag < current_final => return Ok(tag),
                Ok(tag) => {
                    debug!(tag = %tag, "skipping pre-release or current release");
                    point = Committish::tag(&tag);
                }
                Err(e) => {
                    warn!(tag = %raw_tag, error = %e, "skipping non-release tag");
                    point = Committish::Ref(GitRef::Tag(raw_tag));
                }
            }
        }
    }

    /// Changes on the branch since its current release
    pub fn changes(&self, branch: &mut ReleaseBranch) -> Result<(ChangeLog, ReleasePoint)> {
        let since = self.current_version(branch)?;
        let changes = self.changes_since(branch, &since)?;
        Ok((changes, since))
    }

    /// Changes on the branch since the given point
    pub fn changes_since(&self, branch: &ReleaseBranch, since: &ReleasePoint) -> Result<ChangeLog> {
        let start = since.committish();
        let end = Committish::branch(branch);
        debug!(start = %start, end = %end, "collecting merge commits");

        let raw_log = self
            .vcs
            .merge_commits_between(&start, &end)
            .map_err(|e| {
                RelnotesError::version(format!(
                    "unable to list merge commits between {} and {}: {}",
                    start, end, e
                ))
            })?;

        Ok(ChangeLog::parse(&raw_log))
    }
}

/// Next release version given the current point, the changes since, and
/// the kind of release wanted
pub fn expected_next_version(
    current: &ReleasePoint,
    changes: &ChangeLog,
    info: ReleaseInfo,
) -> Result<ReleaseTag> {
    let requested_pre = info.kind.prerelease_type().map(PreRelease::first);

    let Some(current) = current.as_tag() else {
        // nothing released yet: always start at 0.1.0
        let first = ReleaseTag::new(0, 1, 0);
        return Ok(match requested_pre {
            Some(pre) => first.with_pre(pre),
            None => first,
        });
    };

    let bump_final = |tag: &ReleaseTag| tag.bump(changes.version_bump(tag, info.pre10));

    let Some(requested_pre) = requested_pre else {
        if current.is_prerelease() {
            return Ok(current.finalized());
        }
        return bump_final(current);
    };

    let next = match current.pre {
        Some(pre) if pre.identifier == requested_pre.identifier => {
            let mut next = current.clone();
            next.pre = Some(pre.increment_iteration()?);
            next
        }
        None => bump_final(current)?.with_pre(requested_pre),
        Some(_) => current.finalized().with_pre(requested_pre),
    };

    if next <= *current {
        return Err(RelnotesError::Ordering {
            current: current.to_string(),
            next: next.to_string(),
        });
    }

    Ok(next)
}

/// Whether going from `current` to `next` promotes a pre-release to final
pub fn is_prerelease_to_final(current: &ReleasePoint, next: &ReleaseTag) -> bool {
    match current.as_tag() {
        Some(tag) => tag.is_prerelease() && !next.is_prerelease(),
        None => false,
    }
}
