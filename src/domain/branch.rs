use crate::error::{RelnotesError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::tag::ReleaseTag;

/// Suffix git understands as "the upstream of this branch"
pub const UPSTREAM_SUFFIX: &str = "@{u}";

/// A long-lived release branch: either `release-X` (X >= 1) or `release-0.Y` (Y >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub major: u64,
    pub minor: u64,
    /// Refer to the branch's upstream instead of the local branch
    pub use_upstream: bool,
}

impl ReleaseBranch {
    /// `release-X` line
    pub fn x_line(major: u64) -> Self {
        ReleaseBranch {
            major,
            minor: 0,
            use_upstream: false,
        }
    }

    /// `release-0.Y` line
    pub fn zero_line(minor: u64) -> Self {
        ReleaseBranch {
            major: 0,
            minor,
            use_upstream: false,
        }
    }

    pub fn with_upstream(mut self, use_upstream: bool) -> Self {
        self.use_upstream = use_upstream;
        self
    }

    /// Parse a branch name like `release-1` or `release-0.6`
    pub fn parse(name: &str) -> Result<Self> {
        let caps = branch_name_re()?.captures(name).ok_or_else(|| {
            RelnotesError::branch(format!(
                "'{}' is not a release branch (expected release-X or release-0.Y)",
                name
            ))
        })?;

        let number = |group: &str| -> Result<Option<u64>> {
            caps.name(group)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|_| {
                        RelnotesError::branch(format!("'{}' has an out of range version", name))
                    })
                })
                .transpose()
        };

        let branch = match (number("major")?, number("minor")?) {
            (Some(major), _) if major > 0 => ReleaseBranch::x_line(major),
            (_, Some(minor)) if minor > 0 => ReleaseBranch::zero_line(minor),
            _ => {
                return Err(RelnotesError::branch(format!(
                    "'{}' is not a valid release branch: release-0 and release-0.0 do not exist",
                    name
                )))
            }
        };

        Ok(branch)
    }

    pub fn is_zero_line(&self) -> bool {
        self.major == 0
    }

    /// Local branch name, without any upstream suffix
    pub fn name(&self) -> String {
        if self.is_zero_line() {
            format!("release-0.{}", self.minor)
        } else {
            format!("release-{}", self.major)
        }
    }

    /// Whether a tag was cut from this release line
    pub fn tag_belongs(&self, tag: &ReleaseTag) -> bool {
        if self.is_zero_line() {
            tag.major == 0 && tag.minor == self.minor
        } else {
            tag.major == self.major
        }
    }

    /// Like [`ReleaseBranch::tag_belongs`], but a mismatch is an error
    pub fn verify_tag_belongs(&self, tag: &ReleaseTag) -> Result<()> {
        if self.tag_belongs(tag) {
            Ok(())
        } else {
            Err(RelnotesError::TagMismatch {
                tag: tag.to_string(),
                branch: self.to_string(),
            })
        }
    }

    /// The release line `tag` really belongs to, when it is the one just before this one
    ///
    /// `v0.Y.0` and `v1.0.0` style releases are cut from the trunk, so a
    /// freshly created branch usually finds the previous line's release as
    /// its closest tag:
    /// - `release-0.Y` with a `v0.(Y-1).*` tag -> `release-0.(Y-1)`
    /// - `release-1` with a `v0.Z.*` tag -> `release-0.Z`
    /// - `release-X` with a `v(X-1).*` tag -> `release-(X-1)`
    pub fn previous_line(&self, tag: &ReleaseTag) -> Option<ReleaseBranch> {
        if self.is_zero_line() {
            if tag.major == 0 && self.minor > 1 && tag.minor == self.minor - 1 {
                return Some(ReleaseBranch::zero_line(tag.minor));
            }
            return None;
        }

        if self.major == 1 {
            if tag.major == 0 && tag.minor > 0 {
                return Some(ReleaseBranch::zero_line(tag.minor));
            }
            return None;
        }

        if tag.major == self.major - 1 {
            return Some(ReleaseBranch::x_line(tag.major));
        }

        None
    }
}

fn branch_name_re() -> Result<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^release-(?:0\.(?P<minor>\d+)|(?P<major>\d+))$"))
        .as_ref()
        .map_err(|e| RelnotesError::Regex(e.clone()))
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if self.use_upstream {
            write!(f, "{}", UPSTREAM_SUFFIX)?;
        }
        Ok(())
    }
}
