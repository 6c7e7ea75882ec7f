use crate::error::{RelnotesError, Result};
use semver::BuildMetadata;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::prerelease::PreRelease;
use super::version::VersionBump;

/// A release tag: `v` + semantic version, with strictly shaped pre-release info
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<PreRelease>,
    pub build: BuildMetadata,
}

impl ReleaseTag {
    /// Create a final release tag
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ReleaseTag {
            major,
            minor,
            patch,
            pre: None,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Same version with the given pre-release attached
    pub fn with_pre(mut self, pre: PreRelease) -> Self {
        self.pre = Some(pre);
        self
    }

    /// Parse a tag name (e.g., "v1.2.3" or "v2.0.0-beta.1")
    ///
    /// The tag must start with `v`, the remainder must be a semantic
    /// version, and any pre-release part must be `<kind>.<number>`.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(version) = raw.strip_prefix('v') else {
            return Err(RelnotesError::tag(format!(
                "tag '{}' is not a release tag: missing 'v' prefix",
                raw
            )));
        };

        let version = semver::Version::parse(version).map_err(|e| {
            RelnotesError::tag(format!("tag '{}' is not a semantic version: {}", raw, e))
        })?;

        let pre = if version.pre.is_empty() {
            None
        } else {
            let pre = PreRelease::parse(version.pre.as_str()).map_err(|e| {
                RelnotesError::tag(format!("tag '{}' has invalid pre-release info: {}", raw, e))
            })?;
            Some(pre)
        };

        Ok(ReleaseTag {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            pre,
            build: version.build,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// The final version this tag is (or leads up to)
    pub fn finalized(&self) -> Self {
        ReleaseTag::new(self.major, self.minor, self.patch)
    }

    /// Bump to the next final version, dropping pre-release and build info
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let out_of_range = || {
            RelnotesError::version(format!(
                "cannot apply a {} bump to {}: out of range",
                bump_type, self
            ))
        };
        let next = match bump_type {
            VersionBump::Major => {
                ReleaseTag::new(self.major.checked_add(1).ok_or_else(out_of_range)?, 0, 0)
            }
            VersionBump::Minor => ReleaseTag::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(out_of_range)?,
                0,
            ),
            VersionBump::Patch => ReleaseTag::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(out_of_range)?,
            ),
        };
        Ok(next)
    }
}

impl FromStr for ReleaseTag {
    type Err = RelnotesError;

    fn from_str(s: &str) -> Result<Self> {
        ReleaseTag::parse(s)
    }
}

impl Ord for ReleaseTag {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // a final release sorts after all of its pre-releases
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for ReleaseTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prerelease::PreReleaseType;

    fn tag(raw: &str) -> ReleaseTag {
        ReleaseTag::parse(raw).unwrap()
    }

    #[test]
    fn test_tag_parse_final() {
        let t = tag("v1.2.3");
        assert_eq!((t.major, t.minor, t.patch), (1, 2, 3));
        assert!(t.pre.is_none());
    }

    #[test]
    fn test_tag_parse_prerelease() {
        let t = tag("v2.0.0-beta.1");
        assert_eq!(t.pre, Some(PreRelease::new(PreReleaseType::Beta, 1)));
    }

    #[test]
    fn test_tag_parse_requires_v_prefix() {
        let err = ReleaseTag::parse("1.2.3").unwrap_err();
        assert!(err.to_string().contains("1.2.3"));
    }

    #[test]
    fn test_tag_parse_rejects_non_semver() {
        assert!(ReleaseTag::parse("v1.2").is_err());
        assert!(ReleaseTag::parse("vnext").is_err());
        assert!(ReleaseTag::parse("v1.2.3.4").is_err());
    }

    #[test]
    fn test_tag_parse_rejects_loose_prerelease() {
        assert!(ReleaseTag::parse("v1.0.0-alpha").is_err());
        assert!(ReleaseTag::parse("v1.0.0-dev.1").is_err());
        assert!(ReleaseTag::parse("v1.0.0-beta.x").is_err());
        assert!(ReleaseTag::parse("v1.0.0-rc.1.2").is_err());
    }

    #[test]
    fn test_tag_parse_keeps_build_metadata() {
        let t = tag("v1.2.3+build.5");
        assert_eq!(t.to_string(), "v1.2.3+build.5");
        assert_eq!(t.finalized().to_string(), "v1.2.3");
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(ReleaseTag::new(0, 6, 3).to_string(), "v0.6.3");
        assert_eq!(tag("v2.0.0-rc.4").to_string(), "v2.0.0-rc.4");
    }

    #[test]
    fn test_tag_bump() {
        let t = tag("v1.6.3");
        assert_eq!(t.bump(VersionBump::Major).unwrap(), tag("v2.0.0"));
        assert_eq!(t.bump(VersionBump::Minor).unwrap(), tag("v1.7.0"));
        assert_eq!(t.bump(VersionBump::Patch).unwrap(), tag("v1.6.4"));
    }

    #[test]
    fn test_tag_bump_out_of_range() {
        let max = u64::MAX;
        assert!(ReleaseTag::new(max, 0, 0).bump(VersionBump::Major).is_err());
        assert!(ReleaseTag::new(1, max, 0).bump(VersionBump::Minor).is_err());
        assert!(ReleaseTag::new(1, 2, max).bump(VersionBump::Patch).is_err());
        assert_eq!(
            ReleaseTag::new(max, 0, 0).bump(VersionBump::Patch).unwrap(),
            ReleaseTag::new(max, 0, 1)
        );
    }

    #[test]
    fn test_tag_bump_drops_prerelease() {
        assert_eq!(tag("v2.0.0-beta.3").bump(VersionBump::Patch).unwrap(), tag("v2.0.1"));
    }

    #[test]
    fn test_tag_ordering() {
        assert!(tag("v1.0.0-alpha.0") < tag("v1.0.0-alpha.1"));
        assert!(tag("v1.0.0-alpha.1") < tag("v1.0.0-beta.0"));
        assert!(tag("v1.0.0-beta.0") < tag("v1.0.0-rc.0"));
        assert!(tag("v1.0.0-rc.9") < tag("v1.0.0"));
        assert!(tag("v1.0.0") < tag("v1.0.1-alpha.0"));
        assert!(tag("v0.9.9") < tag("v1.0.0-alpha.0"));
    }

    #[test]
    fn test_tag_from_str() {
        let t: ReleaseTag = "v0.3.6".parse().unwrap();
        assert_eq!(t, ReleaseTag::new(0, 3, 6));
    }
}
