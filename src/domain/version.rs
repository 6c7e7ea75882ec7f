use crate::error::{RelnotesError, Result};
use std::fmt;
use std::str::FromStr;

use super::prerelease::PreReleaseType;

/// Requested finality of the next release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseKind {
    #[default]
    Final,
    Alpha,
    Beta,
    Candidate,
}

impl ReleaseKind {
    /// The pre-release kind this release maps to, `None` for final releases
    pub fn prerelease_type(&self) -> Option<PreReleaseType> {
        match self {
            ReleaseKind::Final => None,
            ReleaseKind::Alpha => Some(PreReleaseType::Alpha),
            ReleaseKind::Beta => Some(PreReleaseType::Beta),
            ReleaseKind::Candidate => Some(PreReleaseType::ReleaseCandidate),
        }
    }
}

impl FromStr for ReleaseKind {
    type Err = RelnotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "final" => Ok(ReleaseKind::Final),
            "alpha" => Ok(ReleaseKind::Alpha),
            "beta" => Ok(ReleaseKind::Beta),
            "rc" => Ok(ReleaseKind::Candidate),
            other => Err(RelnotesError::version(format!(
                "unknown release type '{}' (expected final, alpha, beta or rc)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prerelease_type() {
            Some(kind) => write!(f, "{}", kind),
            None => write!(f, "final"),
        }
    }
}

/// What kind of release to compute and under which numbering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub kind: ReleaseKind,
    /// Stay on the 0.Y line for breaking changes instead of jumping to 1.0.0
    pub pre10: bool,
}

impl ReleaseInfo {
    pub fn new(kind: ReleaseKind, pre10: bool) -> Self {
        ReleaseInfo { kind, pre10 }
    }
}

impl Default for ReleaseInfo {
    fn default() -> Self {
        ReleaseInfo::new(ReleaseKind::Final, true)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
