//! Pre-release identifiers for release tags
//!
//! A release tag's pre-release part is always exactly `<kind>.<ordinal>`,
//! e.g. `beta.1` or `rc.0`. A bare kind (`alpha`) or an unknown kind is
//! rejected rather than guessed at.

use crate::error::{RelnotesError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release kind, ordered alpha < beta < rc
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseType {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
}

impl PreReleaseType {
    /// Parse a pre-release kind from its tag token
    ///
    /// Accepts exactly "alpha", "beta" or "rc".
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for PreReleaseType {
    type Err = RelnotesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(PreReleaseType::Alpha),
            "beta" => Ok(PreReleaseType::Beta),
            "rc" => Ok(PreReleaseType::ReleaseCandidate),
            other => Err(RelnotesError::version(format!(
                "unknown pre-release kind '{}' (expected alpha, beta or rc)",
                other
            ))),
        }
    }
}

impl fmt::Display for PreReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseType::Alpha => write!(f, "alpha"),
            PreReleaseType::Beta => write!(f, "beta"),
            PreReleaseType::ReleaseCandidate => write!(f, "rc"),
        }
    }
}

/// Pre-release kind plus its ordinal
///
/// # Examples
/// - "beta.1" -> PreRelease { identifier: Beta, iteration: 1 }
/// - "rc.0" -> PreRelease { identifier: ReleaseCandidate, iteration: 0 }
///
/// Ordering compares the kind first, then the ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreRelease {
    /// The pre-release kind
    pub identifier: PreReleaseType,
    /// Ordinal within the kind, starting at 0
    pub iteration: u64,
}

impl PreRelease {
    /// Create a new pre-release
    pub fn new(identifier: PreReleaseType, iteration: u64) -> Self {
        PreRelease {
            identifier,
            iteration,
        }
    }

    /// First pre-release of the given kind (ordinal 0)
    pub fn first(identifier: PreReleaseType) -> Self {
        PreRelease::new(identifier, 0)
    }

    /// Parse a pre-release from its dotted form
    ///
    /// The input must have exactly two dot-separated parts: a recognized
    /// kind and a numeric ordinal.
    ///
    /// # Examples
    /// ```ignore
    /// let pr = PreRelease::parse("beta.1")?;
    /// assert_eq!(pr.identifier, PreReleaseType::Beta);
    /// assert_eq!(pr.iteration, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(RelnotesError::version("empty pre-release identifier"));
        }

        let parts: Vec<&str> = s.split('.').collect();
        let [kind, ordinal] = parts.as_slice() else {
            return Err(RelnotesError::version(format!(
                "pre-release '{}' must be exactly <kind>.<number>",
                s
            )));
        };

        let identifier = PreReleaseType::parse(kind)?;
        let iteration = ordinal.parse::<u64>().map_err(|_| {
            RelnotesError::version(format!(
                "pre-release '{}' has a non-numeric ordinal '{}'",
                s, ordinal
            ))
        })?;

        Ok(PreRelease {
            identifier,
            iteration,
        })
    }

    /// Next ordinal of the same kind
    pub fn increment_iteration(&self) -> Result<Self> {
        let iteration = self.iteration.checked_add(1).ok_or_else(|| {
            RelnotesError::version(format!("pre-release {} cannot be incremented: out of range", self))
        })?;
        Ok(PreRelease {
            identifier: self.identifier,
            iteration,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.identifier, self.iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerelease_type_parse_known_kinds() {
        assert_eq!(PreReleaseType::parse("alpha").unwrap(), PreReleaseType::Alpha);
        assert_eq!(PreReleaseType::parse("beta").unwrap(), PreReleaseType::Beta);
        assert_eq!(
            PreReleaseType::parse("rc").unwrap(),
            PreReleaseType::ReleaseCandidate
        );
    }

    #[test]
    fn test_prerelease_type_parse_unknown() {
        assert!(PreReleaseType::parse("dev").is_err());
        assert!(PreReleaseType::parse("a").is_err());
        assert!(PreReleaseType::parse("").is_err());
    }

    #[test]
    fn test_prerelease_type_display() {
        assert_eq!(PreReleaseType::Alpha.to_string(), "alpha");
        assert_eq!(PreReleaseType::Beta.to_string(), "beta");
        assert_eq!(PreReleaseType::ReleaseCandidate.to_string(), "rc");
    }

    #[test]
    fn test_prerelease_type_ordering() {
        assert!(PreReleaseType::Alpha < PreReleaseType::Beta);
        assert!(PreReleaseType::Beta < PreReleaseType::ReleaseCandidate);
    }

    #[test]
    fn test_prerelease_parse_with_iteration() {
        let pr = PreRelease::parse("beta.1").unwrap();
        assert_eq!(pr.identifier, PreReleaseType::Beta);
        assert_eq!(pr.iteration, 1);
    }

    #[test]
    fn test_prerelease_parse_rc() {
        let pr = PreRelease::parse("rc.4").unwrap();
        assert_eq!(pr, PreRelease::new(PreReleaseType::ReleaseCandidate, 4));
    }

    #[test]
    fn test_prerelease_parse_requires_ordinal() {
        assert!(PreRelease::parse("alpha").is_err());
    }

    #[test]
    fn test_prerelease_parse_rejects_extra_parts() {
        assert!(PreRelease::parse("beta.1.2").is_err());
    }

    #[test]
    fn test_prerelease_parse_invalid_iteration() {
        assert!(PreRelease::parse("beta.abc").is_err());
        assert!(PreRelease::parse("beta.-1").is_err());
    }

    #[test]
    fn test_prerelease_parse_empty() {
        assert!(PreRelease::parse("").is_err());
    }

    #[test]
    fn test_prerelease_increment() {
        let pr = PreRelease::parse("beta.0").unwrap();
        assert_eq!(pr.increment_iteration().unwrap(), PreRelease::new(PreReleaseType::Beta, 1));
    }

    #[test]
    fn test_prerelease_increment_out_of_range() {
        let pr = PreRelease::new(PreReleaseType::ReleaseCandidate, u64::MAX);
        assert!(pr.increment_iteration().is_err());
    }

    #[test]
    fn test_prerelease_display() {
        assert_eq!(PreRelease::first(PreReleaseType::Alpha).to_string(), "alpha.0");
        assert_eq!(PreRelease::parse("rc.2").unwrap().to_string(), "rc.2");
    }

    #[test]
    fn test_prerelease_ordering() {
        let alpha9 = PreRelease::parse("alpha.9").unwrap();
        let beta0 = PreRelease::parse("beta.0").unwrap();
        let beta1 = PreRelease::parse("beta.1").unwrap();
        assert!(alpha9 < beta0);
        assert!(beta0 < beta1);
    }
}
