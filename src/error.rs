use thiserror::Error;

/// Unified error type for relnotes operations
#[derive(Error, Debug)]
pub enum RelnotesError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Tag {tag} does not belong to branch {branch}")]
    TagMismatch { tag: String, branch: String },

    #[error("\"New\" version {next} would not be newer than current version {current}")]
    Ordering { current: String, next: String },

    #[error("No tag found starting at {point}: {reason}")]
    TagNotFound { point: String, reason: String },

    #[error(
        "Unable to find first commit on branch {branch} ({commit_error}), \
         also unable to find most recent tag ({tag_error})"
    )]
    NoReleasePoint {
        branch: String,
        tag_error: String,
        commit_error: String,
    },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in relnotes
pub type Result<T> = std::result::Result<T, RelnotesError>;

impl RelnotesError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RelnotesError::Config(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        RelnotesError::Branch(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        RelnotesError::Tag(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        RelnotesError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        RelnotesError::Remote(msg.into())
    }

    /// Create a "no tag reachable" error for the given starting point
    pub fn tag_not_found(point: impl Into<String>, reason: impl Into<String>) -> Self {
        RelnotesError::TagNotFound {
            point: point.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelnotesError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelnotesError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(RelnotesError::version("test")
            .to_string()
            .contains("Version"));
        assert!(RelnotesError::tag("test").to_string().contains("Tag"));
        assert!(RelnotesError::branch("test").to_string().contains("Branch"));
    }

    #[test]
    fn test_mismatch_names_tag_and_branch() {
        let err = RelnotesError::TagMismatch {
            tag: "v0.6.7".to_string(),
            branch: "release-1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v0.6.7"));
        assert!(msg.contains("release-1"));
    }

    #[test]
    fn test_ordering_names_both_versions() {
        let err = RelnotesError::Ordering {
            current: "v2.0.0-beta.0".to_string(),
            next: "v2.0.0-alpha.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v2.0.0-beta.0"));
        assert!(msg.contains("v2.0.0-alpha.0"));
    }

    #[test]
    fn test_no_release_point_reports_both_failures() {
        let err = RelnotesError::NoReleasePoint {
            branch: "release-0.3".to_string(),
            tag_error: "no names found".to_string(),
            commit_error: "bad revision".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("release-0.3"));
        assert!(msg.contains("no names found"));
        assert!(msg.contains("bad revision"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (RelnotesError::config("x"), "Configuration error"),
            (RelnotesError::version("x"), "Version error"),
            (RelnotesError::tag("x"), "Tag error"),
            (RelnotesError::remote("x"), "Remote operation failed"),
            (RelnotesError::tag_not_found("HEAD", "x"), "No tag found"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
