//! Release engine: current and next version of a release branch

pub mod resolver;

pub use resolver::{expected_next_version, is_prerelease_to_final, ReleasePoint, VersionResolver};
