//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod category;
pub mod changelog;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::ReleaseBranch;
pub use category::{classify, ChangeCategory, ClassifiedTitle};
pub use changelog::{ChangeLog, LogEntry};
pub use prerelease::{PreRelease, PreReleaseType};
pub use tag::ReleaseTag;
pub use version::{ReleaseInfo, ReleaseKind, VersionBump};
