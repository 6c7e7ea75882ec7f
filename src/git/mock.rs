use crate::error::{RelnotesError, Result};
use crate::git::{Committish, GitRef, VersionControl};
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Answers are keyed by the rendered revision string, so a test sets up
/// exactly what `git describe`, `git rev-list` and friends would return for
/// the revisions the engine asks about.
#[derive(Debug, Default)]
pub struct MockRepository {
    current_branch: Option<String>,
    closest_tags: HashMap<String, String>,
    root_commits: HashMap<String, String>,
    upstreams: HashMap<String, String>,
    remote_urls: HashMap<String, String>,
    merge_logs: HashMap<String, String>,
    fail_fetch: bool,
    fetched: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the checked out branch
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = Some(branch.into());
    }

    /// Make `point` describe to `tag`
    pub fn add_closest_tag(&mut self, point: impl Into<String>, tag: impl Into<String>) {
        self.closest_tags.insert(point.into(), tag.into());
    }

    /// Set the root commit reachable from a reference
    pub fn add_root_commit(&mut self, reference: impl Into<String>, commit: impl Into<String>) {
        self.root_commits.insert(reference.into(), commit.into());
    }

    /// Give a local branch an upstream on `remote`
    pub fn add_upstream(&mut self, local_branch: impl Into<String>, remote: impl Into<String>) {
        self.upstreams.insert(local_branch.into(), remote.into());
    }

    /// Set the fetch URL of a remote
    pub fn add_remote_url(&mut self, remote: impl Into<String>, url: impl Into<String>) {
        self.remote_urls.insert(remote.into(), url.into());
    }

    /// Set the raw merge log for the range `start..end`
    pub fn add_merge_log(
        &mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        log: impl Into<String>,
    ) {
        self.merge_logs
            .insert(format!("{}..{}", start.into(), end.into()), log.into());
    }

    /// Make every fetch fail
    pub fn set_fetch_fails(&mut self, fail: bool) {
        self.fail_fetch = fail;
    }

    /// Branches fetched so far
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl VersionControl for MockRepository {
    fn current_branch(&self) -> Result<String> {
        self.current_branch
            .clone()
            .ok_or_else(|| RelnotesError::branch("HEAD is detached, not on a branch"))
    }

    fn closest_tag(&self, point: &Committish) -> Result<String> {
        let point = point.to_string();
        self.closest_tags
            .get(&point)
            .cloned()
            .ok_or_else(|| RelnotesError::tag_not_found(point, "No names found"))
    }

    fn root_commit(&self, reference: &GitRef) -> Result<String> {
        let reference = reference.to_string();
        self.root_commits.get(&reference).cloned().ok_or_else(|| {
            RelnotesError::branch(format!("unknown revision '{}'", reference))
        })
    }

    fn has_upstream(&self, local_branch: &str) -> bool {
        self.upstreams.contains_key(local_branch)
    }

    fn remote_for(&self, local_branch: &str) -> Result<String> {
        self.upstreams.get(local_branch).cloned().ok_or_else(|| {
            RelnotesError::remote(format!("no upstream configured for '{}'", local_branch))
        })
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remote_urls
            .get(remote)
            .cloned()
            .ok_or_else(|| RelnotesError::remote(format!("Cannot find remote '{}'", remote)))
    }

    fn fetch_upstream(&self, local_branch: &str) -> Result<()> {
        let remote = self.remote_for(local_branch)?;
        if self.fail_fetch {
            return Err(RelnotesError::remote(format!(
                "Fetch from '{}' failed",
                remote
            )));
        }
        self.fetched.borrow_mut().push(local_branch.to_string());
        Ok(())
    }

    fn merge_commits_between(&self, start: &Committish, end: &Committish) -> Result<String> {
        let range = Committish::range(start.clone(), end.clone()).to_string();
        self.merge_logs
            .get(&range)
            .cloned()
            .ok_or_else(|| RelnotesError::version(format!("unknown revision range '{}'", range)))
    }
}
