use crate::error::{RelnotesError, Result};
use crate::git::{Committish, GitRef};
use git2::{DescribeFormatOptions, DescribeOptions, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn resolve_commit(&self, rev: &str) -> Result<git2::Commit<'_>> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit)
    }
}

/// Credentials for fetching: SSH keys from `~/.ssh`, then the agent, then defaults
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl super::VersionControl for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(RelnotesError::branch("HEAD is detached, not on a branch"));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| RelnotesError::branch("current branch name is not valid UTF-8"))
    }

    fn closest_tag(&self, point: &Committish) -> Result<String> {
        let rev = point.to_string();
        let not_found = |e: git2::Error| RelnotesError::tag_not_found(&rev, e.message());

        let object = self.repo.revparse_single(&rev).map_err(not_found)?;

        let mut opts = DescribeOptions::new();
        opts.describe_tags();
        let describe = object.describe(&opts).map_err(not_found)?;

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        let tag = describe.format(Some(&format)).map_err(not_found)?;

        debug!(point = %rev, tag = %tag, "closest tag");
        Ok(tag)
    }

    fn root_commit(&self, reference: &GitRef) -> Result<String> {
        let start = self.resolve_commit(&reference.to_string())?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(start.id())?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() == 0 {
                return Ok(commit.id().to_string());
            }
        }

        Err(RelnotesError::branch(format!(
            "no root commit reachable from {}",
            reference
        )))
    }

    fn has_upstream(&self, local_branch: &str) -> bool {
        let reference = GitRef::LocalBranch(local_branch.to_string());
        self.repo
            .branch_upstream_name(&reference.to_string())
            .is_ok()
    }

    fn remote_for(&self, local_branch: &str) -> Result<String> {
        let reference = GitRef::LocalBranch(local_branch.to_string());
        let remote = self
            .repo
            .branch_upstream_remote(&reference.to_string())
            .map_err(|e| {
                RelnotesError::remote(format!(
                    "Cannot find remote for branch '{}': {}",
                    local_branch, e
                ))
            })?;

        remote.as_str().map(str::to_string).ok_or_else(|| {
            RelnotesError::remote(format!(
                "Remote name for branch '{}' is not valid UTF-8",
                local_branch
            ))
        })
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let found = self
            .repo
            .find_remote(remote)
            .map_err(|e| RelnotesError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| RelnotesError::remote(format!("Remote '{}' has no URL", remote)))
    }

    fn fetch_upstream(&self, local_branch: &str) -> Result<()> {
        let remote_name = self.remote_for(local_branch)?;
        let mut remote = self.repo.find_remote(&remote_name).map_err(|e| {
            RelnotesError::remote(format!("Cannot find remote '{}': {}", remote_name, e))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = [refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];
        remote
            .fetch(&refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                RelnotesError::remote(format!("Fetch from '{}' failed: {}", remote_name, e))
            })?;

        debug!(remote = %remote_name, branch = local_branch, "refreshed upstream");
        Ok(())
    }

    fn merge_commits_between(&self, start: &Committish, end: &Committish) -> Result<String> {
        let range = Committish::range(start.clone(), end.clone()).to_string();

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_range(&range)?;

        let mut log = String::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() < 2 {
                continue;
            }

            let message = commit.message().unwrap_or("");
            log.push_str(&format!("commit {}\n{}\n\n", commit.id(), message.trim_end()));
        }

        debug!(range = %range, bytes = log.len(), "collected merge commits");
        Ok(log)
    }
}
