use crate::error::{MagikarpError, Result};
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository as Git2Repo};
use std::path::Path;
use std::sync::Mutex;

/// Refspec fetching every tag from the remote
const TAGS_REFSPEC: &str = "+refs/tags/*:refs/tags/*";

/// Wrapper around git2::Repository with our tag source interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
    remote: String,
}

impl Git2Repository {
    /// Open or discover a git repository, fetching tags from `remote`
    pub fn open<P: AsRef<Path>>(path: P, remote: impl Into<String>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository::from_git2(repo, remote))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, remote: impl Into<String>) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
            remote: remote.into(),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| MagikarpError::config("git repository lock poisoned"))?;
        f(&repo)
    }
}

/// Credentials callback trying SSH keys from ~/.ssh, then the SSH agent, then
/// the default credential helper.
fn credentials_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

impl super::TagSource for Git2Repository {
    fn fetch_tags(&self) -> Result<()> {
        self.with_repo(|repo| {
            let mut remote = repo.find_remote(&self.remote).map_err(|e| {
                MagikarpError::config(format!("Cannot find remote '{}': {}", self.remote, e))
            })?;

            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(credentials_callbacks());

            tracing::debug!(remote = %self.remote, "Fetching tags");
            remote.fetch(&[TAGS_REFSPEC], Some(&mut fetch_options), None)?;
            Ok(())
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let tags = repo.tag_names(None)?;
            Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
        })
    }
}
