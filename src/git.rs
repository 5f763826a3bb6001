//! Bare mirror clone and mirror push
use std::{fmt, fs::remove_dir_all, path::Path};

use git2::{
    Cred, CredentialType, FetchOptions, PushOptions, ReferenceType, RemoteCallbacks, Repository,
};

use crate::errors::{MigrateError, MigrateErrorKind};

/// Refspec fetching every ref of the source
const MIRROR_REFSPEC: &str = "+refs/*:refs/*";

/// Git remote with its https credentials
#[derive(Clone, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote url, without credentials
    pub url: String,

    /// Username
    pub username: String,

    /// Password or token
    pub password: String,
}

impl fmt::Debug for GitRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRemote")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Git operations needed to move a repository
pub trait GitTransport: Sync + Send {
    /// Bare mirror clone of `remote` into `dest`
    /// # Errors
    /// Error if the clone fails
    fn clone_mirror(&self, remote: &GitRemote, dest: &Path) -> Result<(), MigrateError>;

    /// Force-push every ref of the bare repository at `path` to `remote`
    ///
    /// The remote is expected to be freshly created, so no remote ref is deleted.
    /// # Errors
    /// Error if the push fails or a ref is rejected
    fn push_mirror(&self, path: &Path, remote: &GitRemote) -> Result<(), MigrateError>;
}

/// [`GitTransport`] backed by libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Transport;

/// Callbacks answering credential requests with the remote's user/password
fn remote_callbacks(remote: &GitRemote) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempted = false;
    callbacks.credentials(move |_url, _username_from_url, allowed| {
        if attempted {
            return Err(git2::Error::from_str("authentication rejected"));
        }
        attempted = true;
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            Cred::userpass_plaintext(&remote.username, &remote.password)
        } else {
            Err(git2::Error::from_str("unsupported credential type"))
        }
    });
    callbacks
}

/// Initialise a bare repository at `dest` and fetch every ref of `remote` into it
fn fetch_mirror(remote: &GitRemote, dest: &Path) -> Result<(), MigrateError> {
    let repo = Repository::init_bare(dest)?;
    let mut origin = repo.remote_with_fetch("origin", &remote.url, MIRROR_REFSPEC)?;
    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(remote_callbacks(remote));
    origin.fetch(&[] as &[&str], Some(&mut fetch_opts), None)?;
    match origin.default_branch() {
        Ok(head) => match head.as_str() {
            Some(head) => repo.set_head(head)?,
            None => log::debug!("Default branch of {} is not utf-8", remote.url),
        },
        Err(e) => log::debug!("Unable to read default branch of {}: {e}", remote.url),
    }
    Ok(())
}

impl GitTransport for Git2Transport {
    fn clone_mirror(&self, remote: &GitRemote, dest: &Path) -> Result<(), MigrateError> {
        let result = fetch_mirror(remote, dest);
        if result.is_err() && dest.exists() {
            if let Err(e) = remove_dir_all(dest) {
                log::debug!("Unable to remove partial clone {}: {e}", dest.display());
            }
        }
        result
    }

    fn push_mirror(&self, path: &Path, remote: &GitRemote) -> Result<(), MigrateError> {
        let repo = Repository::open_bare(path)?;
        let mut local_refs = vec![];
        for reference in repo.references()? {
            let reference = reference?;
            if reference.kind() == Some(ReferenceType::Symbolic) {
                continue;
            }
            if let Some(name) = reference.name() {
                local_refs.push(name.to_string());
            }
        }

        let refspecs = mirror_refspecs(&local_refs);
        if refspecs.is_empty() {
            return Ok(());
        }
        let mut git_remote = repo.remote_anonymous(&remote.url)?;
        log::debug!("Pushing {} refspecs to {}", refspecs.len(), remote.url);

        let mut callbacks = remote_callbacks(remote);
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => {
                let text = format!("'{refname}' rejected: {message}");
                Err(git2::Error::from_str(&text))
            }
            None => Ok(()),
        });
        let mut opts = PushOptions::new();
        opts.remote_callbacks(callbacks);
        git_remote
            .push(&refspecs, Some(&mut opts))
            .map_err(|e| MigrateError::with_source(MigrateErrorKind::Push, e))
    }
}

/// Force refspecs pushing every local ref to the same name
pub(crate) fn mirror_refspecs(local_refs: &[String]) -> Vec<String> {
    local_refs
        .iter()
        .map(|name| format!("+{name}:{name}"))
        .collect()
}
