//! Source and destination platform abstractions
use std::{future::Future, pin::Pin};

use reqwest::StatusCode;

use crate::{errors::MigrateError, git::GitRemote};

/// Boxed future returned by platform methods
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MigrateError>> + Send + 'a>>;

/// Platform repositories are read from
pub trait SourcePlatform: Sync + Send {
    /// List the fully-qualified names (`org/name`) of one page of repositories
    fn list_repos_page(&self, page: usize) -> PlatformFuture<'_, Vec<String>>;

    /// Organization the repositories are listed from
    fn get_organization(&self) -> &str;

    /// Authenticated git remote of a repository
    fn git_remote(&self, name: &str) -> Result<GitRemote, MigrateError>;

    /// Platform kind
    fn get_type(&self) -> PlatformType;
}

/// Platform repositories are migrated to
pub trait DestinationPlatform: Sync + Send {
    /// Status code of the repository lookup
    fn lookup_repo(&self, name: &str) -> PlatformFuture<'_, StatusCode>;

    /// Body of the repository lookup, used for diagnostics
    fn describe_repo(&self, name: &str) -> PlatformFuture<'_, String>;

    /// Create a private repository, returning its html url
    fn create_repo(&self, name: &str) -> PlatformFuture<'_, String>;

    /// Organization the repositories are created in
    fn get_organization(&self) -> &str;

    /// Authenticated git remote of a repository
    fn git_remote(&self, name: &str) -> Result<GitRemote, MigrateError>;

    /// Platform kind
    fn get_type(&self) -> PlatformType;
}

/// Supported platforms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformType {
    /// bitbucket.org
    Bitbucket,
    /// github.com
    Github,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Bitbucket => write!(f, "bitbucket"),
            PlatformType::Github => write!(f, "github"),
        }
    }
}
