//! Migrate repositories from the source platform to the destination platform
use std::{
    collections::BTreeSet,
    fmt,
    fs::{create_dir_all, remove_dir_all},
    path::PathBuf,
};

use reqwest::StatusCode;

use crate::bitbucket::platform::BitbucketPlatform;
use crate::config::MigrateConfig;
use crate::errors::{MigrateError, MigrateErrorKind};
use crate::git::{Git2Transport, GitTransport};
use crate::github::platform::GithubPlatform;
use crate::platform::{DestinationPlatform, SourcePlatform};
use crate::report::{LogReporter, Reporter};
use crate::utils::repo_name;

/// Directory holding the local mirrors, relative to the working directory
pub const REPOS_DIR: &str = "repos";

/// Number of listing pages requested at most
pub const MAX_PAGES: usize = 10;

/// Final state of one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepoOutcome {
    /// Name is in the ignore list
    Ignored,
    /// A local mirror was already there
    AlreadyCloned,
    /// Mirror clone failed
    CloneFailed,
    /// Repository already exists on the destination
    ExistsOnDestination,
    /// Destination lookup failed
    LookupFailed,
    /// Destination repository could not be created
    CreateFailed,
    /// Mirror push failed
    PushFailed,
    /// Repository migrated
    Pushed,
}

impl RepoOutcome {
    /// Every outcome, in state machine order
    pub const ALL: [RepoOutcome; 8] = [
        RepoOutcome::Pushed,
        RepoOutcome::ExistsOnDestination,
        RepoOutcome::Ignored,
        RepoOutcome::AlreadyCloned,
        RepoOutcome::CloneFailed,
        RepoOutcome::LookupFailed,
        RepoOutcome::CreateFailed,
        RepoOutcome::PushFailed,
    ];

    /// Whether the outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RepoOutcome::CloneFailed
                | RepoOutcome::LookupFailed
                | RepoOutcome::CreateFailed
                | RepoOutcome::PushFailed
        )
    }
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RepoOutcome::Ignored => "ignored",
            RepoOutcome::AlreadyCloned => "already cloned",
            RepoOutcome::CloneFailed => "clone failed",
            RepoOutcome::ExistsOnDestination => "already on destination",
            RepoOutcome::LookupFailed => "lookup failed",
            RepoOutcome::CreateFailed => "creation failed",
            RepoOutcome::PushFailed => "push failed",
            RepoOutcome::Pushed => "pushed",
        };
        write!(f, "{text}")
    }
}

/// Outcome of every repository seen during a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Fully-qualified source name and outcome, in processing order
    pub repos: Vec<(String, RepoOutcome)>,
}

impl RunSummary {
    /// Number of repositories with the given outcome
    pub fn count(&self, outcome: RepoOutcome) -> usize {
        self.repos.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Number of failed repositories
    pub fn failures(&self) -> usize {
        self.repos.iter().filter(|(_, o)| o.is_failure()).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} repositories", self.repos.len())?;
        for outcome in RepoOutcome::ALL {
            let count = self.count(outcome);
            if count > 0 {
                write!(f, ", {count} {outcome}")?;
            }
        }
        Ok(())
    }
}

/// Sequential migration of every listed repository
pub struct Migrator<'a> {
    /// Platform the repositories are listed and cloned from
    source: &'a dyn SourcePlatform,

    /// Platform the repositories are created on and pushed to
    destination: &'a dyn DestinationPlatform,

    /// Clone and push implementation
    git: &'a dyn GitTransport,

    /// Progress sink
    reporter: &'a dyn Reporter,

    /// Names never migrated
    ignored: BTreeSet<String>,

    /// Directory holding the local mirrors
    work_dir: PathBuf,

    /// Last listing page requested
    max_pages: usize,
}

impl<'a> Migrator<'a> {
    /// Create a migrator using [`REPOS_DIR`] and [`MAX_PAGES`]
    pub fn new(
        source: &'a dyn SourcePlatform,
        destination: &'a dyn DestinationPlatform,
        git: &'a dyn GitTransport,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            source,
            destination,
            git,
            reporter,
            ignored: BTreeSet::new(),
            work_dir: PathBuf::from(REPOS_DIR),
            max_pages: MAX_PAGES,
        }
    }

    /// Repository names to skip
    pub fn with_ignored(mut self, ignored: BTreeSet<String>) -> Self {
        self.ignored = ignored;
        self
    }

    /// Migrate every listed repository, then remove the work directory
    ///
    /// Page and repository failures are reported and skipped.
    /// # Errors
    /// Error if the work directory can't be created
    pub async fn run(&self) -> Result<RunSummary, MigrateError> {
        create_dir_all(&self.work_dir).map_err(|e| {
            MigrateError::new(MigrateErrorKind::Io).with_text(&format!(
                "unable to create '{}': {e}",
                self.work_dir.display()
            ))
        })?;

        let mut summary = RunSummary::default();
        for page in 1..=self.max_pages {
            let full_names = match self.source.list_repos_page(page).await {
                Ok(full_names) => full_names,
                Err(e) => {
                    self.reporter.error(&format!("Unable to list repositories (page {page}): {e}"));
                    continue;
                }
            };
            if full_names.is_empty() {
                self.reporter.info(&format!("No repositories on page {page}, listing done"));
                break;
            }
            self.reporter.info(&format!(
                "Page {page}: {} repositories from {}",
                full_names.len(),
                self.source.get_type()
            ));
            for full_name in full_names {
                let outcome = self.migrate_repo(&full_name).await;
                summary.repos.push((full_name, outcome));
            }
        }

        self.cleanup();
        self.reporter.info(&format!("Migration finished: {summary}"));
        Ok(summary)
    }

    /// Move one repository, reporting why it stopped
    pub async fn migrate_repo(&self, full_name: &str) -> RepoOutcome {
        let name = repo_name(self.source.get_organization(), full_name);
        self.reporter.info(&format!("Processing {full_name}"));

        if self.ignored.contains(name) {
            self.reporter.warn(&format!("Skipping {full_name}: in the ignore list"));
            return RepoOutcome::Ignored;
        }
        if name.is_empty() {
            self.reporter.error(&format!("Unable to clone {full_name}: empty repository name"));
            return RepoOutcome::CloneFailed;
        }

        let mirror_path = self.work_dir.join(name);
        if mirror_path.exists() {
            self.reporter.info(&format!(
                "Skipping {full_name}: already cloned at '{}'",
                mirror_path.display()
            ));
            return RepoOutcome::AlreadyCloned;
        }

        let cloned = self.source.git_remote(name).and_then(|remote| {
            self.reporter.info(&format!(
                "Cloning '{}' to '{}'",
                remote.url,
                mirror_path.display()
            ));
            self.git.clone_mirror(&remote, &mirror_path)
        });
        if let Err(e) = cloned {
            self.reporter.error(&format!("Unable to clone {full_name}: {e}"));
            return RepoOutcome::CloneFailed;
        }

        let destination_name = format!("{}/{name}", self.destination.get_organization());
        match self.destination.lookup_repo(name).await {
            Ok(status) if status == StatusCode::OK => {
                self.reporter.info(&format!(
                    "Skipping {full_name}: {destination_name} already exists on {}",
                    self.destination.get_type()
                ));
                return RepoOutcome::ExistsOnDestination;
            }
            Ok(status) if status == StatusCode::NOT_FOUND => {}
            Ok(status) => {
                let body = match self.destination.describe_repo(name).await {
                    Ok(body) => body,
                    Err(e) => e.to_string(),
                };
                self.reporter.error(&format!(
                    "Unexpected status {status} looking up {destination_name} for {full_name}: {body}"
                ));
                return RepoOutcome::LookupFailed;
            }
            Err(e) => {
                self.reporter.error(&format!(
                    "Unable to look up {destination_name} for {full_name}: {e}"
                ));
                return RepoOutcome::LookupFailed;
            }
        }

        match self.destination.create_repo(name).await {
            Ok(html_url) => {
                self.reporter.info(&format!("Created {html_url} for {full_name}"));
            }
            Err(e) => {
                self.reporter.error(&format!(
                    "Unable to create {destination_name} for {full_name}: {e}"
                ));
                return RepoOutcome::CreateFailed;
            }
        }

        let pushed = self
            .destination
            .git_remote(name)
            .and_then(|remote| self.git.push_mirror(&mirror_path, &remote));
        match pushed {
            Ok(()) => {
                self.reporter.info(&format!("Pushed {full_name} to {destination_name}"));
                RepoOutcome::Pushed
            }
            Err(e) => {
                self.reporter.error(&format!(
                    "Unable to push {full_name} to {destination_name}: {e}"
                ));
                RepoOutcome::PushFailed
            }
        }
    }

    /// Remove the work directory and every mirror in it
    pub fn cleanup(&self) {
        match remove_dir_all(&self.work_dir) {
            Ok(()) => self
                .reporter
                .info(&format!("Removed '{}'", self.work_dir.display())),
            Err(e) => self.reporter.warn(&format!(
                "Unable to remove '{}': {e}",
                self.work_dir.display()
            )),
        }
    }
}

/// Migrate the configured Bitbucket workspace to the configured Github organization
/// # Errors
/// Error if the work directory can't be created
pub async fn main_sync(config: &MigrateConfig) -> Result<RunSummary, MigrateError> {
    let source = BitbucketPlatform::new(
        config.bb_username.clone(),
        config.bb_password.clone(),
        config.bb_organization.clone(),
    );
    let destination = GithubPlatform::new(
        config.gh_username.clone(),
        config.gh_token.clone(),
        config.gh_organization.clone(),
    );
    log::info!(
        "Migrating {} (bitbucket) to {} (github)",
        config.bb_organization,
        config.gh_organization
    );
    if !config.ignored.is_empty() {
        log::info!(
            "Ignoring {}",
            config.ignored.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    let migrator = Migrator::new(&source, &destination, &Git2Transport, &LogReporter)
        .with_ignored(config.ignored.clone());
    migrator.run().await
}
