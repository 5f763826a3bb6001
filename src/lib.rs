//! # bb-mover
//!
//! Move every repository of a Bitbucket workspace to a GitHub organization
//!
//! ## Usage
//!
//! ```txt
//! Usage: bb-mover [OPTIONS]
//!
//! Options:
//!  -e, --env-file <ENV_FILE>  Environment file holding the credentials and organizations [default: .env]
//!  -v, --verbose...           Verbose mode (-v, -vv)
//!  -h, --help                 Print help
//!  -V, --version              Print version
//! ```
//!
//! The env file must define `BB_USERNAME`, `BB_PASSWORD`, `BB_ORGANIZATION`,
//! `GH_USERNAME`, `GH_TOKEN` and `GH_ORGANIZATION`. `IGNORE_REPOS` optionally
//! lists repository names to leave behind.

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod git;
pub(crate) mod logging;
pub(crate) mod platform;
pub(crate) mod report;
pub(crate) mod sync;
pub(crate) mod utils;

mod bitbucket;
mod github;

pub use bitbucket::platform::BitbucketPlatform;
pub use cli::{migrate_main, MigrateCli};
pub use config::MigrateConfig;
pub use errors::{MigrateError, MigrateErrorKind};
pub use git::{Git2Transport, GitRemote, GitTransport};
pub use github::platform::GithubPlatform;
pub use platform::{DestinationPlatform, PlatformFuture, PlatformType, SourcePlatform};
pub use report::{LogReporter, Reporter};
pub use sync::{main_sync, Migrator, RepoOutcome, RunSummary, MAX_PAGES, REPOS_DIR};
pub use utils::repo_name;
