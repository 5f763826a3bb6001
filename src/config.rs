//! Configuration handling
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    path::{Path, PathBuf},
};

use crate::errors::{MigrateError, MigrateErrorKind};

/// Bitbucket username
const BB_USERNAME: &str = "BB_USERNAME";
/// Bitbucket password or app password
const BB_PASSWORD: &str = "BB_PASSWORD";
/// Bitbucket workspace
const BB_ORGANIZATION: &str = "BB_ORGANIZATION";
/// Github username
const GH_USERNAME: &str = "GH_USERNAME";
/// Github token
const GH_TOKEN: &str = "GH_TOKEN";
/// Github organization
const GH_ORGANIZATION: &str = "GH_ORGANIZATION";
/// Comma-separated repository names never migrated
const IGNORE_REPOS: &str = "IGNORE_REPOS";

/// Configuration data
#[derive(Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Env file the configuration was read from
    pub env_path: PathBuf,

    /// Bitbucket username
    pub bb_username: String,

    /// Bitbucket password
    pub bb_password: String,

    /// Bitbucket workspace to migrate from
    pub bb_organization: String,

    /// Github username
    pub gh_username: String,

    /// Github token
    pub gh_token: String,

    /// Github organization to migrate to
    pub gh_organization: String,

    /// Repository names excluded from the migration
    pub ignored: BTreeSet<String>,
}

impl MigrateConfig {
    /// Load the configuration from an env file
    ///
    /// Variables already present in the process environment win over the file.
    /// # Errors
    /// Error if the file can't be read or a required value is missing
    pub fn try_from_env_file(env_path: &Path) -> Result<Self, MigrateError> {
        // reads the file without exporting its values into the process environment
        #[allow(deprecated)]
        let iter = dotenv::from_path_iter(env_path).map_err(|e| {
            MigrateError::new(MigrateErrorKind::Config)
                .with_text(&format!("unable to read '{}': {e}", env_path.display()))
        })?;
        let mut file_values = HashMap::new();
        for item in iter {
            let (key, value) = item?;
            file_values.insert(key, value);
        }
        Self::from_lookup(env_path, |key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        })
    }

    /// Build the configuration from a key lookup
    /// # Errors
    /// Error naming every required key that is missing or empty
    pub fn from_lookup(
        env_path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, MigrateError> {
        let mut missing = vec![];
        let mut required = |key: &'static str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                missing.push(key);
                String::new()
            }
        };
        let bb_username = required(BB_USERNAME);
        let bb_password = required(BB_PASSWORD);
        let bb_organization = required(BB_ORGANIZATION);
        let gh_username = required(GH_USERNAME);
        let gh_token = required(GH_TOKEN);
        let gh_organization = required(GH_ORGANIZATION);
        if !missing.is_empty() {
            return Err(MigrateError::new(MigrateErrorKind::Config).with_text(&format!(
                "missing values in '{}': {}",
                env_path.display(),
                missing.join(", ")
            )));
        }
        let ignored = lookup(IGNORE_REPOS)
            .map(|value| parse_ignore_list(&value))
            .unwrap_or_default();
        Ok(MigrateConfig {
            env_path: env_path.to_path_buf(),
            bb_username,
            bb_password,
            bb_organization,
            gh_username,
            gh_token,
            gh_organization,
            ignored,
        })
    }
}

/// Split a comma-separated list of repository names
fn parse_ignore_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Debug for MigrateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrateConfig")
            .field("env_path", &self.env_path)
            .field("bb_username", &self.bb_username)
            .field("bb_password", &"***")
            .field("bb_organization", &self.bb_organization)
            .field("gh_username", &self.gh_username)
            .field("gh_token", &"***")
            .field("gh_organization", &self.gh_organization)
            .field("ignored", &self.ignored)
            .finish()
    }
}
