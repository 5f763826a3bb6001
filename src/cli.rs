//! Command line options for the bb-mover tool
use crate::{
    config::MigrateConfig,
    errors::MigrateError,
    logging::{self, LOG_FILE},
    sync::{main_sync, RunSummary},
};
use clap::Parser;
use std::path::{Path, PathBuf};

/// bb-mover - Move Bitbucket repositories to a GitHub organization
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct MigrateCli {
    /// Environment file holding the credentials and organizations
    #[arg(short, long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Run the bb-mover tool with the command line options
/// # Errors
/// Error if the logger, the configuration or the work directory can't be set up
pub async fn migrate_main() -> Result<RunSummary, MigrateError> {
    let args = MigrateCli::parse();
    logging::init(args.verbose, Path::new(LOG_FILE))?;
    let config = match MigrateConfig::try_from_env_file(&args.env_file) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return Err(e);
        }
    };
    log::debug!("Loaded {config:?}");
    main_sync(&config).await
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        MigrateCli::command().debug_assert();
    }

    #[test]
    fn defaults_to_dot_env() {
        let args = MigrateCli::parse_from(["bb-mover"]);
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn counts_verbosity() {
        let args = MigrateCli::parse_from(["bb-mover", "-vv", "--env-file", "prod.env"]);
        assert_eq!(args.env_file, PathBuf::from("prod.env"));
        assert_eq!(args.verbose, 2);
    }
}
