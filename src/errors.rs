//! Error handling for the bb-mover crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the bb-mover crate.
#[derive(Debug)]
pub struct MigrateError {
    /// Inner error.
    inner: Box<Inner>,
}

impl MigrateError {
    /// Create a new error.
    pub(crate) fn new(kind: MigrateErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Create a new error of the given kind wrapping a source error.
    pub(crate) fn with_source<E>(kind: MigrateErrorKind, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source.into()),
                platform: None,
            }),
        }
    }

    /// Attach a text message as the source of the error.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach the platform the error comes from.
    pub(crate) fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &MigrateErrorKind {
        &self.inner.kind
    }

    /// Platform the error comes from, if any.
    pub fn platform(&self) -> Option<&PlatformType> {
        self.inner.platform.as_ref()
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the bb-mover crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: MigrateErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// Category of a [`MigrateError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateErrorKind {
    /// Missing or incomplete configuration.
    Config,

    /// Logger could not be installed.
    Logger,

    /// Local filesystem error.
    Io,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error related to Git2.
    Git2,

    /// Listing a page of source repositories failed.
    ListRepos,

    /// Creating the destination repository failed.
    RepoCreation,

    /// Pushing the mirror failed.
    Push,

    /// Anything else.
    Other,
}

impl fmt::Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(platform) = &self.inner.platform {
            write!(f, " ({platform})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for MigrateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<reqwest::Error> for MigrateError {
    fn from(e: reqwest::Error) -> Self {
        Self::with_source(MigrateErrorKind::Reqwest, e)
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source(MigrateErrorKind::Serde, e)
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(e: std::io::Error) -> Self {
        Self::with_source(MigrateErrorKind::Io, e)
    }
}

impl From<git2::Error> for MigrateError {
    fn from(e: git2::Error) -> Self {
        Self::with_source(MigrateErrorKind::Git2, e)
    }
}

impl From<dotenv::Error> for MigrateError {
    fn from(e: dotenv::Error) -> Self {
        Self::with_source(MigrateErrorKind::Config, e)
    }
}

impl From<&str> for MigrateError {
    fn from(text: &str) -> Self {
        Self::new(MigrateErrorKind::Other).with_text(text)
    }
}

impl From<String> for MigrateError {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_platform_and_source() {
        let err = MigrateError::new(MigrateErrorKind::RepoCreation)
            .with_platform(PlatformType::Github)
            .with_text("name already exists");
        assert_eq!(err.to_string(), "RepoCreation (github): name already exists");
        assert_eq!(err.kind(), &MigrateErrorKind::RepoCreation);
        assert!(err.source().is_some());
    }

    #[test]
    fn io_error_maps_to_io_kind() {
        let err: MigrateError = std::io::Error::other("disk full").into();
        assert_eq!(err.kind(), &MigrateErrorKind::Io);
        assert_eq!(err.to_string(), "Io: disk full");
    }
}
