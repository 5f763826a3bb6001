//! Bitbucket API module.
pub(crate) mod platform;
pub(crate) mod repo;

/// Bitbucket URL
const BITBUCKET_URL: &str = "bitbucket.org";

/// Bitbucket API URL
const BITBUCKET_API_URL: &str = "https://api.bitbucket.org";

/// Number of repositories requested per page
const PAGE_LEN: usize = 100;
