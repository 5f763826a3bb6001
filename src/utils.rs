//! Utility functions
use url::Url;

use crate::errors::{MigrateError, MigrateErrorKind};

/// Repository name of a fully-qualified `org/name` source identifier
///
/// The organization prefix is stripped; a name without that prefix keeps its
/// last path segment.
pub fn repo_name<'a>(organization: &str, full_name: &'a str) -> &'a str {
    match full_name
        .strip_prefix(organization)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(name) => name,
        None => full_name.rsplit('/').next().unwrap_or(full_name),
    }
}

/// Https clone url `https://{host}/{org}/{name}.git`
pub(crate) fn git_https_url(
    host: &str,
    organization: &str,
    name: &str,
) -> Result<String, MigrateError> {
    let mut url = Url::parse(&format!("https://{host}"))
        .map_err(|e| MigrateError::with_source(MigrateErrorKind::Other, e))?;
    url.path_segments_mut()
        .map_err(|_| MigrateError::from(format!("'{host}' cannot be a base url")))?
        .pop_if_empty()
        .push(organization)
        .push(&format!("{name}.git"));
    Ok(url.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_organization_prefix() {
        assert_eq!(repo_name("acme", "acme/widgets"), "widgets");
    }

    #[test]
    fn keeps_last_segment_without_prefix() {
        assert_eq!(repo_name("acme", "other/tools"), "tools");
        assert_eq!(repo_name("acme", "plain"), "plain");
    }

    #[test]
    fn prefix_must_be_whole_segment() {
        assert_eq!(repo_name("acme", "acmecorp/lib"), "lib");
    }

    #[test]
    fn https_url_is_built_from_segments() {
        assert_eq!(
            git_https_url("bitbucket.org", "acme", "widgets").unwrap(),
            "https://bitbucket.org/acme/widgets.git"
        );
        assert_eq!(
            git_https_url("github.com", "acme", "a b").unwrap(),
            "https://github.com/acme/a%20b.git"
        );
    }
}
