//! Bitbucket repository listing payloads
use serde::Deserialize;

/// One page of the repository listing
#[derive(Deserialize, Default, Debug, Clone)]
pub struct BitbucketPage {
    /// Repositories of the page
    pub values: Vec<BitbucketRepo>,
}

/// Bitbucket Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub struct BitbucketRepo {
    /// Fully-qualified name, `workspace/slug`
    pub full_name: String,
}

impl BitbucketPage {
    /// Fully-qualified names of the page's repositories
    pub fn full_names(self) -> Vec<String> {
        self.values.into_iter().map(|repo| repo.full_name).collect()
    }
}
