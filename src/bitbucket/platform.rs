//! Bitbucket Platform
use super::{repo::BitbucketPage, BITBUCKET_API_URL, BITBUCKET_URL, PAGE_LEN};
use crate::{
    errors::{MigrateError, MigrateErrorKind},
    git::GitRemote,
    platform::{PlatformFuture, PlatformType, SourcePlatform},
    utils::git_https_url,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use urlencoding::encode;

/// Bitbucket Platform
#[derive(Debug, Clone)]
pub struct BitbucketPlatform {
    /// Bitbucket username
    username: String,

    /// Bitbucket password or app password
    password: String,

    /// Workspace the repositories are listed from
    organization: String,

    /// Base url of the REST API
    api_url: String,

    /// Reqwest client
    client: reqwest::Client,
}

impl BitbucketPlatform {
    /// Create a new BitbucketPlatform
    pub fn new(username: String, password: String, organization: String) -> Self {
        Self {
            username,
            password,
            organization,
            api_url: BITBUCKET_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Use another API base url
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl SourcePlatform for BitbucketPlatform {
    fn list_repos_page(&self, page: usize) -> PlatformFuture<'_, Vec<String>> {
        Box::pin(async move {
            let url = format!(
                "{}/2.0/repositories/{}",
                self.api_url,
                encode(&self.organization)
            );
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("pagelen", PAGE_LEN.to_string()),
                    ("page", page.to_string()),
                ])
                .basic_auth(&self.username, Some(&self.password))
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, "reqwest")
                .send()
                .await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await?;
                return Err(MigrateError::new(MigrateErrorKind::ListRepos)
                    .with_platform(PlatformType::Bitbucket)
                    .with_text(&format!("page {page} returned {status}: {text}")));
            }
            let text = response.text().await?;
            let page: BitbucketPage = serde_json::from_str(&text)?;
            Ok(page.full_names())
        })
    }

    fn get_organization(&self) -> &str {
        &self.organization
    }

    fn git_remote(&self, name: &str) -> Result<GitRemote, MigrateError> {
        Ok(GitRemote {
            url: git_https_url(BITBUCKET_URL, &self.organization, name)?,
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    fn get_type(&self) -> PlatformType {
        PlatformType::Bitbucket
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn platform(server: &MockServer) -> BitbucketPlatform {
        BitbucketPlatform::new("bob".into(), "app-pass".into(), "acme".into())
            .with_api_url(server.uri())
    }

    #[tokio::test]
    async fn lists_full_names_of_a_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/repositories/acme"))
            .and(query_param("pagelen", "100"))
            .and(query_param("page", "2"))
            .and(basic_auth("bob", "app-pass"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 2,
                "values": [
                    {"full_name": "acme/widgets", "slug": "widgets"},
                    {"full_name": "acme/gears", "slug": "gears"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let names = platform(&server).list_repos_page(2).await.unwrap();
        assert_eq!(names, vec!["acme/widgets", "acme/gears"]);
    }

    #[tokio::test]
    async fn empty_page_yields_no_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/repositories/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": []})))
            .mount(&server)
            .await;

        assert!(platform(&server).list_repos_page(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_failure_is_a_listing_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/repositories/acme"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let err = platform(&server).list_repos_page(1).await.unwrap_err();
        assert_eq!(err.kind(), &MigrateErrorKind::ListRepos);
        assert_eq!(err.platform(), Some(&PlatformType::Bitbucket));
        assert!(err.to_string().contains("bad credentials"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_serde_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/repositories/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = platform(&server).list_repos_page(1).await.unwrap_err();
        assert_eq!(err.kind(), &MigrateErrorKind::Serde);
    }

    #[test]
    fn git_remote_targets_bitbucket() {
        let remote = BitbucketPlatform::new("bob".into(), "app-pass".into(), "acme".into())
            .git_remote("widgets")
            .unwrap();
        assert_eq!(remote.url, "https://bitbucket.org/acme/widgets.git");
        assert_eq!(remote.username, "bob");
        assert_eq!(remote.password, "app-pass");
    }
}
