//! Github Platform
use super::{GITHUB_API_HEADER, GITHUB_API_URL, GITHUB_API_VERSION, GITHUB_URL};
use crate::{
    errors::{MigrateError, MigrateErrorKind},
    git::GitRemote,
    github::repo::{CreateRepoGithub, CreatedRepoGithub},
    platform::{DestinationPlatform, PlatformFuture, PlatformType},
    utils::git_https_url,
};
use reqwest::{
    header::{ACCEPT, USER_AGENT},
    RequestBuilder, StatusCode,
};
use urlencoding::encode;

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// Github username
    username: String,

    /// Github token
    token: String,

    /// Organization the repositories are created in
    organization: String,

    /// Base url of the REST API
    api_url: String,

    /// Reqwest client
    client: reqwest::Client,
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    pub fn new(username: String, token: String, organization: String) -> Self {
        Self {
            username,
            token,
            organization,
            api_url: GITHUB_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Use another API base url
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Authentication and API headers shared by every request
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.username, Some(&self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "reqwest")
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
    }

    /// Url of one repository of the organization
    fn repo_url(&self, name: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            encode(&self.organization),
            encode(name)
        )
    }
}

impl DestinationPlatform for GithubPlatform {
    fn lookup_repo(&self, name: &str) -> PlatformFuture<'_, StatusCode> {
        let url = self.repo_url(name);
        Box::pin(async move {
            let response = self.authed(self.client.get(&url)).send().await?;
            Ok(response.status())
        })
    }

    fn describe_repo(&self, name: &str) -> PlatformFuture<'_, String> {
        let url = self.repo_url(name);
        Box::pin(async move {
            let response = self.authed(self.client.get(&url)).send().await?;
            Ok(response.text().await?)
        })
    }

    fn create_repo(&self, name: &str) -> PlatformFuture<'_, String> {
        let body = CreateRepoGithub {
            name: name.to_string(),
            private: true,
        };
        Box::pin(async move {
            let url = format!(
                "{}/orgs/{}/repos",
                self.api_url,
                encode(&self.organization)
            );
            let response = self
                .authed(self.client.post(&url))
                .json(&body)
                .send()
                .await?;
            let text = response.text().await?;
            let created: CreatedRepoGithub = serde_json::from_str(&text).unwrap_or_default();
            match created.html_url_on(GITHUB_URL) {
                Some(html_url) => Ok(html_url.to_string()),
                None => Err(MigrateError::new(MigrateErrorKind::RepoCreation)
                    .with_platform(PlatformType::Github)
                    .with_text(&text)),
            }
        })
    }

    fn get_organization(&self) -> &str {
        &self.organization
    }

    fn git_remote(&self, name: &str) -> Result<GitRemote, MigrateError> {
        Ok(GitRemote {
            url: git_https_url(GITHUB_URL, &self.organization, name)?,
            username: self.username.clone(),
            password: self.token.clone(),
        })
    }

    fn get_type(&self) -> PlatformType {
        PlatformType::Github
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn platform(server: &MockServer) -> GithubPlatform {
        GithubPlatform::new("alice".into(), "ghp_token".into(), "acme".into())
            .with_api_url(server.uri())
    }

    #[tokio::test]
    async fn lookup_returns_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets"))
            .and(basic_auth("alice", "ghp_token"))
            .and(header(GITHUB_API_HEADER, GITHUB_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "widgets"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/gears"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let github = platform(&server);
        assert_eq!(github.lookup_repo("widgets").await.unwrap(), StatusCode::OK);
        assert_eq!(github.lookup_repo("gears").await.unwrap(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn describe_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let body = platform(&server).describe_repo("widgets").await.unwrap();
        assert_eq!(body, "rate limited");
    }

    #[tokio::test]
    async fn create_posts_private_repo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .and(basic_auth("alice", "ghp_token"))
            .and(body_json(json!({"name": "widgets", "private": true})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"html_url": "https://github.com/acme/widgets"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let html_url = platform(&server).create_repo("widgets").await.unwrap();
        assert_eq!(html_url, "https://github.com/acme/widgets");
    }

    #[tokio::test]
    async fn create_without_html_url_fails_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Repository creation failed.",
                "errors": [{"message": "name already exists on this account"}]
            })))
            .mount(&server)
            .await;

        let err = platform(&server).create_repo("widgets").await.unwrap_err();
        assert_eq!(err.kind(), &MigrateErrorKind::RepoCreation);
        assert!(err.to_string().contains("name already exists"));
    }

    #[tokio::test]
    async fn create_with_foreign_html_url_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"html_url": "https://example.com/acme/widgets"})),
            )
            .mount(&server)
            .await;

        let err = platform(&server).create_repo("widgets").await.unwrap_err();
        assert_eq!(err.kind(), &MigrateErrorKind::RepoCreation);
    }

    #[test]
    fn git_remote_uses_token() {
        let remote = GithubPlatform::new("alice".into(), "ghp_token".into(), "acme".into())
            .git_remote("widgets")
            .unwrap();
        assert_eq!(remote.url, "https://github.com/acme/widgets.git");
        assert_eq!(remote.password, "ghp_token");
    }
}
