//! Github repository payloads
use serde::{Deserialize, Serialize};

/// Body of the organization repository creation request
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoGithub {
    /// Repository name
    pub name: String,

    /// Repository private status
    pub private: bool,
}

/// Fields read back from the creation response
#[derive(Deserialize, Default, Debug, Clone)]
pub struct CreatedRepoGithub {
    /// Repository URL
    pub html_url: Option<String>,
}

impl CreatedRepoGithub {
    /// Html url of the repository when it lives on `host`
    pub fn html_url_on(&self, host: &str) -> Option<&str> {
        self.html_url
            .as_deref()
            .filter(|html_url| html_url.contains(host))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn creation_request_is_private() {
        let body = serde_json::to_value(CreateRepoGithub {
            name: "widgets".into(),
            private: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"name": "widgets", "private": true}));
    }

    #[test]
    fn html_url_must_be_on_host() {
        let created: CreatedRepoGithub =
            serde_json::from_str(r#"{"id": 1, "html_url": "https://github.com/acme/widgets"}"#)
                .unwrap();
        assert_eq!(
            created.html_url_on("github.com"),
            Some("https://github.com/acme/widgets")
        );
        assert_eq!(created.html_url_on("gitlab.com"), None);

        let missing: CreatedRepoGithub =
            serde_json::from_str(r#"{"message": "Validation Failed"}"#).unwrap();
        assert_eq!(missing.html_url_on("github.com"), None);
    }
}
