//! GitHub-style revision backend over the repository contents API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::revision::{RevisionEntry, RevisionStore, require_path};
use crate::util::encode_path;

/// Client for one repository, e.g. base URL
/// `https://api.github.com/repos/OWNER/REPO/`.
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    fn files_url(&self, branch: &str) -> String {
        format!("{}git/trees/{branch}?recursive=1", self.base_url)
    }

    fn content_url(&self, path: &str, branch: &str) -> String {
        format!(
            "{}contents/{}?ref={branch}",
            self.base_url,
            encode_path(path)
        )
    }

    fn commit_url(&self, path: &str) -> String {
        format!("{}contents/{}", self.base_url, encode_path(path))
    }

    fn branches_url(&self) -> String {
        format!("{}branches", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl RevisionStore for GitHubStore {
    async fn list_files(&self, branch: &str) -> Result<Vec<RevisionEntry>> {
        let response = self
            .client
            .get(self.files_url(branch))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;

        let tree = body.get("tree").and_then(Value::as_array);
        let entries = tree
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("blob"))
                    .filter_map(|entry| {
                        Some(RevisionEntry {
                            path: entry.get("path")?.as_str()?.to_string(),
                            version: entry
                                .get("sha")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        debug!(branch, count = %tree.map_or(0, Vec::len), "listed GitHub tree");
        Ok(entries)
    }

    async fn get_content(&self, path: &str, branch: &str) -> Result<Vec<u8>> {
        require_path(path)?;
        let response = self
            .client
            .get(self.content_url(path, branch))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github.v3.raw")
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn put_content(
        &self,
        path: &str,
        branch: &str,
        content: &[u8],
        message: &str,
        version: Option<&str>,
    ) -> Result<Option<String>> {
        require_path(path)?;
        let mut body = json!({
            "branch": branch,
            "message": message,
            "content": BASE64.encode(content),
        });
        if let Some(sha) = version {
            body["sha"] = json!(sha);
        }
        let response = self
            .client
            .put(self.commit_url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;
        let reply: Value = Self::check(response).await?.json().await?;
        debug!(path, branch, "committed GitHub revision");
        Ok(reply["content"]["sha"].as_str().map(str::to_string))
    }

    async fn delete_content(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        version: Option<&str>,
    ) -> Result<()> {
        require_path(path)?;
        let body = json!({
            "branch": branch,
            "message": message,
            "sha": version,
        });
        let response = self
            .client
            .delete(self.commit_url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        debug!(path, branch, "deleted GitHub revision");
        Ok(())
    }

    async fn list_branches(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.branches_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let branches: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(branches
            .iter()
            .filter_map(|b| b.get("name")?.as_str().map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GitHubStore {
        GitHubStore::new("https://api.github.com/repos/acme/diagrams", "tok")
    }

    #[test]
    fn base_url_gains_a_trailing_slash() {
        assert_eq!(
            store().files_url("main"),
            "https://api.github.com/repos/acme/diagrams/git/trees/main?recursive=1"
        );
    }

    #[test]
    fn content_url_encodes_the_path_and_pins_the_ref() {
        assert_eq!(
            store().content_url("dir/My Landscape.svg", "dev"),
            "https://api.github.com/repos/acme/diagrams/contents/dir%2FMy%20Landscape.svg?ref=dev"
        );
    }

    #[test]
    fn commit_url_has_no_ref_query() {
        assert_eq!(
            store().commit_url("a.svg"),
            "https://api.github.com/repos/acme/diagrams/contents/a.svg"
        );
        assert_eq!(
            store().branches_url(),
            "https://api.github.com/repos/acme/diagrams/branches"
        );
    }
}
