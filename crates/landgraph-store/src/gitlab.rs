//! GitLab-style revision backend over the repository files API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::revision::{RevisionEntry, RevisionStore, require_path};
use crate::util::encode_path;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Client for one project, e.g. base URL
/// `https://gitlab.example.com/api/v4/projects/ID/`.
#[derive(Debug, Clone)]
pub struct GitLabStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitLabStore {
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
        format!(
            "{}repository/tree?recursive=true&ref={branch}",
            self.base_url
        )
    }

    fn content_url(&self, path: &str, branch: &str) -> String {
        format!(
            "{}repository/files/{}/raw?ref={branch}",
            self.base_url,
            encode_path(path)
        )
    }

    fn commit_url(&self, path: &str) -> String {
        format!("{}repository/files/{}", self.base_url, encode_path(path))
    }

    fn branches_url(&self) -> String {
        format!("{}repository/branches", self.base_url)
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

impl RevisionStore for GitLabStore {
    async fn list_files(&self, branch: &str) -> Result<Vec<RevisionEntry>> {
        let response = self
            .client
            .get(self.files_url(branch))
            .header(TOKEN_HEADER, self.token.as_str())
            .send()
            .await?;
        let body: Vec<Value> = Self::check(response).await?.json().await?;
        let entries: Vec<RevisionEntry> = body
            .iter()
            .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("blob"))
            .filter_map(|entry| {
                Some(RevisionEntry {
                    path: entry.get("path")?.as_str()?.to_string(),
                    version: entry.get("sha").and_then(Value::as_str).map(str::to_string),
                })
            })
            .collect();
        debug!(branch, count = entries.len(), "listed GitLab tree");
        Ok(entries)
    }

    async fn get_content(&self, path: &str, branch: &str) -> Result<Vec<u8>> {
        require_path(path)?;
        let response = self
            .client
            .get(self.content_url(path, branch))
            .header(TOKEN_HEADER, self.token.as_str())
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
        let body = json!({
            "branch": branch,
            "commit_message": message,
            "encoding": "base64",
            "content": BASE64.encode(content),
        });
        // POST creates, PUT updates; the caller passes a version token (any
        // value here) only when the file already exists.
        let request = if version.is_some() {
            self.client.put(self.commit_url(path))
        } else {
            self.client.post(self.commit_url(path))
        };
        let response = request
            .header(TOKEN_HEADER, self.token.as_str())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        debug!(path, branch, "committed GitLab revision");
        Ok(None)
    }

    async fn delete_content(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        _version: Option<&str>,
    ) -> Result<()> {
        require_path(path)?;
        let body = json!({
            "branch": branch,
            "commit_message": message,
        });
        let response = self
            .client
            .delete(self.commit_url(path))
            .header(TOKEN_HEADER, self.token.as_str())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        debug!(path, branch, "deleted GitLab revision");
        Ok(())
    }

    async fn list_branches(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.branches_url())
            .header(TOKEN_HEADER, self.token.as_str())
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

    fn store() -> GitLabStore {
        GitLabStore::new("https://gitlab.example.com/api/v4/projects/42", "tok")
    }

    #[test]
    fn tree_listing_is_recursive_and_pinned_to_the_ref() {
        assert_eq!(
            store().files_url("main"),
            "https://gitlab.example.com/api/v4/projects/42/repository/tree?recursive=true&ref=main"
        );
    }

    #[test]
    fn file_paths_are_a_single_encoded_segment() {
        assert_eq!(
            store().content_url("dir/diagram.svg", "dev"),
            "https://gitlab.example.com/api/v4/projects/42/repository/files/dir%2Fdiagram.svg/raw?ref=dev"
        );
        assert_eq!(
            store().commit_url("dir/diagram.svg"),
            "https://gitlab.example.com/api/v4/projects/42/repository/files/dir%2Fdiagram.svg"
        );
    }
}
