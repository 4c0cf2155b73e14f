//! Local single-document revision store.
//!
//! Every diagram lives in one JSON document keyed by path. The document is
//! read whole on open and rewritten whole on every save; there is no partial
//! update path.

use std::collections::BTreeMap;
use std::path::PathBuf;

use landgraph_core::Scene;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::envelope;
use crate::error::{Error, Result};
use crate::revision::{RevisionEntry, RevisionStore, require_path};

const LOCAL_BRANCH: &str = "local";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRevision {
    scene: Scene,
    image: String,
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    document: PathBuf,
}

impl LocalStore {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, StoredRevision>> {
        if !self.document.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read(&self.document)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn write_all(&self, revisions: &BTreeMap<String, StoredRevision>) -> Result<()> {
        std::fs::write(&self.document, serde_json::to_vec_pretty(revisions)?)?;
        Ok(())
    }

    /// The decoded scene of one stored revision, without going through the
    /// envelope again.
    pub fn scene(&self, path: &str) -> Result<Option<Scene>> {
        Ok(self.read_all()?.remove(path).map(|entry| entry.scene))
    }
}

impl RevisionStore for LocalStore {
    async fn list_files(&self, _branch: &str) -> Result<Vec<RevisionEntry>> {
        Ok(self
            .read_all()?
            .into_keys()
            .map(|path| RevisionEntry {
                path,
                version: None,
            })
            .collect())
    }

    async fn get_content(&self, path: &str, _branch: &str) -> Result<Vec<u8>> {
        require_path(path)?;
        let mut revisions = self.read_all()?;
        let entry = revisions.remove(path).ok_or_else(|| Error::Api {
            status: 404,
            message: format!("no local revision at {path}"),
        })?;
        Ok(entry.image.into_bytes())
    }

    async fn put_content(
        &self,
        path: &str,
        _branch: &str,
        content: &[u8],
        _message: &str,
        _version: Option<&str>,
    ) -> Result<Option<String>> {
        require_path(path)?;
        let scene = envelope::decode(content)?;
        let image = String::from_utf8(content.to_vec())
            .map_err(|_| Error::decode("revision content is not UTF-8"))?;
        let mut revisions = self.read_all()?;
        revisions.insert(path.to_string(), StoredRevision { scene, image });
        self.write_all(&revisions)?;
        debug!(path, "saved local revision");
        Ok(None)
    }

    async fn delete_content(
        &self,
        path: &str,
        _branch: &str,
        _message: &str,
        _version: Option<&str>,
    ) -> Result<()> {
        require_path(path)?;
        let mut revisions = self.read_all()?;
        revisions.remove(path);
        self.write_all(&revisions)?;
        debug!(path, "deleted local revision");
        Ok(())
    }

    async fn list_branches(&self) -> Result<Vec<String>> {
        Ok(vec![LOCAL_BRANCH.to_string()])
    }
}
