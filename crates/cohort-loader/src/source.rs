//! Data sources
//!
//! A data source maps a dataset name to raw bytes. The resource for dataset
//! `name` is `<base location><name>.csv`.

use async_trait::async_trait;
use cohort_diagnostics::{COH0101, COH0102, COH0103, CohortError, Result};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching dataset bytes
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Human readable location of a dataset, used in logs and errors
    fn location(&self, name: &str) -> String;

    /// Fetch the raw bytes of a dataset
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Fetches datasets over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source rooted at `base_url` with a bounded request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CohortError::source_unavailable(&base_url, format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn location(&self, name: &str) -> String {
        format!("{}{}.csv", self.base_url, name)
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.location(name);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                CohortError::source_unavailable_with(COH0101, &url, format!("request timed out: {e}"))
            } else {
                CohortError::source_unavailable(&url, format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CohortError::source_unavailable_with(
                COH0102,
                &url,
                format!("request failed with status: {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CohortError::source_unavailable(&url, format!("failed to read body: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Reads datasets from the local filesystem
///
/// Like `HttpSource`, the path is the prefix followed by `<name>.csv`, so a
/// directory prefix needs its trailing separator.
#[derive(Debug, Clone)]
pub struct FileSource {
    prefix: String,
}

impl FileSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.csv", self.prefix, name))
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn location(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name);
        tokio::fs::read(&path).await.map_err(|e| {
            let location = path.display().to_string();
            if e.kind() == std::io::ErrorKind::NotFound {
                CohortError::source_unavailable_with(COH0103, location, "file not found")
            } else {
                CohortError::source_unavailable(location, format!("failed to read file: {e}"))
            }
        })
    }
}

/// Holds datasets in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    datasets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset, builder style
    pub fn with(self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Add or replace a dataset
    pub fn insert(&self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.datasets.write().insert(name.into(), contents.into());
    }

    pub fn len(&self) -> usize {
        self.datasets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.read().is_empty()
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn location(&self, name: &str) -> String {
        format!("memory://{name}.csv")
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.datasets.read().get(name).cloned().ok_or_else(|| {
            CohortError::source_unavailable_with(COH0103, self.location(name), "dataset not found")
        })
    }
}

/// Pick a source for a base location
///
/// `http://` and `https://` locations are fetched over HTTP. Anything else
/// is a filesystem prefix, with an optional `file://` scheme.
pub fn source_for(base_location: &str, timeout: Duration) -> Result<Arc<dyn DataSource>> {
    if base_location.starts_with("http://") || base_location.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(base_location, timeout)?))
    } else {
        let root = base_location.strip_prefix("file://").unwrap_or(base_location);
        Ok(Arc::new(FileSource::new(root)))
    }
}
