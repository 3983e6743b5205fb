//! Raw text retrieval from the export endpoint (or a saved copy)

use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Source of raw export text
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking GET against the live endpoint. One request, no retries.
#[cfg(feature = "net")]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "net")]
impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("fabric-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "net")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching data from: {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()?
            .error_for_status()?;
        let text = response.text()?;
        debug!("Raw response length: {}", text.len());
        Ok(text)
    }
}

/// Reads a previously saved export; the URL is ignored
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, _url: &str) -> Result<String> {
        info!("Reading export from: {}", self.path.display());
        let text = std::fs::read_to_string(&self.path)?;
        debug!("Raw response length: {}", text.len());
        Ok(text)
    }
}
