//! Configuration model loaded from external sources.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_upload_chunk_size() -> usize {
    1000
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_page_size() -> usize {
    crate::pagination::DEFAULT_ITEMS_PER_PAGE
}

fn default_export_file() -> PathBuf {
    PathBuf::from("entries.xlsx")
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the lead-management client.
pub struct ClientConfig {
    /// Base URL of the entries API, e.g. `http://localhost:4000`.
    pub api_url: String,
    /// Base URL of the auth service; usually the same host as `api_url`.
    pub auth_url: String,
    /// Where the signed-in session is persisted.
    pub session_file: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Drafts per bulk upload request.
    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Default target of `export`.
    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Chunk size, never zero.
    pub fn chunk_size(&self) -> usize {
        self.upload_chunk_size.max(1)
    }
}
