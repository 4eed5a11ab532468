//! Outcome of a bulk import.

use serde::Serialize;

/// A chunk that the server refused or that failed in transit.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Zero-based position of the chunk in the upload sequence.
    pub index: usize,
    pub len: usize,
    pub message: String,
}

/// Accumulated progress of an import run.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    /// Drafts that passed validation.
    pub validated: usize,
    /// Rows dropped before upload.
    pub rejected: usize,
    /// Drafts accepted by the server.
    pub uploaded: usize,
    pub failed_chunks: Vec<ChunkFailure>,
    /// Whether the store was re-fetched after a complete upload.
    pub refreshed: bool,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.validated > 0 && self.uploaded == self.validated
    }

    pub fn progress_message(&self) -> String {
        format!("Uploaded {} of {} entries", self.uploaded, self.validated)
    }
}
