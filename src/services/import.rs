//! Chunked upload of imported drafts.

use chrono::{DateTime, Utc};

use crate::domain::entry::NewEntry;
use crate::domain::session::Session;
use crate::dto::import::{ChunkFailure, ImportReport};
use crate::forms::import::{ParsedImport, UploadEntriesForm};
use crate::repository::EntryWriter;
use crate::services::{ServiceError, ServiceResult, require_token};

/// Default number of drafts per upload request.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Message shown when no row of the spreadsheet survived validation.
pub const ALL_INVALID: &str = "All records are invalid or incomplete.";

/// Reads and validates the uploaded spreadsheet.
pub fn parse_upload(form: &UploadEntriesForm, now: DateTime<Utc>) -> ServiceResult<ParsedImport> {
    let parsed = form.parse(now).map_err(|err| {
        log::error!("Failed to parse {}: {err}", form.path.display());
        err
    })?;
    if parsed.rejected > 0 {
        log::warn!(
            "{} of {} rows were dropped as invalid",
            parsed.rejected,
            parsed.rejected + parsed.drafts.len()
        );
    }
    Ok(parsed)
}

/// Uploads `drafts` sequentially in chunks of `chunk_size`.
///
/// `on_uploaded` runs after every accepted chunk with the chunk and the
/// running report. A failing chunk is recorded and skipped; later chunks are
/// still sent.
pub async fn upload_in_chunks<R, F>(
    repo: &R,
    session: &Session,
    drafts: &[NewEntry],
    chunk_size: usize,
    mut on_uploaded: F,
) -> ServiceResult<ImportReport>
where
    R: EntryWriter + ?Sized,
    F: FnMut(&[NewEntry], &ImportReport),
{
    if drafts.is_empty() {
        return Err(ServiceError::Form(ALL_INVALID.to_string()));
    }
    let token = require_token(session)?;

    let mut report = ImportReport {
        validated: drafts.len(),
        ..ImportReport::default()
    };

    for (index, chunk) in drafts.chunks(chunk_size.max(1)).enumerate() {
        match repo.create_entries(token, chunk).await {
            Ok(()) => {
                report.uploaded += chunk.len();
                log::info!("{}", report.progress_message());
                on_uploaded(chunk, &report);
            }
            Err(err) => {
                log::error!("Failed to upload chunk {index} ({} entries): {err}", chunk.len());
                report.failed_chunks.push(ChunkFailure {
                    index,
                    len: chunk.len(),
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}
