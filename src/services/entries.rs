//! Single-entry operations against the lead API.

use chrono::{DateTime, Utc};

use crate::domain::entry::Entry;
use crate::domain::session::Session;
use crate::domain::types::EntryId;
use crate::forms::entry::{AddEntryForm, EditEntryForm, FollowUpForm};
use crate::repository::{EntryReader, EntryWriter};
use crate::services::{ServiceError, ServiceResult, require_token};

/// Message shown when a bulk action is requested with nothing selected.
pub const NOTHING_SELECTED: &str = "No entries selected!";

/// Fetches every entry visible to the signed-in user.
pub async fn load_entries<R>(repo: &R, session: &Session) -> ServiceResult<Vec<Entry>>
where
    R: EntryReader + ?Sized,
{
    let token = require_token(session)?;
    let entries = repo.list_entries(token).await.map_err(|err| {
        log::error!("Failed to fetch entries: {err}");
        err
    })?;
    Ok(entries)
}

/// Asks the server whether the signed-in user is an admin.
pub async fn load_is_admin<R>(repo: &R, session: &Session) -> ServiceResult<bool>
where
    R: EntryReader + ?Sized,
{
    let token = require_token(session)?;
    Ok(repo.fetch_is_admin(token).await?)
}

/// Validates the add form and creates the entry on the server.
pub async fn add_entry<R>(
    repo: &R,
    session: &Session,
    form: &AddEntryForm,
    now: DateTime<Utc>,
) -> ServiceResult<Entry>
where
    R: EntryWriter + ?Sized,
{
    let token = require_token(session)?;
    let draft = form.to_new_entry(now).map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let entry = repo.create_entry(token, &draft).await.map_err(|err| {
        log::error!("Failed to add an entry: {err}");
        err
    })?;
    Ok(entry)
}

/// Replaces every editable field of an entry.
pub async fn edit_entry<R>(
    repo: &R,
    session: &Session,
    id: &EntryId,
    form: &EditEntryForm,
) -> ServiceResult<Entry>
where
    R: EntryWriter + ?Sized,
{
    let token = require_token(session)?;
    let update = form.to_update_entry().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let entry = repo.update_entry(token, id, &update).await.map_err(|err| {
        log::error!("Failed to update entry {id}: {err}");
        err
    })?;
    Ok(entry)
}

/// Updates only the follow-up fields of an entry.
pub async fn update_follow_up<R>(
    repo: &R,
    session: &Session,
    id: &EntryId,
    form: &FollowUpForm,
) -> ServiceResult<Entry>
where
    R: EntryWriter + ?Sized,
{
    let token = require_token(session)?;
    let update = form.to_follow_up()?;

    let entry = repo
        .update_follow_up(token, id, &update)
        .await
        .map_err(|err| {
            log::error!("Failed to update follow-up of {id}: {err}");
            err
        })?;
    Ok(entry)
}

/// Deletes the given entries, returning the ids the server removed.
pub async fn delete_entries<R>(
    repo: &R,
    session: &Session,
    ids: &[EntryId],
) -> ServiceResult<Vec<EntryId>>
where
    R: EntryWriter + ?Sized,
{
    let token = require_token(session)?;
    let deleted = match ids {
        [] => return Err(ServiceError::Form(NOTHING_SELECTED.to_string())),
        [id] => repo.delete_entry(token, id).await,
        many => repo.delete_entries(token, many).await,
    }
    .map_err(|err| {
        log::error!("Failed to delete entries: {err}");
        err
    })?;
    Ok(deleted)
}

/// Downloads the server-side spreadsheet export.
pub async fn export_entries<R>(repo: &R, session: &Session) -> ServiceResult<Vec<u8>>
where
    R: EntryReader + ?Sized,
{
    let token = require_token(session)?;
    let bytes = repo.export_entries(token).await.map_err(|err| {
        log::error!("Failed to export entries: {err}");
        err
    })?;
    Ok(bytes)
}
