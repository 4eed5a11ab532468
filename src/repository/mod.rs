//! Access to the remote lead API and to the locally persisted session.
//!
//! Services depend on the traits below; [`HttpRepository`] talks to the REST
//! API and [`FileSessionStore`] keeps the session on disk.

use async_trait::async_trait;

use crate::domain::entry::{Entry, FollowUpUpdate, NewEntry, UpdateEntry};
use crate::domain::session::{Credentials, Session};
use crate::domain::types::{AuthToken, EntryId};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod session;

pub use http::HttpRepository;
pub use session::FileSessionStore;

#[async_trait]
pub trait EntryReader: Send + Sync {
    /// Every entry visible to the signed-in user, newest first.
    async fn list_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<Entry>>;
    async fn fetch_is_admin(&self, token: &AuthToken) -> RepositoryResult<bool>;
    /// Spreadsheet produced by the server's export endpoint.
    async fn export_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<u8>>;
}

#[async_trait]
pub trait EntryWriter: Send + Sync {
    async fn create_entry(&self, token: &AuthToken, draft: &NewEntry) -> RepositoryResult<Entry>;
    /// Uploads one chunk of drafts.
    async fn create_entries(&self, token: &AuthToken, drafts: &[NewEntry])
    -> RepositoryResult<()>;
    async fn update_entry(
        &self,
        token: &AuthToken,
        id: &EntryId,
        update: &UpdateEntry,
    ) -> RepositoryResult<Entry>;
    async fn update_follow_up(
        &self,
        token: &AuthToken,
        id: &EntryId,
        update: &FollowUpUpdate,
    ) -> RepositoryResult<Entry>;
    /// Returns the ids the server reports as deleted.
    async fn delete_entry(&self, token: &AuthToken, id: &EntryId) -> RepositoryResult<Vec<EntryId>>;
    /// Returns the ids the server reports as deleted.
    async fn delete_entries(
        &self,
        token: &AuthToken,
        ids: &[EntryId],
    ) -> RepositoryResult<Vec<EntryId>>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session>;
}

/// Persistence of the signed-in session between runs.
pub trait SessionStore {
    /// Returns an empty session when nothing has been saved yet.
    fn load(&self) -> RepositoryResult<Session>;
    fn save(&self, session: &Session) -> RepositoryResult<()>;
    fn clear(&self) -> RepositoryResult<()>;
}
