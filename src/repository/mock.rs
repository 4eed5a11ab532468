//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::entry::{Entry, FollowUpUpdate, NewEntry, UpdateEntry};
use crate::domain::session::{Credentials, Session};
use crate::domain::types::{AuthToken, EntryId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{Authenticator, EntryReader, EntryWriter, SessionStore};

mock! {
    pub Repository {}

    #[async_trait]
    impl EntryReader for Repository {
        async fn list_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<Entry>>;
        async fn fetch_is_admin(&self, token: &AuthToken) -> RepositoryResult<bool>;
        async fn export_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<u8>>;
    }

    #[async_trait]
    impl EntryWriter for Repository {
        async fn create_entry(&self, token: &AuthToken, draft: &NewEntry) -> RepositoryResult<Entry>;
        async fn create_entries(
            &self,
            token: &AuthToken,
            drafts: &[NewEntry],
        ) -> RepositoryResult<()>;
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
        async fn delete_entry(
            &self,
            token: &AuthToken,
            id: &EntryId,
        ) -> RepositoryResult<Vec<EntryId>>;
        async fn delete_entries(
            &self,
            token: &AuthToken,
            ids: &[EntryId],
        ) -> RepositoryResult<Vec<EntryId>>;
    }

    #[async_trait]
    impl Authenticator for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session>;
    }
}

mock! {
    pub Sessions {}

    impl SessionStore for Sessions {
        fn load(&self) -> RepositoryResult<Session>;
        fn save(&self, session: &Session) -> RepositoryResult<()>;
        fn clear(&self) -> RepositoryResult<()>;
    }
}
