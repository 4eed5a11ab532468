//! The lead dashboard: owner of every piece of client-side state.
//!
//! Each operation runs to completion, updates the store only after the server
//! accepted the change, and reports its outcome as a [`Notice`]. Errors never
//! escape a dashboard operation; they are logged and turned into notices.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dashboard::clipboard::{CopyGuard, entry_details, selected_rows};
use crate::dashboard::{
    CallStats, DateRange, EntryStore, FilterCache, FilterState, Selection, SummaryCategory,
};
use crate::debounce::Debouncer;
use crate::domain::entry::{CreatedBy, Entry};
use crate::domain::session::Session;
use crate::domain::types::{EntryId, EntryStatus};
use crate::dto::dashboard::{EntryPage, Notice};
use crate::dto::import::ImportReport;
use crate::forms::auth::LoginForm;
use crate::forms::entry::{AddEntryForm, EditEntryForm, FollowUpForm};
use crate::forms::import::UploadEntriesForm;
use crate::models::config::ClientConfig;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{Authenticator, EntryReader, EntryWriter, SessionStore};
use crate::services::entries::NOTHING_SELECTED;
use crate::services::import::DEFAULT_CHUNK_SIZE;
use crate::services::{ServiceError, ServiceResult, auth, entries, import};

/// Prefix of ids given to imported entries until the next refresh.
pub const LOCAL_ID_PREFIX: &str = "local-";

pub struct Dashboard<R, S> {
    repo: R,
    sessions: S,
    session: Session,
    store: EntryStore,
    filter: FilterState,
    cache: FilterCache,
    selection: Selection,
    search: Debouncer<String>,
    is_admin: bool,
    loading: bool,
    notices: Vec<Notice>,
    chunk_size: usize,
    page_size: usize,
}

impl<R, S> Dashboard<R, S>
where
    R: EntryReader + EntryWriter + Authenticator,
    S: SessionStore,
{
    /// Builds an empty dashboard and restores the saved session.
    pub fn new(repo: R, sessions: S, config: &ClientConfig) -> Self {
        let mut dashboard = Self::with_defaults(repo, sessions);
        dashboard.search = Debouncer::new(config.search_debounce());
        dashboard.chunk_size = config.chunk_size();
        dashboard.page_size = config.page_size.max(1);
        dashboard
    }

    pub fn with_defaults(repo: R, sessions: S) -> Self {
        let mut dashboard = Self {
            repo,
            sessions,
            session: Session::default(),
            store: EntryStore::default(),
            filter: FilterState::default(),
            cache: FilterCache::default(),
            selection: Selection::default(),
            search: Debouncer::default(),
            is_admin: false,
            loading: false,
            notices: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            page_size: DEFAULT_ITEMS_PER_PAGE,
        };
        match auth::current_session(&dashboard.sessions) {
            Ok(session) => dashboard.session = session,
            Err(err) => dashboard.fail("Failed to restore session", err, "Please log in again."),
        }
        dashboard
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drains the notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Records a notice raised outside the dashboard operations.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notify(notice);
    }

    fn notify(&mut self, notice: Notice) {
        log::debug!("{notice}");
        self.notices.push(notice);
    }

    /// Logs `err` and records the notice shown to the user.
    fn fail(&mut self, context: &str, err: ServiceError, fallback: &str) {
        log::error!("{context}: {err}");
        let message = match &err {
            ServiceError::Unauthorized
            | ServiceError::Busy
            | ServiceError::Form(_)
            | ServiceError::TypeConstraint(_) => err.to_string(),
            ServiceError::Repository(RepositoryError::ServerError { message, .. }) => {
                message.clone()
            }
            ServiceError::Repository(RepositoryError::Unauthorized) => err.to_string(),
            ServiceError::NotFound | ServiceError::Repository(_) => fallback.to_string(),
        };
        self.notify(Notice::error(message));
    }

    fn begin(&mut self) -> ServiceResult<()> {
        if self.loading {
            return Err(ServiceError::Busy);
        }
        self.loading = true;
        Ok(())
    }

    fn finish(&mut self) {
        self.loading = false;
    }

    // --- session ---------------------------------------------------------

    /// Signs in; returns whether it succeeded.
    pub async fn login(&mut self, form: &LoginForm) -> bool {
        match auth::login(&self.repo, &self.sessions, form).await {
            Ok(session) => {
                self.session = session;
                self.notify(Notice::success("Login successful!"));
                true
            }
            Err(err) => {
                self.fail("Failed to sign in", err, auth::LOGIN_FAILED);
                false
            }
        }
    }

    /// Forgets the session and every piece of data loaded with it.
    pub fn logout(&mut self) {
        if let Err(err) = auth::logout(&self.sessions) {
            self.fail("Failed to sign out", err, "Failed to log out!");
            return;
        }
        self.session.clear();
        self.store.replace_all(Vec::new());
        self.selection = Selection::Idle;
        self.filter.reset();
        self.is_admin = false;
        self.notify(Notice::success("Logged out."));
    }

    // --- loading ---------------------------------------------------------

    /// Re-fetches the entries and the admin flag.
    pub async fn refresh(&mut self) -> bool {
        if let Err(err) = self.begin() {
            self.fail("Refresh rejected", err, "Failed to fetch entries!");
            return false;
        }
        let loaded = self.reload().await;
        self.finish();
        loaded
    }

    async fn reload(&mut self) -> bool {
        self.is_admin = match entries::load_is_admin(&self.repo, &self.session).await {
            Ok(is_admin) => is_admin,
            Err(err) => {
                log::error!("Failed to fetch admin status: {err}");
                false
            }
        };

        match entries::load_entries(&self.repo, &self.session).await {
            Ok(loaded) => {
                self.store.replace_all(loaded);
                let store = &self.store;
                self.selection = std::mem::take(&mut self.selection).retain(|id| store.contains(id));
                true
            }
            Err(err) => {
                self.fail("Failed to fetch entries", err, "Failed to fetch entries!");
                false
            }
        }
    }

    // --- single entry ----------------------------------------------------

    pub async fn add(&mut self, form: &AddEntryForm, now: DateTime<Utc>) -> Option<EntryId> {
        if let Err(err) = self.begin() {
            self.fail("Add rejected", err, "Something went wrong!");
            return None;
        }
        let result = entries::add_entry(&self.repo, &self.session, form, now).await;
        self.finish();

        match result {
            Ok(mut entry) => {
                if entry.created_by.is_none() {
                    entry.created_by = self.session.user_id().map(|id| CreatedBy {
                        id: id.to_string(),
                        username: String::new(),
                    });
                }
                let id = entry.id.clone();
                self.store.prepend(entry);
                self.notify(Notice::success("Entry added successfully!"));
                Some(id)
            }
            Err(err) => {
                self.fail("Failed to add entry", err, "Something went wrong!");
                None
            }
        }
    }

    /// Form prefilled with the stored values of `id`.
    pub fn edit_form(&self, id: &EntryId) -> Option<EditEntryForm> {
        self.store.get(id).map(EditEntryForm::from_entry)
    }

    /// Follow-up form prefilled with the stored values of `id`.
    pub fn follow_up_form(&self, id: &EntryId) -> Option<FollowUpForm> {
        self.store.get(id).map(FollowUpForm::from_entry)
    }

    pub async fn edit(&mut self, id: &EntryId, form: &EditEntryForm) -> bool {
        if let Err(err) = self.begin() {
            self.fail("Edit rejected", err, "Failed to update entry!");
            return false;
        }
        let result = entries::edit_entry(&self.repo, &self.session, id, form).await;
        self.finish();
        self.apply_update(result, "Entry updated successfully!", "Failed to update entry!")
    }

    pub async fn follow_up(&mut self, id: &EntryId, form: &FollowUpForm) -> bool {
        if let Err(err) = self.begin() {
            self.fail("Follow-up rejected", err, "Failed to update follow-up!");
            return false;
        }
        let result = entries::update_follow_up(&self.repo, &self.session, id, form).await;
        self.finish();
        self.apply_update(
            result,
            "Follow-up updated successfully!",
            "Failed to update follow-up!",
        )
    }

    fn apply_update(&mut self, result: ServiceResult<Entry>, success: &str, fallback: &str) -> bool {
        match result {
            Ok(entry) => {
                if !self.store.replace(entry) {
                    log::warn!("Updated entry is not in the local store");
                }
                self.notify(Notice::success(success));
                true
            }
            Err(err) => {
                self.fail(fallback, err, fallback);
                false
            }
        }
    }

    /// Deletes one entry.
    pub async fn delete(&mut self, id: &EntryId) -> bool {
        let ids = [id.clone()];
        match self.remove(&ids).await {
            Some(_) => {
                self.notify(Notice::success("Entry deleted successfully!"));
                true
            }
            None => false,
        }
    }

    /// Deletes every selected entry and leaves selection mode.
    pub async fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            self.notify(Notice::error(NOTHING_SELECTED));
            return false;
        }
        let ids = self.selection.selected().to_vec();
        match self.remove(&ids).await {
            Some(removed) => {
                self.selection = Selection::Idle;
                self.notify(Notice::success(format!("{removed} entries deleted successfully!")));
                true
            }
            None => false,
        }
    }

    async fn remove(&mut self, ids: &[EntryId]) -> Option<usize> {
        if let Err(err) = self.begin() {
            self.fail("Delete rejected", err, "Failed to delete entries!");
            return None;
        }
        let result = entries::delete_entries(&self.repo, &self.session, ids).await;
        self.finish();

        match result {
            Ok(deleted) => {
                let removed = self.store.remove_ids(&deleted);
                self.selection = std::mem::take(&mut self.selection).forget(&deleted);
                Some(removed)
            }
            Err(err) => {
                self.fail("Failed to delete entries", err, "Failed to delete entries!");
                None
            }
        }
    }

    // --- bulk import / export -------------------------------------------

    /// Imports a spreadsheet, appending each accepted chunk to the store and
    /// re-fetching once everything was uploaded.
    pub async fn import(&mut self, path: &Path, now: DateTime<Utc>) -> Option<ImportReport> {
        let parsed = match import::parse_upload(&UploadEntriesForm::new(path), now) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.fail("Failed to read upload", err, "Failed to upload entries!");
                return None;
            }
        };

        if let Err(err) = self.begin() {
            self.fail("Import rejected", err, "Failed to upload entries!");
            return None;
        }

        let created_by = self.session.user_id().map(|id| CreatedBy {
            id: id.to_string(),
            username: String::new(),
        });
        let store = &mut self.store;
        let notices = &mut self.notices;
        let result = import::upload_in_chunks(
            &self.repo,
            &self.session,
            &parsed.drafts,
            self.chunk_size,
            |chunk, report| {
                store.extend(chunk.iter().filter_map(|draft| {
                    let id = EntryId::new(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4())).ok()?;
                    Some(Entry::from_draft(id, draft, created_by.clone()))
                }));
                notices.push(Notice::info(report.progress_message()));
            },
        )
        .await;

        let mut report = match result {
            Ok(report) => report,
            Err(err) => {
                self.finish();
                self.fail("Failed to upload entries", err, "Failed to upload entries!");
                return None;
            }
        };
        report.rejected = parsed.rejected;

        if report.is_complete() {
            self.notify(Notice::success("All entries uploaded successfully!"));
            report.refreshed = self.reload().await;
        } else {
            self.notify(Notice::error(format!(
                "Failed to upload entries: {}; {} chunk(s) failed",
                report.progress_message(),
                report.failed_chunks.len()
            )));
        }
        self.finish();

        Some(report)
    }

    /// Downloads the server-side export.
    pub async fn export(&mut self) -> Option<Vec<u8>> {
        match entries::export_entries(&self.repo, &self.session).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                self.fail("Failed to export entries", err, "Failed to export entries!");
                None
            }
        }
    }

    // --- filtering -------------------------------------------------------

    /// Records a keystroke in the search box; applied once typing pauses.
    pub fn type_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search.push(term.into(), now);
    }

    /// Applies the pending search term if the quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(term) => {
                self.filter.set_search_term(term);
                true
            }
            None => false,
        }
    }

    /// Applies the pending search term immediately.
    pub fn flush_search(&mut self) {
        if let Some(term) = self.search.flush() {
            self.filter.set_search_term(term);
        }
    }

    pub fn select_status(&mut self, status: Option<EntryStatus>) {
        self.filter.select_status(status);
    }

    pub fn select_category(&mut self, category: SummaryCategory) {
        self.filter.select_category(category);
    }

    pub fn select_state(&mut self, state: impl Into<String>) {
        self.filter.select_state(state);
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.filter.select_city(city);
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.filter.set_date_range(range);
    }

    /// Restores the default filters and leaves selection mode.
    pub fn reset_filters(&mut self) {
        self.search.flush();
        self.filter.reset();
        self.selection = Selection::Idle;
    }

    /// Entries matching the current filters, in store order.
    pub fn visible(&mut self) -> Vec<&Entry> {
        self.cache.view(&self.store, &self.filter)
    }

    /// One page of the filtered table.
    pub fn page(&mut self, page: usize) -> EntryPage {
        let stats = self.stats();
        let visible = self.cache.view(&self.store, &self.filter);
        let total_matching = visible.len();
        EntryPage {
            entries: Paginated::from_items(visible.into_iter().cloned(), page, self.page_size),
            total_matching,
            stats,
            selection_mode: self.selection.is_selection_mode(),
            selected: self.selection.len(),
        }
    }

    /// Call statistics over the whole store; admins only.
    pub fn stats(&self) -> Option<CallStats> {
        self.is_admin
            .then(|| CallStats::from_entries(self.store.entries()))
    }

    // --- selection -------------------------------------------------------

    pub fn double_click(&mut self, id: &EntryId) {
        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.double_click(id, self.is_admin);
    }

    pub fn click(&mut self, id: &EntryId) {
        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.click(id, self.is_admin);
    }

    /// Selects every row of the current filtered view.
    pub fn select_all(&mut self) {
        let is_admin = self.is_admin;
        let visible: Vec<EntryId> = self
            .cache
            .view(&self.store, &self.filter)
            .into_iter()
            .map(|entry| entry.id.clone())
            .collect();
        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.select_all(visible.iter(), is_admin);
    }

    pub fn reset_selection(&mut self) {
        self.selection = std::mem::take(&mut self.selection).reset();
    }

    // --- clipboard -------------------------------------------------------

    /// Tab-separated rows of the selection, if copying is allowed.
    pub fn copy_selected(&mut self) -> Option<String> {
        if self.selection.is_empty() {
            self.notify(Notice::error(NOTHING_SELECTED));
            return None;
        }
        let text = selected_rows(self.store.entries(), &self.selection);
        self.release(text, "Selected entries copied to clipboard!")
    }

    /// Labelled details of one entry.
    pub fn details(&mut self, id: &EntryId) -> Option<String> {
        match self.store.get(id) {
            Some(entry) => Some(entry_details(entry)),
            None => {
                self.fail("Failed to show entry", ServiceError::NotFound, "Entry not found");
                None
            }
        }
    }

    /// Details of one entry for the clipboard, if copying is allowed.
    pub fn copy_details(&mut self, id: &EntryId) -> Option<String> {
        let text = self.details(id)?;
        self.release(text, "Details copied to clipboard!")
    }

    fn release(&mut self, text: String, success: &str) -> Option<String> {
        match CopyGuard::new(self.is_admin).release(text) {
            Ok(text) => {
                self.notify(Notice::success(success));
                Some(text)
            }
            Err(denied) => {
                log::warn!("Copy blocked for user {:?}", self.session.user_id());
                self.notify(Notice::error(denied.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::dashboard::store::tests::entry;
    use crate::domain::entry::{FollowUpUpdate, NewEntry, UpdateEntry};
    use crate::domain::session::Credentials;
    use crate::domain::types::AuthToken;
    use crate::dto::dashboard::NoticeLevel;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::MockSessions;

    /// In-memory server: entries, admin flag and the upload calls it saw.
    #[derive(Default)]
    struct FakeServer {
        entries: Mutex<Vec<Entry>>,
        is_admin: bool,
        uploads: Mutex<Vec<usize>>,
        fail_uploads: bool,
        failing_chunks: Vec<usize>,
        fetches: Mutex<usize>,
    }

    impl FakeServer {
        fn with_entries(entries: Vec<Entry>, is_admin: bool) -> Self {
            Self {
                entries: Mutex::new(entries),
                is_admin,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl EntryReader for FakeServer {
        async fn list_entries(&self, _: &AuthToken) -> RepositoryResult<Vec<Entry>> {
            *self.fetches.lock().unwrap() += 1;
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn fetch_is_admin(&self, _: &AuthToken) -> RepositoryResult<bool> {
            Ok(self.is_admin)
        }

        async fn export_entries(&self, _: &AuthToken) -> RepositoryResult<Vec<u8>> {
            Ok(b"PK".to_vec())
        }
    }

    #[async_trait]
    impl EntryWriter for FakeServer {
        async fn create_entry(&self, _: &AuthToken, draft: &NewEntry) -> RepositoryResult<Entry> {
            let mut entries = self.entries.lock().unwrap();
            let id = EntryId::new(format!("srv-{}", entries.len())).unwrap();
            let created = Entry::from_draft(id, draft, None);
            entries.insert(0, created.clone());
            Ok(created)
        }

        async fn create_entries(&self, _: &AuthToken, drafts: &[NewEntry]) -> RepositoryResult<()> {
            let position = {
                let mut uploads = self.uploads.lock().unwrap();
                uploads.push(drafts.len());
                uploads.len() - 1
            };
            if self.fail_uploads || self.failing_chunks.contains(&position) {
                return Err(RepositoryError::ServerError {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let mut entries = self.entries.lock().unwrap();
            for draft in drafts {
                let id = EntryId::new(format!("srv-{}", entries.len())).unwrap();
                entries.push(Entry::from_draft(id, draft, None));
            }
            Ok(())
        }

        async fn update_entry(
            &self,
            _: &AuthToken,
            id: &EntryId,
            update: &UpdateEntry,
        ) -> RepositoryResult<Entry> {
            let mut entries = self.entries.lock().unwrap();
            let stored = entries
                .iter_mut()
                .find(|entry| &entry.id == id)
                .ok_or(RepositoryError::NotFound)?;
            stored.customer_name = update.customer_name.to_string();
            stored.status = update.follow_up.status.clone();
            Ok(stored.clone())
        }

        async fn update_follow_up(
            &self,
            _: &AuthToken,
            id: &EntryId,
            update: &FollowUpUpdate,
        ) -> RepositoryResult<Entry> {
            let mut entries = self.entries.lock().unwrap();
            let stored = entries
                .iter_mut()
                .find(|entry| &entry.id == id)
                .ok_or(RepositoryError::NotFound)?;
            stored.status = update.status.clone();
            stored.remarks = update.remarks.as_str().to_string();
            Ok(stored.clone())
        }

        async fn delete_entry(&self, token: &AuthToken, id: &EntryId) -> RepositoryResult<Vec<EntryId>> {
            self.delete_entries(token, std::slice::from_ref(id)).await
        }

        async fn delete_entries(
            &self,
            _: &AuthToken,
            ids: &[EntryId],
        ) -> RepositoryResult<Vec<EntryId>> {
            let mut entries = self.entries.lock().unwrap();
            let deleted: Vec<EntryId> = entries
                .iter()
                .filter(|entry| ids.contains(&entry.id))
                .map(|entry| entry.id.clone())
                .collect();
            entries.retain(|entry| !deleted.contains(&entry.id));
            Ok(deleted)
        }
    }

    #[async_trait]
    impl Authenticator for FakeServer {
        async fn login(&self, _: &Credentials) -> RepositoryResult<Session> {
            Ok(Session::new(
                AuthToken::new("tok").unwrap(),
                Some("u1".to_string()),
                None,
            ))
        }
    }

    fn signed_in_sessions() -> MockSessions {
        let mut sessions = MockSessions::new();
        sessions.expect_load().returning(|| {
            Ok(Session::new(
                AuthToken::new("tok").unwrap(),
                Some("u1".to_string()),
                Some("admin".to_string()),
            ))
        });
        sessions
    }

    fn id(value: &str) -> EntryId {
        EntryId::new(value).unwrap()
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("1", "Asha", EntryStatus::Interested),
            entry("2", "Vikram", EntryStatus::Maybe),
            entry("3", "Meera", EntryStatus::NotInterested),
            entry("4", "Zoya", EntryStatus::Unset),
        ]
    }

    async fn loaded(server: FakeServer) -> Dashboard<FakeServer, MockSessions> {
        let mut dashboard = Dashboard::with_defaults(server, signed_in_sessions());
        assert!(dashboard.refresh().await);
        dashboard.take_notices();
        dashboard
    }

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|entry| entry.id.to_string()).collect()
    }

    fn write_import(rows: usize) -> tempfile::NamedTempFile {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "customerName,mobileNumber,products,type,address,state,city,organization,category"
        )
        .unwrap();
        for n in 0..rows {
            writeln!(
                file,
                "Lead {n},98{n:08},Panels,Customer,Street {n},Goa,Panaji,Org,Private"
            )
            .unwrap();
        }
        file
    }

    #[tokio::test]
    async fn refresh_loads_entries_and_role() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;

        assert!(dashboard.is_admin());
        assert_eq!(dashboard.store().len(), 4);
        assert_eq!(dashboard.visible().len(), 4);
        assert_eq!(
            dashboard.stats(),
            Some(CallStats {
                cold: 1,
                warm: 1,
                hot: 1,
                total: 1
            })
        );
    }

    #[tokio::test]
    async fn stats_are_hidden_from_non_admins() {
        let dashboard = loaded(FakeServer::with_entries(sample(), false)).await;
        assert_eq!(dashboard.stats(), None);
    }

    #[tokio::test]
    async fn signed_out_refresh_reports_login_notice() {
        let mut sessions = MockSessions::new();
        sessions.expect_load().returning(|| Ok(Session::default()));
        let mut dashboard = Dashboard::with_defaults(FakeServer::default(), sessions);

        assert!(!dashboard.refresh().await);
        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "You must be logged in to continue.");
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn busy_dashboard_rejects_destructive_calls() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.loading = true;

        assert!(!dashboard.delete(&id("1")).await);
        assert_eq!(dashboard.store().len(), 4);
        assert_eq!(
            dashboard.take_notices()[0].message,
            "Another operation is still in progress."
        );
    }

    #[tokio::test]
    async fn add_prepends_canonical_entry() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        let form = AddEntryForm {
            customer_name: "New Lead".to_string(),
            mobile_number: "9000000001".to_string(),
            products: "Panels".to_string(),
            customer_type: "Partner".to_string(),
            address: "Beach Road".to_string(),
            state: "Goa".to_string(),
            city: "Margao".to_string(),
            organization: "Org".to_string(),
            category: "Government".to_string(),
            status: String::new(),
        };

        let created = dashboard.add(&form, Utc::now()).await.unwrap();

        assert_eq!(dashboard.store().entries()[0].id, created);
        assert_eq!(
            dashboard.store().entries()[0]
                .created_by
                .as_ref()
                .map(|by| by.id.as_str()),
            Some("u1")
        );
        assert_eq!(dashboard.take_notices()[0].level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn follow_up_replaces_entry_in_place() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        let mut form = dashboard.follow_up_form(&id("4")).unwrap();
        form.status = "Interested".to_string();
        form.remarks = "call Monday".to_string();

        assert!(dashboard.follow_up(&id("4"), &form).await);

        let updated = dashboard.store().get(&id("4")).unwrap();
        assert_eq!(updated.status, EntryStatus::Interested);
        assert_eq!(updated.remarks, "call Monday");
        assert_eq!(dashboard.store().entries()[3].id, id("4"));
    }

    #[tokio::test]
    async fn bulk_delete_drops_ids_and_leaves_selection_mode() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.double_click(&id("1"));
        dashboard.click(&id("3"));

        assert!(dashboard.delete_selected().await);

        assert_eq!(ids(&dashboard.visible()), vec!["2", "4"]);
        assert_eq!(dashboard.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn single_delete_forgets_selected_id() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.double_click(&id("1"));
        dashboard.click(&id("2"));

        assert!(dashboard.delete(&id("1")).await);

        assert!(dashboard.selection().is_selection_mode());
        assert_eq!(dashboard.selection().selected(), &[id("2")]);
        assert!(
            dashboard
                .selection()
                .selected()
                .iter()
                .all(|selected| dashboard.store().contains(selected))
        );
    }

    #[tokio::test]
    async fn empty_selection_cannot_be_deleted_or_copied() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;

        assert!(!dashboard.delete_selected().await);
        assert_eq!(dashboard.copy_selected(), None);
        let notices = dashboard.take_notices();
        assert!(notices.iter().all(|notice| notice.message == NOTHING_SELECTED));
        assert_eq!(dashboard.store().len(), 4);
    }

    #[tokio::test]
    async fn non_admin_cannot_select_or_copy() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), false)).await;

        dashboard.double_click(&id("1"));
        assert_eq!(dashboard.selection(), &Selection::Idle);

        assert_eq!(dashboard.copy_details(&id("1")), None);
        assert_eq!(
            dashboard.take_notices()[0].message,
            "You do not have permission to copy data."
        );
        assert!(dashboard.details(&id("1")).is_some());
    }

    #[tokio::test]
    async fn select_all_follows_filtered_view() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.double_click(&id("1"));
        dashboard.select_category(SummaryCategory::Warm);

        dashboard.select_all();

        assert_eq!(dashboard.selection().selected(), &[id("2")]);
        let copied = dashboard.copy_selected().unwrap();
        assert!(copied.starts_with("Vikram\t"));
    }

    #[tokio::test]
    async fn search_applies_after_quiet_period() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        let start = Instant::now();

        dashboard.type_search("M", start);
        dashboard.type_search("Me", start + Duration::from_millis(100));
        assert!(!dashboard.tick(start + Duration::from_millis(200)));
        assert_eq!(dashboard.visible().len(), 4);

        assert!(dashboard.tick(start + Duration::from_millis(400)));
        assert_eq!(ids(&dashboard.visible()), vec!["3"]);
    }

    #[tokio::test]
    async fn reset_filters_restores_defaults_and_selection() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.double_click(&id("1"));
        dashboard.select_state("Goa");
        dashboard.set_date_range(Some(DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )));
        assert!(dashboard.visible().is_empty());

        dashboard.reset_filters();

        assert_eq!(dashboard.filter(), &FilterState::default());
        assert_eq!(dashboard.selection(), &Selection::Idle);
        assert_eq!(dashboard.visible().len(), 4);
    }

    #[tokio::test]
    async fn import_uploads_chunks_and_refreshes() {
        let mut dashboard = loaded(FakeServer::with_entries(Vec::new(), true)).await;
        let file = write_import(1500);
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();

        let report = dashboard.import(file.path(), now).await.unwrap();

        assert_eq!(*dashboard.repo.uploads.lock().unwrap(), vec![1000, 500]);
        assert_eq!(report.uploaded, 1500);
        assert!(report.refreshed);
        assert_eq!(dashboard.store().len(), 1500);
        assert!(
            dashboard
                .store()
                .entries()
                .iter()
                .all(|entry| !entry.id.starts_with(LOCAL_ID_PREFIX))
        );
        assert_eq!(*dashboard.repo.fetches.lock().unwrap(), 2);

        let messages: Vec<String> = dashboard
            .take_notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Uploaded 1000 of 1500 entries",
                "Uploaded 1500 of 1500 entries",
                "All entries uploaded successfully!"
            ]
        );
    }

    #[tokio::test]
    async fn failed_import_keeps_store_and_skips_refresh() {
        let server = FakeServer {
            fail_uploads: true,
            ..FakeServer::with_entries(sample(), true)
        };
        let mut dashboard = loaded(server).await;
        let file = write_import(3);

        let report = dashboard.import(file.path(), Utc::now()).await.unwrap();

        assert_eq!(report.uploaded, 0);
        assert_eq!(report.failed_chunks.len(), 1);
        assert!(!report.refreshed);
        assert_eq!(dashboard.store().len(), 4);
        assert_eq!(*dashboard.repo.fetches.lock().unwrap(), 1);
        assert!(dashboard.take_notices()[0].is_error());
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn partial_import_keeps_accepted_rows_without_refresh() {
        let server = FakeServer {
            failing_chunks: vec![1],
            ..FakeServer::with_entries(sample(), true)
        };
        let mut dashboard = loaded(server).await;
        dashboard.chunk_size = 2;
        let file = write_import(5);

        let report = dashboard.import(file.path(), Utc::now()).await.unwrap();

        assert_eq!(*dashboard.repo.uploads.lock().unwrap(), vec![2, 2, 1]);
        assert_eq!(report.uploaded, 3);
        assert_eq!(report.failed_chunks.len(), 1);
        assert!(!report.refreshed);
        assert_eq!(*dashboard.repo.fetches.lock().unwrap(), 1);

        assert_eq!(dashboard.store().len(), 7);
        let mut local: Vec<_> = dashboard
            .store()
            .entries()
            .iter()
            .filter(|entry| entry.id.as_str().starts_with(LOCAL_ID_PREFIX))
            .map(|entry| entry.customer_name.as_str().to_string())
            .collect();
        local.sort();
        assert_eq!(local, vec!["Lead 0", "Lead 1", "Lead 4"]);

        let notices = dashboard.take_notices();
        let last = notices.last().unwrap();
        assert!(last.is_error());
        assert!(last.message.contains("Uploaded 3 of 5 entries"));
        assert!(!dashboard.is_loading());
    }

    #[tokio::test]
    async fn import_of_only_invalid_rows_makes_no_request() {
        let mut dashboard = loaded(FakeServer::with_entries(Vec::new(), true)).await;
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"customerName,mobileNumber\nAsha,123\n").unwrap();

        assert!(dashboard.import(file.path(), Utc::now()).await.is_none());
        assert!(dashboard.repo.uploads.lock().unwrap().is_empty());
        assert_eq!(
            dashboard.take_notices()[0].message,
            "All records are invalid or incomplete."
        );
    }

    #[tokio::test]
    async fn logout_clears_session_and_data() {
        let mut sessions = signed_in_sessions();
        sessions.expect_clear().times(1).returning(|| Ok(()));
        let mut dashboard = Dashboard::with_defaults(FakeServer::with_entries(sample(), true), sessions);
        assert!(dashboard.refresh().await);

        dashboard.logout();

        assert!(!dashboard.session().is_signed_in());
        assert!(dashboard.store().is_empty());
        assert!(!dashboard.is_admin());
    }

    #[tokio::test]
    async fn page_reports_totals() {
        let mut dashboard = loaded(FakeServer::with_entries(sample(), true)).await;
        dashboard.page_size = 3;

        let second = dashboard.page(2);

        assert_eq!(second.total_matching, 4);
        assert_eq!(second.entries.items.len(), 1);
        assert_eq!(second.entries.total_pages, 2);
        assert!(second.stats.is_some());
    }
}
