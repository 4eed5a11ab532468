//! REST implementation of the repository traits.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::domain::entry::{Entry, FollowUpUpdate, NewEntry, UpdateEntry};
use crate::domain::session::{Credentials, Session};
use crate::domain::types::{AuthToken, EntryId};
use crate::models::config::ClientConfig;
use crate::repository::errors::{GENERIC_SERVER_MESSAGE, RepositoryError, RepositoryResult};
use crate::repository::{Authenticator, EntryReader, EntryWriter};

/// Client for the lead API and its auth service.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    api_url: String,
    auth_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntriesPayload {
    List(Vec<Entry>),
    Wrapped { data: Vec<Entry> },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolePayload {
    #[serde(default)]
    is_admin: Option<bool>,
}

#[derive(Deserialize)]
struct EntryPayload {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Entry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletedPayload {
    #[serde(default)]
    deleted_ids: Option<Vec<EntryId>>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [EntryId],
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<LoginUser>,
}

#[derive(Deserialize)]
struct LoginUser {
    #[serde(default, alias = "_id")]
    id: Option<serde_json::Value>,
    #[serde(default)]
    role: Option<String>,
}

impl HttpRepository {
    /// Builds a client with the configured request timeout.
    pub fn new(config: &ClientConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.api_url, &config.auth_url))
    }

    pub fn with_client(client: Client, api_url: &str, auth_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/{path}", self.api_url)
    }

    fn authorized(&self, request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request.bearer_auth(token.as_str())
    }

    async fn send(request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::from_response(status, &body))
    }

    /// Reads a `{ success, data, message }` envelope.
    async fn entry_from(response: Response) -> RepositoryResult<Entry> {
        let status = response.status();
        let payload: EntryPayload = response.json().await?;
        if payload.success == Some(false) {
            return Err(RepositoryError::ServerError {
                status: status.as_u16(),
                message: payload
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            });
        }
        payload
            .data
            .ok_or_else(|| RepositoryError::DecodeError("response has no entry".to_string()))
    }

    /// Ids reported back by a delete call, or `requested` when the body
    /// does not list them.
    async fn deleted_ids(
        response: Response,
        requested: &[EntryId],
    ) -> RepositoryResult<Vec<EntryId>> {
        let body = response.text().await?;
        let reported = serde_json::from_str::<DeletedPayload>(&body)
            .ok()
            .and_then(|payload| payload.deleted_ids);
        Ok(reported.unwrap_or_else(|| requested.to_vec()))
    }
}

#[async_trait]
impl EntryReader for HttpRepository {
    async fn list_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<Entry>> {
        let request = self.authorized(self.client.get(self.api("fetch-entry")), token);
        let payload: EntriesPayload = Self::send(request).await?.json().await?;
        Ok(match payload {
            EntriesPayload::List(entries) | EntriesPayload::Wrapped { data: entries } => entries,
        })
    }

    async fn fetch_is_admin(&self, token: &AuthToken) -> RepositoryResult<bool> {
        let request = self.authorized(self.client.get(self.api("user-role")), token);
        let payload: RolePayload = Self::send(request).await?.json().await?;
        Ok(payload.is_admin.unwrap_or(false))
    }

    async fn export_entries(&self, token: &AuthToken) -> RepositoryResult<Vec<u8>> {
        let request = self.authorized(self.client.get(self.api("export")), token);
        let bytes = Self::send(request).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl EntryWriter for HttpRepository {
    async fn create_entry(&self, token: &AuthToken, draft: &NewEntry) -> RepositoryResult<Entry> {
        let request = self.authorized(self.client.post(self.api("entry")).json(draft), token);
        Self::entry_from(Self::send(request).await?).await
    }

    async fn create_entries(
        &self,
        token: &AuthToken,
        drafts: &[NewEntry],
    ) -> RepositoryResult<()> {
        let request = self.authorized(self.client.post(self.api("entries")).json(drafts), token);
        Self::send(request).await?;
        Ok(())
    }

    async fn update_entry(
        &self,
        token: &AuthToken,
        id: &EntryId,
        update: &UpdateEntry,
    ) -> RepositoryResult<Entry> {
        let url = self.api(&format!("editentry/{id}"));
        let request = self.authorized(self.client.put(url).json(update), token);
        Self::entry_from(Self::send(request).await?).await
    }

    async fn update_follow_up(
        &self,
        token: &AuthToken,
        id: &EntryId,
        update: &FollowUpUpdate,
    ) -> RepositoryResult<Entry> {
        let url = self.api(&format!("editentry/{id}"));
        let request = self.authorized(self.client.put(url).json(update), token);
        Self::entry_from(Self::send(request).await?).await
    }

    async fn delete_entry(&self, token: &AuthToken, id: &EntryId) -> RepositoryResult<Vec<EntryId>> {
        let url = self.api(&format!("deleteentry/{id}"));
        let request = self.authorized(self.client.delete(url), token);
        Self::deleted_ids(Self::send(request).await?, std::slice::from_ref(id)).await
    }

    async fn delete_entries(
        &self,
        token: &AuthToken,
        ids: &[EntryId],
    ) -> RepositoryResult<Vec<EntryId>> {
        let request = self.authorized(
            self.client
                .delete(self.api("deleteentries"))
                .json(&DeleteRequest { ids }),
            token,
        );
        Self::deleted_ids(Self::send(request).await?, ids).await
    }
}

#[async_trait]
impl Authenticator for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session> {
        let url = format!("{}/auth/login", self.auth_url);
        let payload: LoginPayload = Self::send(self.client.post(url).json(credentials))
            .await?
            .json()
            .await?;

        let token = payload
            .token
            .ok_or_else(|| RepositoryError::DecodeError("login response has no token".to_string()))?;
        let token = AuthToken::new(token)?;

        let (user_id, role) = match payload.user {
            Some(user) => (
                user.id.map(|id| match id {
                    serde_json::Value::String(id) => id,
                    other => other.to_string(),
                }),
                user.role,
            ),
            None => (None, None),
        };

        Ok(Session::new(token, user_id, role))
    }
}
