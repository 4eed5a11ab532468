#![cfg(feature = "client")]

use pushkind_leads::domain::entry::FollowUpUpdate;
use pushkind_leads::domain::session::Credentials;
use pushkind_leads::domain::types::{EntryId, EntryStatus, Remarks};
use pushkind_leads::repository::errors::RepositoryError;
use pushkind_leads::repository::{Authenticator, EntryReader, EntryWriter};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{TOKEN, draft, entry_json, repository, token};

fn id(value: &str) -> EntryId {
    EntryId::new(value).unwrap()
}

#[tokio::test]
async fn list_entries_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fetch-entry"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry_json("a", "Asha", "Interested"),
            entry_json("b", "Vikram", ""),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = repository(&server).list_entries(&token()).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, id("a"));
    assert_eq!(entries[0].status, EntryStatus::Interested);
    assert_eq!(entries[0].remarks, "");
    assert!(entries[1].status.is_unset());
    assert_eq!(
        entries[0].created_by.as_ref().map(|by| by.username.as_str()),
        Some("asha")
    );
}

#[tokio::test]
async fn list_entries_accepts_wrapped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fetch-entry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entry_json("a", "Asha", "Maybe")]
        })))
        .mount(&server)
        .await;

    let entries = repository(&server).list_entries(&token()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, EntryStatus::Maybe);
}

#[tokio::test]
async fn missing_admin_flag_means_not_admin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user-role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(!repository(&server).fetch_is_admin(&token()).await.unwrap());
}

#[tokio::test]
async fn create_entry_reads_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entry"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": entry_json("srv-1", "Asha", ""),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = repository(&server)
        .create_entry(&token(), &draft("Asha"))
        .await
        .unwrap();
    assert_eq!(created.id, id("srv-1"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["customerName"], "Asha");
    assert_eq!(body["mobileNumber"], "9876543210");
    assert_eq!(body["type"], "Customer");
    assert_eq!(body["status"], "");
}

#[tokio::test]
async fn server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entry"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Mobile number already exists" })),
        )
        .mount(&server)
        .await;

    let err = repository(&server)
        .create_entry(&token(), &draft("Asha"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::ServerError { status: 400, .. }));
    assert_eq!(err.to_string(), "Mobile number already exists");
}

#[tokio::test]
async fn unreadable_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = repository(&server)
        .create_entries(&token(), &[draft("Asha")])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Something went wrong!");
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = repository(&server)
        .export_entries(&token())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Unauthorized));
}

#[tokio::test]
async fn bulk_upload_posts_the_whole_chunk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    repository(&server)
        .create_entries(&token(), &[draft("Asha"), draft("Vikram")])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["customerName"], "Vikram");
}

#[tokio::test]
async fn follow_up_update_puts_only_follow_up_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/editentry/a"))
        .and(body_json(json!({
            "status": "Interested",
            "expectedClosingDate": null,
            "followUpDate": null,
            "remarks": "call back",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": entry_json("a", "Asha", "Interested"),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = FollowUpUpdate {
        status: EntryStatus::Interested,
        remarks: Remarks::new("call back").unwrap(),
        ..FollowUpUpdate::default()
    };
    let updated = repository(&server)
        .update_follow_up(&token(), &id("a"), &update)
        .await
        .unwrap();
    assert_eq!(updated.status, EntryStatus::Interested);
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/editentry/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Entry is locked",
        })))
        .mount(&server)
        .await;

    let err = repository(&server)
        .update_follow_up(&token(), &id("a"), &FollowUpUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Entry is locked");
}

#[tokio::test]
async fn bulk_delete_falls_back_to_requested_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/deleteentries"))
        .and(body_json(json!({ "ids": ["a", "b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = repository(&server)
        .delete_entries(&token(), &[id("a"), id("b")])
        .await
        .unwrap();
    assert_eq!(deleted, vec![id("a"), id("b")]);
}

#[tokio::test]
async fn single_delete_uses_reported_ids() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/deleteentry/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deletedIds": ["a"] })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = repository(&server)
        .delete_entry(&token(), &id("a"))
        .await
        .unwrap();
    assert_eq!(deleted, vec![id("a")]);
}

#[tokio::test]
async fn login_builds_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "issued",
            "user": { "_id": "u1", "role": "admin" }
        })))
        .mount(&server)
        .await;

    let session = repository(&server)
        .login(&Credentials {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.token().map(|token| token.as_str()), Some("issued"));
    assert_eq!(session.user_id(), Some("u1"));
    assert_eq!(session.role(), Some("admin"));
}

#[tokio::test]
async fn login_without_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": {} })))
        .mount(&server)
        .await;

    let err = repository(&server)
        .login(&Credentials {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::DecodeError(_)));
}
