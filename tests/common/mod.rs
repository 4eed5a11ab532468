//! Helpers shared by the integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use pushkind_leads::domain::entry::{EntryFields, NewEntry};
use pushkind_leads::domain::types::{AuthToken, EntryStatus};
use pushkind_leads::repository::HttpRepository;
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn token() -> AuthToken {
    AuthToken::new(TOKEN).unwrap()
}

/// Repository pointed at the mock server for both the API and auth.
pub fn repository(server: &MockServer) -> HttpRepository {
    HttpRepository::with_client(reqwest::Client::new(), &server.uri(), &server.uri())
}

/// Entry as the server serialises it.
pub fn entry_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "customerName": name,
        "mobileNumber": "9876543210",
        "products": "Panels",
        "type": "Customer",
        "address": "MG Road",
        "state": "Karnataka",
        "city": "Mysuru",
        "organization": "Rao",
        "category": "Private",
        "status": status,
        "remarks": null,
        "createdAt": "2025-01-15T09:00:00.000Z",
        "createdBy": { "_id": "u1", "username": "asha" }
    })
}

pub fn draft(name: &str) -> NewEntry {
    let fields = EntryFields {
        customer_name: name,
        mobile_number: "98765 43210",
        products: "Panels",
        customer_type: "Customer",
        address: "MG Road",
        state: "Karnataka",
        city: "Mysuru",
        organization: "Rao",
        category: "Private",
    }
    .validate()
    .unwrap();
    NewEntry::new(
        fields,
        EntryStatus::Unset,
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
    )
}
