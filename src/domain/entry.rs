use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::locations::resolve_location;
use crate::domain::types::{
    Address, Category, CustomerName, CustomerType, EntryId, EntryStatus, MobileNumber,
    Organization, Products, Remarks, TypeConstraintError, lenient_option, lenient_timestamp,
    nullable_string,
};

/// Back-reference to the user who created an entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CreatedBy {
    #[serde(rename = "_id", default, deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub username: String,
}

/// Canonical lead record as returned by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub mobile_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub products: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_option")]
    pub customer_type: Option<CustomerType>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub city: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub organization: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub category: Option<Category>,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub expected_closing_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub follow_up_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub remarks: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<CreatedBy>,
}

impl Entry {
    /// Builds a local record for a draft that the server accepted but whose
    /// canonical form has not been fetched yet.
    pub fn from_draft(id: EntryId, draft: &NewEntry, created_by: Option<CreatedBy>) -> Self {
        Self {
            id,
            customer_name: draft.customer_name.to_string(),
            mobile_number: draft.mobile_number.to_string(),
            products: draft.products.to_string(),
            customer_type: Some(draft.customer_type),
            address: draft.address.to_string(),
            state: draft.state.clone(),
            city: draft.city.clone(),
            organization: draft.organization.to_string(),
            category: Some(draft.category),
            status: draft.status.clone(),
            expected_closing_date: None,
            follow_up_date: None,
            remarks: String::new(),
            created_at: draft.created_at,
            updated_at: None,
            created_by,
        }
    }
}

/// Validated draft sent to the server when adding or importing entries.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub customer_name: CustomerName,
    pub mobile_number: MobileNumber,
    pub products: Products,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub address: Address,
    pub state: String,
    pub city: String,
    pub organization: Organization,
    pub category: Category,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

/// Raw descriptive fields shared by the add form, the edit form and import rows.
#[derive(Clone, Debug, Default)]
pub struct EntryFields<'a> {
    pub customer_name: &'a str,
    pub mobile_number: &'a str,
    pub products: &'a str,
    pub customer_type: &'a str,
    pub address: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub organization: &'a str,
    pub category: &'a str,
}

/// Descriptive fields after validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidFields {
    pub customer_name: CustomerName,
    pub mobile_number: MobileNumber,
    pub products: Products,
    pub customer_type: CustomerType,
    pub address: Address,
    pub state: String,
    pub city: String,
    pub organization: Organization,
    pub category: Category,
}

impl EntryFields<'_> {
    /// Validates every descriptive field and canonicalizes the location.
    pub fn validate(&self) -> Result<ValidFields, TypeConstraintError> {
        let (state, city) = resolve_location(self.state, self.city)?;
        Ok(ValidFields {
            customer_name: CustomerName::new(self.customer_name)?,
            mobile_number: MobileNumber::new(self.mobile_number)?,
            products: Products::new(self.products)?,
            customer_type: self.customer_type.parse()?,
            address: Address::new(self.address)?,
            state: state.to_string(),
            city: city.to_string(),
            organization: Organization::new(self.organization)?,
            category: self.category.parse()?,
        })
    }
}

impl NewEntry {
    #[must_use]
    pub fn new(fields: ValidFields, status: EntryStatus, created_at: DateTime<Utc>) -> Self {
        Self {
            customer_name: fields.customer_name,
            mobile_number: fields.mobile_number,
            products: fields.products,
            customer_type: fields.customer_type,
            address: fields.address,
            state: fields.state,
            city: fields.city,
            organization: fields.organization,
            category: fields.category,
            status,
            created_at,
        }
    }
}

/// Follow-up fields edited from the narrow follow-up form.
#[derive(Clone, Debug, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpUpdate {
    pub status: EntryStatus,
    pub expected_closing_date: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub remarks: Remarks,
}

/// Full replacement of the editable fields of an entry.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub customer_name: CustomerName,
    pub mobile_number: MobileNumber,
    pub products: Products,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub address: Address,
    pub state: String,
    pub city: String,
    pub organization: Organization,
    pub category: Category,
    #[serde(flatten)]
    pub follow_up: FollowUpUpdate,
}

impl UpdateEntry {
    #[must_use]
    pub fn new(fields: ValidFields, follow_up: FollowUpUpdate) -> Self {
        Self {
            customer_name: fields.customer_name,
            mobile_number: fields.mobile_number,
            products: fields.products,
            customer_type: fields.customer_type,
            address: fields.address,
            state: fields.state,
            city: fields.city,
            organization: fields.organization,
            category: fields.category,
            follow_up,
        }
    }
}
