use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::entry::{Entry, EntryFields, FollowUpUpdate, NewEntry, UpdateEntry};
use crate::domain::types::{EntryStatus, Remarks, parse_optional_date};
use crate::forms::FormError;

/// Form data for adding a new entry.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryForm {
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(length(min = 1))]
    pub mobile_number: String,
    #[validate(length(min = 1))]
    pub products: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub customer_type: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub organization: String,
    #[validate(length(min = 1))]
    pub category: String,
    /// Optional initial status; blank means unset.
    #[serde(default)]
    pub status: String,
}

impl AddEntryForm {
    fn fields(&self) -> EntryFields<'_> {
        EntryFields {
            customer_name: &self.customer_name,
            mobile_number: &self.mobile_number,
            products: &self.products,
            customer_type: &self.customer_type,
            address: &self.address,
            state: &self.state,
            city: &self.city,
            organization: &self.organization,
            category: &self.category,
        }
    }

    /// Validates the form and builds the draft sent to the server.
    pub fn to_new_entry(&self, now: DateTime<Utc>) -> Result<NewEntry, FormError> {
        self.validate()?;
        let fields = self.fields().validate()?;
        Ok(NewEntry::new(
            fields,
            EntryStatus::from(self.status.as_str()),
            now,
        ))
    }
}

/// Form data for the follow-up section of an entry.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub expected_closing_date: String,
    #[serde(default)]
    pub follow_up_date: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub remarks: String,
}

impl FollowUpForm {
    /// Prefills the form with the current follow-up values of `entry`.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            status: entry.status.to_string(),
            expected_closing_date: format_form_date(entry.expected_closing_date.as_ref()),
            follow_up_date: format_form_date(entry.follow_up_date.as_ref()),
            remarks: entry.remarks.clone(),
        }
    }

    pub fn to_follow_up(&self) -> Result<FollowUpUpdate, FormError> {
        self.validate()?;
        Ok(FollowUpUpdate {
            status: EntryStatus::from(self.status.as_str()),
            expected_closing_date: parse_optional_date(&self.expected_closing_date)?,
            follow_up_date: parse_optional_date(&self.follow_up_date)?,
            remarks: Remarks::new(self.remarks.as_str())?,
        })
    }
}

/// Form data for editing every field of an existing entry.
///
/// The status is taken from `follow_up`; `details.status` is ignored.
#[derive(Clone, Debug, Default, Validate)]
pub struct EditEntryForm {
    #[validate(nested)]
    pub details: AddEntryForm,
    #[validate(nested)]
    pub follow_up: FollowUpForm,
}

impl EditEntryForm {
    /// Prefills the form with the stored values of `entry`.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            details: AddEntryForm {
                customer_name: entry.customer_name.clone(),
                mobile_number: entry.mobile_number.clone(),
                products: entry.products.clone(),
                customer_type: entry
                    .customer_type
                    .map(|kind| kind.to_string())
                    .unwrap_or_default(),
                address: entry.address.clone(),
                state: entry.state.clone(),
                city: entry.city.clone(),
                organization: entry.organization.clone(),
                category: entry
                    .category
                    .map(|category| category.to_string())
                    .unwrap_or_default(),
                status: entry.status.to_string(),
            },
            follow_up: FollowUpForm::from_entry(entry),
        }
    }

    pub fn to_update_entry(&self) -> Result<UpdateEntry, FormError> {
        self.validate()?;
        let fields = self.details.fields().validate()?;
        Ok(UpdateEntry::new(fields, self.follow_up.to_follow_up()?))
    }
}

fn format_form_date(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp
        .map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::dashboard::store::tests::entry;
    use crate::domain::types::{Category, CustomerType, MAX_REMARKS_LEN, TypeConstraintError};

    fn add_form() -> AddEntryForm {
        AddEntryForm {
            customer_name: "Asha Rao".to_string(),
            mobile_number: "98765 43210".to_string(),
            products: "Solar panels".to_string(),
            customer_type: "Customer".to_string(),
            address: "12 MG Road".to_string(),
            state: "Karnataka".to_string(),
            city: "Mysuru".to_string(),
            organization: "Rao Traders".to_string(),
            category: "Private".to_string(),
            status: String::new(),
        }
    }

    #[test]
    fn add_form_builds_draft() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        let draft = add_form().to_new_entry(now).unwrap();
        assert_eq!(draft.mobile_number.as_str(), "9876543210");
        assert_eq!(draft.status, EntryStatus::Unset);
        assert_eq!(draft.created_at, now);
    }

    #[test]
    fn add_form_rejects_missing_fields() {
        let mut form = add_form();
        form.organization.clear();
        assert!(matches!(
            form.to_new_entry(Utc::now()),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn add_form_rejects_short_mobile() {
        let mut form = add_form();
        form.mobile_number = "12345".to_string();
        assert!(matches!(
            form.to_new_entry(Utc::now()),
            Err(FormError::TypeConstraint(TypeConstraintError::InvalidMobile))
        ));
    }

    #[test]
    fn add_form_rejects_city_outside_state() {
        let mut form = add_form();
        form.city = "Panaji".to_string();
        assert!(matches!(
            form.to_new_entry(Utc::now()),
            Err(FormError::TypeConstraint(
                TypeConstraintError::CityNotInState { .. }
            ))
        ));
    }

    #[test]
    fn follow_up_form_parses_dates_and_remarks() {
        let form = FollowUpForm {
            status: "Interested".to_string(),
            expected_closing_date: "2025-03-01".to_string(),
            follow_up_date: String::new(),
            remarks: "  call back  ".to_string(),
        };
        let update = form.to_follow_up().unwrap();
        assert_eq!(update.status, EntryStatus::Interested);
        assert!(update.expected_closing_date.is_some());
        assert!(update.follow_up_date.is_none());
        assert_eq!(update.remarks.as_str(), "call back");
    }

    #[test]
    fn follow_up_form_rejects_long_remarks() {
        let form = FollowUpForm {
            remarks: "x".repeat(MAX_REMARKS_LEN + 1),
            ..FollowUpForm::default()
        };
        assert!(matches!(form.to_follow_up(), Err(FormError::Validation(_))));
    }

    #[test]
    fn follow_up_form_accepts_remarks_at_the_limit() {
        let form = FollowUpForm {
            remarks: "x".repeat(MAX_REMARKS_LEN),
            ..FollowUpForm::default()
        };
        assert!(form.validate().is_ok());
        assert_eq!(form.to_follow_up().unwrap().remarks.as_str().len(), MAX_REMARKS_LEN);
    }

    #[test]
    fn edit_form_round_trips_stored_entry() {
        let mut stored = entry("1", "Asha", EntryStatus::Maybe);
        stored.customer_type = Some(CustomerType::Partner);
        stored.category = Some(Category::Government);
        stored.follow_up_date = Some(Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap());

        let mut form = EditEntryForm::from_entry(&stored);
        form.details.customer_name = "Asha Rao".to_string();
        let update = form.to_update_entry().unwrap();

        assert_eq!(update.customer_name.as_str(), "Asha Rao");
        assert_eq!(update.customer_type, CustomerType::Partner);
        assert_eq!(update.follow_up.status, EntryStatus::Maybe);
        assert_eq!(update.follow_up.follow_up_date, stored.follow_up_date);
    }

    #[test]
    fn edit_form_requires_type_and_category() {
        let stored = entry("1", "Asha", EntryStatus::Maybe);
        let form = EditEntryForm::from_entry(&stored);
        assert!(form.to_update_entry().is_err());
    }
}
