//! Text renderings of entries for the clipboard, and the copy protection
//! applied to non-admin users.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::dashboard::selection::Selection;
use crate::domain::entry::Entry;

/// Date format used wherever an entry date is shown to the user.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const NOT_AVAILABLE: &str = "N/A";

pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DISPLAY_DATE_FORMAT).to_string()
}

fn format_optional_date(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map_or_else(|| NOT_AVAILABLE.to_string(), format_date)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { NOT_AVAILABLE } else { value }
}

/// Tab-separated row with the columns visible in the table.
pub fn entry_row(entry: &Entry) -> String {
    [
        entry.customer_name.as_str(),
        entry.mobile_number.as_str(),
        entry.products.as_str(),
        entry.customer_type.map_or("", |kind| kind.as_str()),
        entry.address.as_str(),
        entry.state.as_str(),
        entry.city.as_str(),
        entry.organization.as_str(),
        entry.category.map_or("", |category| category.as_str()),
        &format_date(&entry.created_at),
    ]
    .join("\t")
}

/// Rows of the selected entries, in store order, joined by newlines.
pub fn selected_rows(entries: &[Entry], selection: &Selection) -> String {
    entries
        .iter()
        .filter(|entry| selection.is_selected(&entry.id))
        .map(entry_row)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Labelled multi-line description of a single entry.
pub fn entry_details(entry: &Entry) -> String {
    let status = if entry.status.is_unset() {
        "Not Interested"
    } else {
        entry.status.as_str()
    };
    [
        format!("Date: {}", format_date(&entry.created_at)),
        format!("Customer Name: {}", or_na(&entry.customer_name)),
        format!("Mobile Number: {}", or_na(&entry.mobile_number)),
        format!("Products: {}", or_na(&entry.products)),
        format!(
            "Customer Type: {}",
            entry.customer_type.map_or(NOT_AVAILABLE, |kind| kind.as_str())
        ),
        format!("Address: {}", or_na(&entry.address)),
        format!("City: {}", or_na(&entry.city)),
        format!("State: {}", or_na(&entry.state)),
        format!("Organization: {}", or_na(&entry.organization)),
        format!(
            "Category: {}",
            entry.category.map_or(NOT_AVAILABLE, |category| category.as_str())
        ),
        format!("Status: {status}"),
        format!(
            "Expected Closing Date: {}",
            format_optional_date(entry.expected_closing_date.as_ref())
        ),
        format!(
            "Follow Up Date: {}",
            format_optional_date(entry.follow_up_date.as_ref())
        ),
        format!("Remarks: {}", or_na(&entry.remarks)),
        format!(
            "Updated At: {}",
            format_optional_date(entry.updated_at.as_ref())
        ),
    ]
    .join("\n")
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("You do not have permission to copy data.")]
pub struct CopyDenied;

/// Blocks copying for users without the admin flag.
#[derive(Clone, Copy, Debug)]
pub struct CopyGuard {
    is_admin: bool,
}

impl CopyGuard {
    pub fn new(is_admin: bool) -> Self {
        Self { is_admin }
    }

    /// Releases `text` for the clipboard when copying is allowed.
    pub fn release(&self, text: String) -> Result<String, CopyDenied> {
        if self.is_admin {
            Ok(text)
        } else {
            Err(CopyDenied)
        }
    }
}
