//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, 10-digit
//! mobile numbers, bounded remarks) so that once a value reaches the domain
//! layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of digits in a valid mobile number.
pub const MOBILE_NUMBER_LEN: usize = 10;

/// Maximum number of characters accepted in entry remarks.
pub const MAX_REMARKS_LEN: usize = 500;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Mobile number did not contain exactly ten digits.
    #[error("Mobile number must be exactly 10 digits!")]
    InvalidMobile,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// State is not part of the known state list.
    #[error("unknown state: {0}")]
    UnknownState(String),
    /// City does not belong to the selected state.
    #[error("city {city} does not belong to {state}")]
    CityNotInState { city: String, state: String },
    /// Remarks exceed the allowed length.
    #[error("remarks must be at most {MAX_REMARKS_LEN} characters")]
    RemarksTooLong,
    /// Provided date could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(EntryId, "Server-assigned entry identifier.");
non_empty_string_newtype!(CustomerName, "Customer name enforcing non-empty values.");
non_empty_string_newtype!(Products, "Product description enforcing non-empty values.");
non_empty_string_newtype!(Address, "Free-text address enforcing non-empty values.");
non_empty_string_newtype!(Organization, "Organization name enforcing non-empty values.");
non_empty_string_newtype!(AuthToken, "Bearer token issued by the auth service.");

/// Strips every non-digit character and keeps at most ten digits.
pub fn normalize_mobile(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(MOBILE_NUMBER_LEN)
        .collect()
}

/// Ten-digit mobile number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Normalizes the input and requires exactly ten digits to remain.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_mobile(&value.into());
        if normalized.len() != MOBILE_NUMBER_LEN {
            return Err(TypeConstraintError::InvalidMobile);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for MobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MobileNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MobileNumber> for String {
    fn from(value: MobileNumber) -> Self {
        value.0
    }
}

/// Sanitized follow-up remarks, at most [`MAX_REMARKS_LEN`] characters.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Remarks(String);

impl Remarks {
    /// Sanitizes markup and trims the value. Empty remarks are allowed.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(value.into().trim());
        let sanitized = sanitized.trim();
        if sanitized.chars().count() > MAX_REMARKS_LEN {
            return Err(TypeConstraintError::RemarksTooLong);
        }
        Ok(Self(sanitized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for Remarks {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Remarks> for String {
    fn from(value: Remarks) -> Self {
        value.0
    }
}

/// Lead temperature recorded during follow-up calls.
///
/// Unknown server values are preserved in [`EntryStatus::Other`] so that they
/// survive a round trip and fall into the unclassified summary bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    #[default]
    Unset,
    Maybe,
    Interested,
    NotInterested,
    Other(String),
}

impl EntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EntryStatus::Unset => "",
            EntryStatus::Maybe => "Maybe",
            EntryStatus::Interested => "Interested",
            EntryStatus::NotInterested => "Not Interested",
            EntryStatus::Other(value) => value,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, EntryStatus::Unset)
    }

    /// Drops statuses outside the known set.
    pub fn known_or_unset(self) -> Self {
        match self {
            EntryStatus::Other(_) => EntryStatus::Unset,
            status => status,
        }
    }
}

impl From<&str> for EntryStatus {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "" => EntryStatus::Unset,
            "maybe" => EntryStatus::Maybe,
            "interested" => EntryStatus::Interested,
            "not interested" => EntryStatus::NotInterested,
            _ => EntryStatus::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for EntryStatus {
    fn from(value: String) -> Self {
        EntryStatus::from(value.as_str())
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(EntryStatus::from).unwrap_or_default())
    }
}

/// Relationship of the lead to the business.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CustomerType {
    Customer,
    Partner,
}

impl CustomerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            CustomerType::Customer => "Customer",
            CustomerType::Partner => "Partner",
        }
    }
}

impl FromStr for CustomerType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(CustomerType::Customer),
            "partner" => Ok(CustomerType::Partner),
            "" => Err(TypeConstraintError::EmptyString),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "customer type {other}"
            ))),
        }
    }
}

impl Display for CustomerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sector the lead's organization belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Private,
    Government,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Private => "Private",
            Category::Government => "Government",
        }
    }
}

impl FromStr for Category {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Category::Private),
            "government" => Ok(Category::Government),
            "" => Err(TypeConstraintError::EmptyString),
            other => Err(TypeConstraintError::InvalidValue(format!("category {other}"))),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses RFC 3339 timestamps, naive ISO timestamps and plain `YYYY-MM-DD` or
/// `DD/MM/YYYY` dates into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a form date, treating blank input as "no date".
pub fn parse_optional_date(value: &str) -> Result<Option<DateTime<Utc>>, TypeConstraintError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| TypeConstraintError::InvalidDate(value.trim().to_string()))
}

/// Deserializes blank or unrecognized strings as `None`.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Deserializes optional timestamps sent either as ISO strings, plain dates
/// or empty strings.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Deserializes `null` string fields as empty strings.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
