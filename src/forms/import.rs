//! Spreadsheet upload parsing for bulk entry import.
//!
//! The first sheet of the workbook (or the CSV file) is read into rows keyed by
//! normalised header names, then every row goes through the same validation as
//! the add-entry form. Rows that fail are counted and dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::{DateTime, Utc};

use crate::domain::entry::{EntryFields, NewEntry};
use crate::domain::types::{EntryStatus, TypeConstraintError, parse_timestamp};
use crate::forms::FormError;

/// One spreadsheet row keyed by normalised header.
pub type ImportRow = HashMap<String, String>;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Lowercases the header and drops everything but letters and digits, so that
/// `customerName`, `Customer Name` and `customer_name` all match.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uploaded spreadsheet.
#[derive(Clone, Debug)]
pub struct UploadEntriesForm {
    pub path: PathBuf,
}

/// Drafts extracted from an upload.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub drafts: Vec<NewEntry>,
    /// Rows dropped because they were incomplete or invalid.
    pub rejected: usize,
}

impl UploadEntriesForm {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the file and converts its rows into validated drafts.
    pub fn parse(&self, now: DateTime<Utc>) -> Result<ParsedImport, FormError> {
        let rows = self.read_rows()?;
        Ok(rows_to_drafts(&rows, now))
    }

    /// Reads the first sheet into header-keyed rows, skipping blank rows.
    pub fn read_rows(&self) -> Result<Vec<ImportRow>, FormError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let table = if extension == "csv" {
            read_csv(&self.path)?
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            read_workbook(&self.path)?
        } else {
            return Err(FormError::UnsupportedFile(self.path.display().to_string()));
        };

        Ok(table_to_rows(table))
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, FormError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record?;
        table.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>, FormError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(FormError::NoSheets)??;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Renders a cell the way it reads in the spreadsheet. Whole floats lose their
/// fraction so that numeric mobile numbers survive.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|value| value.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn table_to_rows(table: Vec<Vec<String>>) -> Vec<ImportRow> {
    let mut lines = table.into_iter();
    let Some(headers) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    lines
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell.trim().to_string()))
                .collect()
        })
        .collect()
}

/// Converts one row into a draft.
pub fn row_to_draft(row: &ImportRow, now: DateTime<Utc>) -> Result<NewEntry, TypeConstraintError> {
    let field = |name: &str| row.get(name).map(String::as_str).unwrap_or_default();

    let fields = EntryFields {
        customer_name: field("customername"),
        mobile_number: field("mobilenumber"),
        products: field("products"),
        customer_type: field("type"),
        address: field("address"),
        state: field("state"),
        city: field("city"),
        organization: field("organization"),
        category: field("category"),
    }
    .validate()?;

    let created_at = parse_timestamp(field("createdat")).unwrap_or(now);
    Ok(NewEntry::new(
        fields,
        EntryStatus::from(field("status")).known_or_unset(),
        created_at,
    ))
}

/// Validates every row, keeping the valid drafts in sheet order.
pub fn rows_to_drafts(rows: &[ImportRow], now: DateTime<Utc>) -> ParsedImport {
    let mut parsed = ParsedImport::default();
    for (index, row) in rows.iter().enumerate() {
        match row_to_draft(row, now) {
            Ok(draft) => parsed.drafts.push(draft),
            Err(err) => {
                // Row 1 is the header.
                log::warn!("Skipping import row {}: {err}", index + 2);
                parsed.rejected += 1;
            }
        }
    }
    parsed
}
