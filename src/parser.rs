// Guest list parser
// Comma-separated text with a loosely named header row → RawRow values

use crate::error::{LookupError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// Rows shorter than this are never guests, whatever the column layout
const MIN_FIELDS: usize = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// ColumnLayout - which header position plays which role
///
/// Roles are found by case-insensitive substring match on the header names,
/// first match in header order wins:
/// - identifier: "nfc" or "id"
/// - name: "name"
/// - table: "table"
/// - pairing (optional): "person" and "meet"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub identifier: usize,
    pub name: usize,
    pub table: usize,
    pub pairing: Option<usize>,
}

impl ColumnLayout {
    /// Resolve column roles from header names
    ///
    /// # Returns
    /// * `Ok(ColumnLayout)` - all three required roles were found
    /// * `Err(LookupError::Schema)` - lists every required role that is missing
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let lowered: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();

        let identifier = first_header(&lowered, |h| h.contains("nfc") || h.contains("id"));
        let name = first_header(&lowered, |h| h.contains("name"));
        let table = first_header(&lowered, |h| h.contains("table"));
        let pairing = first_header(&lowered, |h| h.contains("person") && h.contains("meet"));

        match (identifier, name, table) {
            (Some(identifier), Some(name), Some(table)) => Ok(ColumnLayout {
                identifier,
                name,
                table,
                pairing,
            }),
            _ => {
                let mut missing = Vec::new();
                if identifier.is_none() {
                    missing.push("identifier");
                }
                if name.is_none() {
                    missing.push("name");
                }
                if table.is_none() {
                    missing.push("table");
                }
                Err(LookupError::Schema { missing })
            }
        }
    }

    /// Minimum number of fields a data row needs to carry all required roles
    pub fn min_fields(&self) -> usize {
        let highest = self.identifier.max(self.name).max(self.table);
        (highest + 1).max(MIN_FIELDS)
    }

    pub fn has_pairing(&self) -> bool {
        self.pairing.is_some()
    }
}

fn first_header(lowered: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    lowered.iter().position(|h| pred(h.as_str()))
}

/// RawRow - one accepted data row, before it becomes a GuestRecord
///
/// `pairing` is whatever was typed into the "person to meet" column: an
/// identifier or a guest name. It is resolved later against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub identifier: String,
    pub name: String,
    pub table: String,
    pub pairing: Option<String>,

    /// Line in the source text (1-indexed, header included)
    pub line_number: usize,
}

impl RawRow {
    pub fn new(identifier: String, name: String, table: String, line_number: usize) -> Self {
        RawRow {
            identifier,
            name,
            table,
            pairing: None,
            line_number,
        }
    }

    /// Builder pattern: add the raw "person to meet" value
    pub fn with_pairing(mut self, pairing: String) -> Self {
        self.pairing = Some(pairing);
        self
    }
}

/// GuestSheet - output of `parse()`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestSheet {
    /// None when the input had no header line at all
    pub columns: Option<ColumnLayout>,

    /// Accepted rows in file order
    pub rows: Vec<RawRow>,

    /// Data rows dropped for being short or missing a required value,
    /// comma-only rows included; empty or whitespace-only lines are not counted
    pub skipped: usize,
}

impl GuestSheet {
    pub fn has_pairing_column(&self) -> bool {
        self.columns.map_or(false, |c| c.has_pairing())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse guest list text
///
/// The first line that is not empty or all whitespace is the header, even if
/// it holds nothing but commas. Every later line is a data row;
/// rows that are too short or lack an identifier, name or table are skipped
/// without error. Quotes carry no meaning: every comma separates fields.
///
/// # Returns
/// * `Ok(GuestSheet)` - possibly empty; empty input is not an error
/// * `Err(LookupError::Schema)` - the header lacks a required column
pub fn parse(text: &str) -> Result<GuestSheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut sheet = GuestSheet::default();
    let mut columns: Option<ColumnLayout> = None;

    for result in reader.records() {
        let record = result?;
        let line_number = record.position().map_or(0, |p| p.line() as usize);

        if is_blank_line(&record) {
            continue;
        }

        let layout = match columns {
            Some(layout) => layout,
            None => {
                let headers: Vec<&str> = record.iter().collect();
                let layout = ColumnLayout::from_headers(&headers)?;
                debug!(?layout, "resolved guest list columns");
                columns = Some(layout);
                continue;
            }
        };

        match accept_row(&record, &layout, line_number) {
            Some(row) => sheet.rows.push(row),
            None => {
                debug!(line = line_number, "skipping incomplete guest row");
                sheet.skipped += 1;
            }
        }
    }

    sheet.columns = columns;
    Ok(sheet)
}

/// An empty or whitespace-only line: one field, trimmed to nothing
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.is_empty())
}

/// Promote a data record to a RawRow, or None if it is not a usable guest
fn accept_row(record: &StringRecord, layout: &ColumnLayout, line_number: usize) -> Option<RawRow> {
    if record.len() < layout.min_fields() {
        return None;
    }

    let identifier = record.get(layout.identifier).filter(|v| !v.is_empty())?;
    let name = record.get(layout.name).filter(|v| !v.is_empty())?;
    let table = record.get(layout.table).filter(|v| !v.is_empty())?;

    let row = RawRow::new(
        identifier.to_string(),
        name.to_string(),
        table.to_string(),
        line_number,
    );

    let pairing = layout
        .pairing
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty());

    Some(match pairing {
        Some(p) => row.with_pairing(p.to_string()),
        None => row,
    })
}
