use std::collections::BTreeMap;

use serde::Serialize;

use crate::normalize::fold;

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

/// A loaded sheet: normalized column headers plus raw cell text per row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Case/whitespace-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = fold(name);
        self.columns.iter().position(|c| fold(c) == want)
    }

    /// Raw cell text; out-of-range coordinates read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// The three tables one audit run consumes.
#[derive(Debug, Clone)]
pub struct AuditInput {
    pub source: Table,
    pub authoritative: Table,
    pub mapping: Table,
}

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// One mapping-sheet row: a source field and its authoritative counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct MapEntry {
    pub source_field: String,
    pub authoritative_label: String,
    /// Actual authoritative column the label resolved to; empty when the
    /// label matched nothing (surfaces as `AUTHORITATIVE_COLUMN_MISSING`).
    pub resolved_column: String,
}

/// Loaded mapping sheet with the identifier row consumed into key columns.
#[derive(Debug, Clone)]
pub struct MappingTable {
    pub entries: Vec<MapEntry>,
    pub source_key_column: String,
    pub authoritative_key_column: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome of one (employee, field) comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Mismatch,
    MissingInAuthoritative,
    MissingInSource,
    AuthoritativeColumnMissing,
    SourceColumnMissing,
    SourceMissingValue,
    AuthoritativeMissingValue,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Ok,
        Status::Mismatch,
        Status::MissingInAuthoritative,
        Status::MissingInSource,
        Status::AuthoritativeColumnMissing,
        Status::SourceColumnMissing,
        Status::SourceMissingValue,
        Status::AuthoritativeMissingValue,
    ];

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Mismatch => write!(f, "MISMATCH"),
            Self::MissingInAuthoritative => write!(f, "MISSING_IN_AUTHORITATIVE"),
            Self::MissingInSource => write!(f, "MISSING_IN_SOURCE"),
            Self::AuthoritativeColumnMissing => write!(f, "AUTHORITATIVE_COLUMN_MISSING"),
            Self::SourceColumnMissing => write!(f, "SOURCE_COLUMN_MISSING"),
            Self::SourceMissingValue => write!(f, "SOURCE_MISSING_VALUE"),
            Self::AuthoritativeMissingValue => write!(f, "AUTHORITATIVE_MISSING_VALUE"),
        }
    }
}

/// One row of the detail report.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub employee: String,
    pub field: String,
    pub employment_status: String,
    pub pay_type: String,
    pub source_value: String,
    pub authoritative_value: String,
    pub status: Status,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Per-field pivot of status counts.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
    pub ok: usize,
    pub not_ok: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub source_employees: usize,
    pub authoritative_employees: usize,
    pub common_employees: usize,
    pub source_only: usize,
    pub authoritative_only: usize,
    pub source_duplicates_dropped: usize,
    pub authoritative_duplicates_dropped: usize,
    pub fields_compared: usize,
    pub unresolved_mappings: usize,
    pub total_rows: usize,
    pub not_ok_rows: usize,
    pub status_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub meta: AuditMeta,
    pub summary: AuditSummary,
    pub fields: Vec<FieldSummary>,
    pub detail: Vec<ComparisonRow>,
}
