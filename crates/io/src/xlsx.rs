// Census workbook import (xlsx, xls, ods) and report export (xlsx only)
//
// Import: one-way conversion into engine tables — raw cell text only.
// Export: the three-sheet discrepancy report.

use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

use censaudit_engine::config::AuditConfig;
use censaudit_engine::error::AuditError;
use censaudit_engine::model::{AuditInput, AuditResult, Status, Table};

/// Detail-sheet column order, shared with the CSV export.
pub const DETAIL_HEADERS: [&str; 7] = [
    "Employee",
    "Field",
    "Employment Status",
    "Pay Type",
    "Source Value",
    "Authoritative Value",
    "Status",
];

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Read the uploaded workbook bytes into the three input tables.
pub fn load_input(bytes: &[u8], config: &AuditConfig) -> Result<AuditInput, AuditError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut book = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AuditError::Workbook(format!("cannot open workbook: {e}")))?;

    let source = sheet_table(&mut book, &config.sheets.source)?;
    let authoritative = sheet_table(&mut book, &config.sheets.authoritative)?;
    let mapping = sheet_table(&mut book, &config.sheets.mapping)?;

    Ok(AuditInput {
        source,
        authoritative,
        mapping,
    })
}

/// Resolve a sheet by candidate names (exact first, then case-insensitive)
/// and convert it: first row becomes normalized headers, the rest raw text.
fn sheet_table<RS>(book: &mut Sheets<RS>, candidates: &[String]) -> Result<Table, AuditError>
where
    RS: Read + Seek,
{
    let names: Vec<String> = book.sheet_names().to_vec();
    let resolved = candidates.iter().find_map(|want| {
        names
            .iter()
            .find(|n| n.as_str() == want.as_str())
            .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(want)))
            .cloned()
    });
    let name = resolved.ok_or_else(|| AuditError::MissingSheet {
        name: candidates.first().cloned().unwrap_or_default(),
        available: names,
    })?;

    let range = book
        .worksheet_range(&name)
        .map_err(|e| AuditError::Workbook(format!("cannot read sheet '{name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| norm_header(&cell_text(c))).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(headers);
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        table.push_row(cells);
    }
    Ok(table)
}

/// Normalize a header: newlines and non-breaking spaces collapse to single
/// spaces, surrounding quotes and asterisks are stripped.
fn norm_header(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c.is_whitespace());
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a cell as text. Integer-valued floats drop the ".0" a numeric
/// export adds; date cells render ISO so the engine's date parser sees them.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => {
            if *b {
                "TRUE".into()
            } else {
                "FALSE".into()
            }
        }
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(t) if t.time() == chrono::NaiveTime::MIN => {
                t.date().format("%Y-%m-%d").to_string()
            }
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the three-sheet report workbook, returning the file bytes.
pub fn write_report(result: &AuditResult) -> Result<Vec<u8>, AuditError> {
    let mut workbook = XlsxWorkbook::new();
    let header = Format::new().set_bold();

    let ws = workbook.add_worksheet().set_name("Summary").map_err(xlsx_err)?;
    write_summary_sheet(ws, result, &header)?;

    let ws = workbook
        .add_worksheet()
        .set_name("Field_Summary_By_Status")
        .map_err(xlsx_err)?;
    write_field_sheet(ws, result, &header)?;

    let ws = workbook
        .add_worksheet()
        .set_name("Comparison_Detail_AllFields")
        .map_err(xlsx_err)?;
    write_detail_sheet(ws, result, &header)?;

    workbook
        .save_to_buffer()
        .map_err(|e| AuditError::Io(format!("cannot serialize report: {e}")))
}

fn xlsx_err(e: XlsxError) -> AuditError {
    AuditError::Io(format!("report write error: {e}"))
}

fn write_summary_sheet(
    ws: &mut Worksheet,
    result: &AuditResult,
    header: &Format,
) -> Result<(), AuditError> {
    ws.write_string_with_format(0, 0, "Metric", header).map_err(xlsx_err)?;
    ws.write_string_with_format(0, 1, "Value", header).map_err(xlsx_err)?;

    ws.write_string(1, 0, "Config").map_err(xlsx_err)?;
    ws.write_string(1, 1, &result.meta.config_name).map_err(xlsx_err)?;
    ws.write_string(2, 0, "Run At").map_err(xlsx_err)?;
    ws.write_string(2, 1, &result.meta.run_at).map_err(xlsx_err)?;
    ws.write_string(3, 0, "Engine Version").map_err(xlsx_err)?;
    ws.write_string(3, 1, &result.meta.engine_version).map_err(xlsx_err)?;

    let s = &result.summary;
    let mut metrics: Vec<(String, usize)> = vec![
        ("Source Employees".into(), s.source_employees),
        ("Authoritative Employees".into(), s.authoritative_employees),
        ("Common Employees".into(), s.common_employees),
        ("Source Only".into(), s.source_only),
        ("Authoritative Only".into(), s.authoritative_only),
        ("Source Duplicates Dropped".into(), s.source_duplicates_dropped),
        (
            "Authoritative Duplicates Dropped".into(),
            s.authoritative_duplicates_dropped,
        ),
        ("Fields Compared".into(), s.fields_compared),
        ("Unresolved Mappings".into(), s.unresolved_mappings),
        ("Total Rows".into(), s.total_rows),
        ("Not OK Rows".into(), s.not_ok_rows),
    ];
    for (status, count) in &s.status_counts {
        metrics.push((format!("Rows {status}"), *count));
    }

    for (i, (label, value)) in metrics.iter().enumerate() {
        let row = (i + 4) as u32;
        ws.write_string(row, 0, label).map_err(xlsx_err)?;
        ws.write_number(row, 1, *value as f64).map_err(xlsx_err)?;
    }
    ws.autofit();
    Ok(())
}

fn write_field_sheet(
    ws: &mut Worksheet,
    result: &AuditResult,
    header: &Format,
) -> Result<(), AuditError> {
    ws.write_string_with_format(0, 0, "Field", header).map_err(xlsx_err)?;
    let mut col: u16 = 1;
    for status in Status::ALL {
        ws.write_string_with_format(0, col, status.to_string(), header)
            .map_err(xlsx_err)?;
        col += 1;
    }
    ws.write_string_with_format(0, col, "Total", header).map_err(xlsx_err)?;
    ws.write_string_with_format(0, col + 1, "NOT_OK", header).map_err(xlsx_err)?;

    for (i, fs) in result.fields.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_string(row, 0, &fs.field).map_err(xlsx_err)?;
        let mut col: u16 = 1;
        for status in Status::ALL {
            let count = fs.counts.get(&status.to_string()).copied().unwrap_or(0);
            ws.write_number(row, col, count as f64).map_err(xlsx_err)?;
            col += 1;
        }
        ws.write_number(row, col, fs.total as f64).map_err(xlsx_err)?;
        ws.write_number(row, col + 1, fs.not_ok as f64).map_err(xlsx_err)?;
    }
    ws.autofit();
    Ok(())
}

fn write_detail_sheet(
    ws: &mut Worksheet,
    result: &AuditResult,
    header: &Format,
) -> Result<(), AuditError> {
    for (col, title) in DETAIL_HEADERS.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *title, header)
            .map_err(xlsx_err)?;
    }
    for (i, row) in result.detail.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, &row.employee).map_err(xlsx_err)?;
        ws.write_string(r, 1, &row.field).map_err(xlsx_err)?;
        ws.write_string(r, 2, &row.employment_status).map_err(xlsx_err)?;
        ws.write_string(r, 3, &row.pay_type).map_err(xlsx_err)?;
        ws.write_string(r, 4, &row.source_value).map_err(xlsx_err)?;
        ws.write_string(r, 5, &row.authoritative_value).map_err(xlsx_err)?;
        ws.write_string(r, 6, row.status.to_string()).map_err(xlsx_err)?;
    }
    ws.autofit();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
