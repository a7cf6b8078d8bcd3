use std::collections::BTreeMap;

use crate::align::KeyedTable;
use crate::model::{AuditSummary, ComparisonRow, FieldSummary, MappingTable};

/// Pivot the detail rows into per-field status counts with derived totals.
pub fn field_summaries(detail: &[ComparisonRow]) -> Vec<FieldSummary> {
    let mut by_field: BTreeMap<&str, BTreeMap<String, usize>> = BTreeMap::new();
    for row in detail {
        *by_field
            .entry(row.field.as_str())
            .or_default()
            .entry(row.status.to_string())
            .or_insert(0) += 1;
    }
    by_field
        .into_iter()
        .map(|(field, counts)| {
            let total: usize = counts.values().sum();
            let ok = counts.get("OK").copied().unwrap_or(0);
            FieldSummary {
                field: field.to_string(),
                total,
                ok,
                not_ok: total - ok,
                counts,
            }
        })
        .collect()
}

/// Scalar run summary: employee counts per side, overlap, and row totals.
/// Purely a reduction over the detail table and the keyed sides.
pub fn compute_summary(
    detail: &[ComparisonRow],
    source: &KeyedTable,
    authoritative: &KeyedTable,
    mapping: &MappingTable,
) -> AuditSummary {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut not_ok_rows = 0;
    for row in detail {
        *status_counts.entry(row.status.to_string()).or_insert(0) += 1;
        if !row.status.is_ok() {
            not_ok_rows += 1;
        }
    }

    let common = source
        .by_key
        .keys()
        .filter(|k| authoritative.by_key.contains_key(*k))
        .count();

    AuditSummary {
        source_employees: source.by_key.len(),
        authoritative_employees: authoritative.by_key.len(),
        common_employees: common,
        source_only: source.by_key.len() - common,
        authoritative_only: authoritative.by_key.len() - common,
        source_duplicates_dropped: source.duplicates_dropped,
        authoritative_duplicates_dropped: authoritative.duplicates_dropped,
        fields_compared: mapping.entries.len(),
        unresolved_mappings: mapping
            .entries
            .iter()
            .filter(|e| e.resolved_column.is_empty())
            .count(),
        total_rows: detail.len(),
        not_ok_rows,
        status_counts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
