use std::collections::HashSet;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::model::{MapEntry, MappingTable, Table};
use crate::normalize::{collapse_ws, fold};

/// Delimiters that split a noisy label into candidate tokens.
const TOKEN_DELIMITERS: [char; 5] = ['(', ')', '/', ',', ';'];

/// Load the mapping sheet: locate its two columns, consume the identifier
/// row into key-column names, dedup source fields, and resolve every
/// authoritative label against the authoritative table's actual columns.
pub fn load_mapping(
    mapping: &Table,
    source: &Table,
    authoritative: &Table,
    config: &AuditConfig,
) -> Result<MappingTable, AuditError> {
    let src_col = find_header(mapping, &config.mapping.source_column)?;
    let auth_col = find_header(mapping, &config.mapping.authoritative_column)?;

    let identifier_labels: HashSet<String> =
        config.mapping.identifier.iter().map(|l| fold(l)).collect();

    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut identifier_row: Option<(String, String)> = None;

    for row in 0..mapping.rows.len() {
        let source_field = collapse_ws(mapping.cell(row, src_col));
        let label = collapse_ws(mapping.cell(row, auth_col));
        if source_field.is_empty() {
            continue;
        }
        let folded = fold(&source_field);
        if identifier_labels.contains(&folded) {
            // Alignment only; the identifier pair is never compared.
            if identifier_row.is_none() {
                identifier_row = Some((source_field, label));
            }
            continue;
        }
        if !seen.insert(folded) {
            continue; // duplicate source fields: first occurrence wins
        }
        let resolved_column =
            resolve_column(&label, &authoritative.columns).unwrap_or_default();
        entries.push(MapEntry {
            source_field,
            authoritative_label: label,
            resolved_column,
        });
    }

    let (id_source_label, id_auth_label) =
        identifier_row.ok_or(AuditError::MissingIdentifierRow)?;

    let source_key_column = resolve_key_column(&id_source_label, &source.columns)
        .ok_or_else(|| AuditError::MissingIdentifierColumn {
            table: "source".into(),
            label: id_source_label.clone(),
        })?;
    let authoritative_key_column = resolve_key_column(&id_auth_label, &authoritative.columns)
        .ok_or_else(|| AuditError::MissingIdentifierColumn {
            table: "authoritative".into(),
            label: id_auth_label,
        })?;

    Ok(MappingTable {
        entries,
        source_key_column,
        authoritative_key_column,
    })
}

/// Locate a mapping header by candidate labels: exact folded match first,
/// then containment either way (labels in practice carry extra words).
fn find_header(table: &Table, candidates: &[String]) -> Result<usize, AuditError> {
    let folded: Vec<String> = candidates.iter().map(|c| fold(c)).collect();
    for (i, col) in table.columns.iter().enumerate() {
        let name = fold(col);
        if folded.iter().any(|c| *c == name) {
            return Ok(i);
        }
    }
    for (i, col) in table.columns.iter().enumerate() {
        let name = fold(col);
        if !name.is_empty()
            && folded
                .iter()
                .any(|c| name.contains(c.as_str()) || c.contains(&name))
        {
            return Ok(i);
        }
    }
    Err(AuditError::MissingMappingColumn {
        column: candidates.first().cloned().unwrap_or_default(),
    })
}

/// Resolve a noisy label against actual columns. Exact case-insensitive
/// match, then token-split candidates, then substring containment — the
/// containment fallback only fires when a single column qualifies; anything
/// ambiguous stays unresolved rather than guessing.
pub fn resolve_column(label: &str, columns: &[String]) -> Option<String> {
    let want = fold(label);
    if want.is_empty() {
        return None;
    }
    if let Some(col) = columns.iter().find(|c| fold(c) == want) {
        return Some(col.clone());
    }
    for token in split_tokens(&want) {
        if let Some(col) = columns.iter().find(|c| fold(c) == token) {
            return Some(col.clone());
        }
    }
    let hits: Vec<&String> = columns
        .iter()
        .filter(|c| {
            let name = fold(c);
            !name.is_empty() && (name.contains(&want) || want.contains(&name))
        })
        .collect();
    if hits.len() == 1 {
        return Some(hits[0].clone());
    }
    None
}

/// The identifier label additionally falls back to the first column that
/// mentions "employee" at all, since key headers vary the most across exports.
fn resolve_key_column(label: &str, columns: &[String]) -> Option<String> {
    resolve_column(label, columns)
        .or_else(|| columns.iter().find(|c| fold(c).contains("employee")).cloned())
}

fn split_tokens(label: &str) -> Vec<String> {
    label
        .split(&TOKEN_DELIMITERS[..])
        .flat_map(|part| part.split(" or "))
        .map(collapse_ws)
        .filter(|part| !part.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
