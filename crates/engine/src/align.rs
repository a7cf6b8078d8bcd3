use std::collections::BTreeMap;

use crate::model::Table;
use crate::normalize::norm_blank;

/// Canonical employee-identifier form: trimmed text with numeric-export
/// artifacts removed ("1001.0" and "1001" are the same employee).
pub fn normalize_key(raw: &str) -> String {
    let cleaned = raw.replace('\u{a0}', " ");
    let trimmed = norm_blank(&cleaned);
    match trimmed.strip_suffix(".0") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => trimmed,
    }
}

/// A census table indexed by normalized employee identifier.
/// First row per identifier wins; later duplicates are dropped and counted.
#[derive(Debug)]
pub struct KeyedTable {
    pub key_column: usize,
    pub by_key: BTreeMap<String, usize>,
    pub duplicates_dropped: usize,
}

pub fn key_table(table: &Table, key_column: usize) -> KeyedTable {
    let mut by_key = BTreeMap::new();
    let mut duplicates_dropped = 0;
    for row in 0..table.rows.len() {
        let key = normalize_key(table.cell(row, key_column));
        if key.is_empty() {
            continue;
        }
        if by_key.contains_key(&key) {
            duplicates_dropped += 1;
        } else {
            by_key.insert(key, row);
        }
    }
    KeyedTable {
        key_column,
        by_key,
        duplicates_dropped,
    }
}

/// Sorted union of both key spaces: the full outer join of employees.
pub fn aligned_keys(a: &KeyedTable, b: &KeyedTable) -> Vec<String> {
    let mut keys: Vec<String> = a.by_key.keys().cloned().collect();
    keys.extend(b.by_key.keys().cloned());
    keys.sort();
    keys.dedup();
    keys
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(ids: &[&str]) -> KeyedTable {
        let mut t = Table::new(vec!["Employee ID".into()]);
        for id in ids {
            t.push_row(vec![id.to_string()]);
        }
        key_table(&t, 0)
    }

    #[test]
    fn key_normalization() {
        assert_eq!(normalize_key("1001"), "1001");
        assert_eq!(normalize_key("1001.0"), "1001");
        assert_eq!(normalize_key(" 1001 "), "1001");
        assert_eq!(normalize_key("\u{a0}1001\u{a0}"), "1001");
        assert_eq!(normalize_key("E-42.0"), "E-42");
        assert_eq!(normalize_key(".0"), ".0");
        assert_eq!(normalize_key("nan"), "");
    }

    #[test]
    fn numeric_artifacts_merge() {
        let t = keyed(&["1001.0", "1002"]);
        assert!(t.by_key.contains_key("1001"));
        assert!(t.by_key.contains_key("1002"));
    }

    #[test]
    fn duplicates_keep_first_row() {
        let t = keyed(&["1001", "1002", "1001.0", "1001"]);
        assert_eq!(t.by_key.len(), 2);
        assert_eq!(t.by_key["1001"], 0);
        assert_eq!(t.duplicates_dropped, 2);
    }

    #[test]
    fn blank_keys_are_skipped() {
        let t = keyed(&["1001", "", "nan", "1002"]);
        assert_eq!(t.by_key.len(), 2);
        assert_eq!(t.duplicates_dropped, 0);
    }

    #[test]
    fn aligned_keys_is_sorted_union() {
        let a = keyed(&["1003", "1001"]);
        let b = keyed(&["1002", "1001"]);
        assert_eq!(aligned_keys(&a, &b), vec!["1001", "1002", "1003"]);
    }
}
