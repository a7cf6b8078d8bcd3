use crate::aggregate::{compute_summary, field_summaries};
use crate::align::{aligned_keys, key_table};
use crate::classify::RuleTable;
use crate::compare::compare_all;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::mapping::load_mapping;
use crate::model::{AuditInput, AuditMeta, AuditResult};

/// Run a full audit: load the mapping, align employees, compare every
/// (employee, field) pair, and reduce to summaries.
pub fn run(config: &AuditConfig, input: &AuditInput) -> Result<AuditResult, AuditError> {
    let rules = RuleTable::from_config(config);
    let mapping = load_mapping(&input.mapping, &input.source, &input.authoritative, config)?;

    let source_key = input
        .source
        .column_index(&mapping.source_key_column)
        .ok_or_else(|| AuditError::MissingIdentifierColumn {
            table: "source".into(),
            label: mapping.source_key_column.clone(),
        })?;
    let authoritative_key = input
        .authoritative
        .column_index(&mapping.authoritative_key_column)
        .ok_or_else(|| AuditError::MissingIdentifierColumn {
            table: "authoritative".into(),
            label: mapping.authoritative_key_column.clone(),
        })?;

    let source_keys = key_table(&input.source, source_key);
    let authoritative_keys = key_table(&input.authoritative, authoritative_key);
    let employees = aligned_keys(&source_keys, &authoritative_keys);

    let detail = compare_all(
        config,
        &rules,
        &mapping,
        &input.source,
        &input.authoritative,
        &source_keys,
        &authoritative_keys,
        &employees,
    );

    let summary = compute_summary(&detail, &source_keys, &authoritative_keys, &mapping);
    let fields = field_summaries(&detail);

    Ok(AuditResult {
        meta: AuditMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        fields,
        detail,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
