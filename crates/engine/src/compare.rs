use crate::align::KeyedTable;
use crate::classify::{
    override_group, pay_type_context, FieldKind, OverrideGroup, PayTypeContext, RuleTable,
};
use crate::config::AuditConfig;
use crate::model::{ComparisonRow, MappingTable, Status, Table};
use crate::normalize::{fold, norm_blank, normalize};

/// One (employee, field) cell pair, resolved as far as the tables allow.
struct PairState<'a> {
    in_source: bool,
    in_authoritative: bool,
    source_column_present: bool,
    authoritative_column_present: bool,
    source_value: &'a str,
    authoritative_value: &'a str,
}

/// Walk the cross product of aligned employees × mapped fields, emitting one
/// classified row per pair.
pub fn compare_all(
    config: &AuditConfig,
    rules: &RuleTable,
    mapping: &MappingTable,
    source: &Table,
    authoritative: &Table,
    source_keys: &KeyedTable,
    authoritative_keys: &KeyedTable,
    employees: &[String],
) -> Vec<ComparisonRow> {
    let status_col = source.column_index(&config.context.employment_status);
    let pay_col = source.column_index(&config.context.pay_type);

    // Column indices are per-field constants; resolve them once, not per employee.
    let columns: Vec<(Option<usize>, Option<usize>)> = mapping
        .entries
        .iter()
        .map(|entry| {
            let src = source.column_index(&entry.source_field);
            let auth = if entry.resolved_column.is_empty() {
                None
            } else {
                authoritative.column_index(&entry.resolved_column)
            };
            (src, auth)
        })
        .collect();

    let mut rows = Vec::with_capacity(employees.len() * mapping.entries.len());

    for employee in employees {
        let src_row = source_keys.by_key.get(employee).copied();
        let auth_row = authoritative_keys.by_key.get(employee).copied();

        let employment_status = match (src_row, status_col) {
            (Some(r), Some(c)) => source.cell(r, c).to_string(),
            _ => String::new(),
        };
        let pay_type = match (src_row, pay_col) {
            (Some(r), Some(c)) => source.cell(r, c).to_string(),
            _ => String::new(),
        };
        let pay_ctx = pay_type_context(&pay_type);

        for (entry, (src_col, auth_col)) in mapping.entries.iter().zip(&columns) {
            let source_value = match (src_row, src_col) {
                (Some(r), Some(c)) => source.cell(r, *c).to_string(),
                _ => String::new(),
            };
            let authoritative_value = match (auth_row, auth_col) {
                (Some(r), Some(c)) => authoritative.cell(r, *c).to_string(),
                _ => String::new(),
            };

            let status = classify_pair(
                config,
                rules,
                &entry.source_field,
                pay_ctx,
                &PairState {
                    in_source: src_row.is_some(),
                    in_authoritative: auth_row.is_some(),
                    source_column_present: src_col.is_some(),
                    authoritative_column_present: auth_col.is_some(),
                    source_value: &source_value,
                    authoritative_value: &authoritative_value,
                },
            );

            rows.push(ComparisonRow {
                employee: employee.clone(),
                field: entry.source_field.clone(),
                employment_status: employment_status.clone(),
                pay_type: pay_type.clone(),
                source_value,
                authoritative_value,
                status,
            });
        }
    }
    rows
}

/// The status decision procedure: first matching rule wins.
fn classify_pair(
    config: &AuditConfig,
    rules: &RuleTable,
    field: &str,
    pay_ctx: PayTypeContext,
    pair: &PairState<'_>,
) -> Status {
    if !pair.in_authoritative {
        return Status::MissingInAuthoritative;
    }
    if !pair.in_source {
        return Status::MissingInSource;
    }
    if !pair.authoritative_column_present {
        return Status::AuthoritativeColumnMissing;
    }
    if !pair.source_column_present {
        return Status::SourceColumnMissing;
    }

    // Conditional applicability: salary fields are not expected for hourly
    // employees, rate/hours fields not for salaried ones.
    match (pay_ctx, override_group(field, config)) {
        (PayTypeContext::Hourly, Some(OverrideGroup::AnnualSalary)) => return Status::Ok,
        (
            PayTypeContext::Salaried,
            Some(OverrideGroup::HourlyRate | OverrideGroup::WeeklyHours),
        ) => return Status::Ok,
        _ => {}
    }

    let kind = rules.classify(field);

    if kind == FieldKind::TerminationReason {
        if let Some(status) = termination_status(pair.source_value, pair.authoritative_value, config)
        {
            return status;
        }
    }

    let src = normalize(kind, pair.source_value, config);
    let auth = normalize(kind, pair.authoritative_value, config);

    if src.is_empty() && auth.is_empty() {
        Status::Ok
    } else if src == auth {
        Status::Ok
    } else if src.is_empty() {
        Status::SourceMissingValue
    } else if auth.is_empty() {
        Status::AuthoritativeMissingValue
    } else {
        Status::Mismatch
    }
}

/// Termination reasons compare by voluntary/involuntary class first, then by
/// the reason-bucket table. `None` falls through to the generic comparison.
fn termination_status(
    source_value: &str,
    authoritative_value: &str,
    config: &AuditConfig,
) -> Option<Status> {
    let src = fold(&norm_blank(source_value));
    let auth = fold(&norm_blank(authoritative_value));
    if src.is_empty() || auth.is_empty() {
        return None;
    }

    // "involuntary" contains "voluntary": test the stronger class first.
    let src_invol = src.contains("involuntary");
    let auth_invol = auth.contains("involuntary");
    if src_invol && auth_invol {
        return Some(Status::Ok);
    }
    if (src.contains("voluntary") && !src_invol) && (auth.contains("voluntary") && !auth_invol) {
        return Some(Status::Ok);
    }

    for bucket in &config.termination.buckets {
        let auth_hit = bucket
            .authoritative
            .iter()
            .any(|p| auth.contains(fold(p).as_str()));
        if auth_hit && bucket.allowed.iter().any(|a| fold(a) == src) {
            return Some(Status::Ok);
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(source_value: &'a str, authoritative_value: &'a str) -> PairState<'a> {
        PairState {
            in_source: true,
            in_authoritative: true,
            source_column_present: true,
            authoritative_column_present: true,
            source_value,
            authoritative_value,
        }
    }

    fn classify_with(field: &str, pay_ctx: PayTypeContext, state: &PairState<'_>) -> Status {
        let config = AuditConfig::default();
        let rules = RuleTable::from_config(&config);
        classify_pair(&config, &rules, field, pay_ctx, state)
    }

    fn classify(field: &str, pay_ctx: PayTypeContext, src: &str, auth: &str) -> Status {
        classify_with(field, pay_ctx, &pair(src, auth))
    }

    #[test]
    fn missing_employee_checks_come_first() {
        let mut state = pair("x", "y");
        state.in_authoritative = false;
        assert_eq!(
            classify_with("Zip Code", PayTypeContext::Unknown, &state),
            Status::MissingInAuthoritative
        );

        let mut state = pair("x", "y");
        state.in_source = false;
        assert_eq!(
            classify_with("Zip Code", PayTypeContext::Unknown, &state),
            Status::MissingInSource
        );
    }

    #[test]
    fn column_checks_come_next() {
        let mut state = pair("x", "y");
        state.authoritative_column_present = false;
        assert_eq!(
            classify_with("Zip Code", PayTypeContext::Unknown, &state),
            Status::AuthoritativeColumnMissing
        );

        let mut state = pair("x", "y");
        state.source_column_present = false;
        assert_eq!(
            classify_with("Zip Code", PayTypeContext::Unknown, &state),
            Status::SourceColumnMissing
        );
    }

    #[test]
    fn generic_comparison_outcomes() {
        let unk = PayTypeContext::Unknown;
        assert_eq!(classify("First Name", unk, "Ana", "ANA"), Status::Ok);
        assert_eq!(classify("First Name", unk, "", ""), Status::Ok);
        assert_eq!(
            classify("First Name", unk, "", "Ana"),
            Status::SourceMissingValue
        );
        assert_eq!(
            classify("First Name", unk, "Ana", ""),
            Status::AuthoritativeMissingValue
        );
        assert_eq!(classify("First Name", unk, "Ana", "Bea"), Status::Mismatch);
    }

    #[test]
    fn normalizers_are_applied_per_field_kind() {
        let unk = PayTypeContext::Unknown;
        assert_eq!(
            classify("Work Phone", unk, "1-206-555-0100", "(206) 555-0100"),
            Status::Ok
        );
        assert_eq!(
            classify("Annual Salary", PayTypeContext::Salaried, "150000.00", "150000"),
            Status::Ok
        );
        assert_eq!(classify("Pay Type", unk, "Salary", "Salaried"), Status::Ok);
        assert_eq!(
            classify("Pay Type", unk, "Hourly", "Salaried"),
            Status::Mismatch
        );
    }

    #[test]
    fn hourly_employee_skips_salary_fields() {
        // populated authoritative value, empty source: still OK for hourly
        assert_eq!(
            classify("Annual Salary", PayTypeContext::Hourly, "", "150000"),
            Status::Ok
        );
    }

    #[test]
    fn salaried_employee_skips_rate_and_hours_fields() {
        assert_eq!(
            classify("Hourly Pay Rate", PayTypeContext::Salaried, "22.50", ""),
            Status::Ok
        );
        assert_eq!(
            classify("Working Hours Per Week", PayTypeContext::Salaried, "40", ""),
            Status::Ok
        );
        // hourly employees still get rate fields compared
        assert_eq!(
            classify("Hourly Pay Rate", PayTypeContext::Hourly, "22.50", "22.5"),
            Status::Ok
        );
        assert_eq!(
            classify("Hourly Pay Rate", PayTypeContext::Hourly, "22.50", "23"),
            Status::Mismatch
        );
    }

    #[test]
    fn termination_voluntary_class_matches() {
        assert_eq!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "Voluntary Resignation",
                "Voluntary Termination of Employment"
            ),
            Status::Ok
        );
    }

    #[test]
    fn termination_involuntary_class_matches() {
        assert_eq!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "Involuntary Termination",
                "Involuntary Termination of Employment"
            ),
            Status::Ok
        );
    }

    #[test]
    fn termination_classes_do_not_cross() {
        assert_ne!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "Voluntary",
                "Involuntary Termination of Employment"
            ),
            Status::Ok
        );
    }

    #[test]
    fn termination_bucket_table_matches() {
        assert_eq!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "Other",
                "Attendance Violation"
            ),
            Status::Ok
        );
        // bucket phrases key off the authoritative side only
        assert_eq!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "Attendance Violation",
                "Other"
            ),
            Status::Mismatch
        );
    }

    #[test]
    fn termination_falls_through_to_generic() {
        // no class hit, no bucket hit: plain text comparison decides
        assert_eq!(
            classify("Termination Reason", PayTypeContext::Unknown, "Quit", "quit"),
            Status::Ok
        );
        assert_eq!(
            classify(
                "Termination Reason",
                PayTypeContext::Unknown,
                "",
                "Attendance Violation"
            ),
            Status::SourceMissingValue
        );
    }
}
