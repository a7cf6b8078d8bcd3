use censaudit_engine::model::Status;
use censaudit_engine::{run, AuditConfig, AuditInput, ComparisonRow, Table};

fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        t.push_row(row.iter().map(|c| c.to_string()).collect());
    }
    t
}

/// A census fixture exercising format differences, one-sided employees,
/// duplicate identifiers, unresolved labels, and the pay-type overrides.
fn fixture() -> AuditInput {
    let source = table(
        &[
            "Employee ID",
            "Middle Initial",
            "Work Phone",
            "Zip Code",
            "SSN",
            "Date of Birth",
            "Employment Status",
            "Pay Type",
            "Annual Salary",
            "Hourly Pay Rate",
            "Termination Reason",
        ],
        &[
            &[
                "1001", "R.", "1-206-555-0100", "98101-4423", "12345678", "3/5/1985",
                "On Leave", "Salary", "150000.00", "", "",
            ],
            &[
                "1002", "Ana", "2065550111", "98102", "123456789", "1990-07-20",
                "Active", "Hourly", "", "22.50", "",
            ],
            &[
                "1003", "J", "2065550122", "98103", "234567891", "1978-01-15",
                "Active", "Hourly", "", "18.00", "",
            ],
            &[
                "1005.0", "K", "", "98105", "345678912", "12/1/1980",
                "Terminated", "Salary", "90000", "", "Other",
            ],
            // duplicate identifier: this row must be silently dropped
            &[
                "1001", "X", "0000000000", "00000", "000000000", "1/1/1900",
                "Active", "Hourly", "1", "1", "",
            ],
        ],
    );

    let authoritative = table(
        &[
            "Employee Code",
            "Middle Name",
            "Work Phone",
            "Postal Code",
            "Social Security Number",
            "Birth Date",
            "Employee Status",
            "Pay Type",
            "Annual Salary",
            "Hourly Pay Rate",
            "Termination Reason",
            "Badge Number",
        ],
        &[
            &[
                "1001", "Robert", "(206) 555-0100", "98101", "012345678", "1985-03-05",
                "Active", "Salaried", "150000", "", "", "B-100",
            ],
            &[
                "1002", "Anastasia", "206-555-0111", "98109", "123456789", "1990-07-20",
                "Active", "Hourly", "52000", "22.5", "", "B-101",
            ],
            &[
                "1004", "M", "2065550133", "98104", "456789123", "1982-09-09",
                "Active", "Salaried", "120000", "", "", "B-104",
            ],
            &[
                "1005", "Katherine", "", "98105", "345678912", "1980-12-01",
                "Terminated", "Salaried", "90000.00", "", "Attendance Violation", "B-105",
            ],
        ],
    );

    let mapping = table(
        &["Source Column", "Authoritative Column"],
        &[
            &["Employee ID", "Employee Code"],
            &["Middle Initial", "Middle Name"],
            &["Work Phone", "Work Phone"],
            &["Zip Code", "Postal Code (Zip)"],
            &["SSN", "Social Security Number"],
            &["Date of Birth", "Birth Date"],
            &["Employment Status", "Employee Status"],
            &["Pay Type", "Pay Type"],
            &["Annual Salary", "Annual Salary"],
            &["Hourly Pay Rate", "Hourly Pay Rate"],
            &["Termination Reason", "Termination Reason"],
            &["Badge Number", "Badge Number"],
            &["Parking Spot", "Parking Allocation"],
        ],
    );

    AuditInput {
        source,
        authoritative,
        mapping,
    }
}

fn find<'a>(detail: &'a [ComparisonRow], employee: &str, field: &str) -> &'a ComparisonRow {
    detail
        .iter()
        .find(|r| r.employee == employee && r.field == field)
        .unwrap_or_else(|| panic!("no row for ({employee}, {field})"))
}

#[test]
fn full_audit_scenario() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();

    // 5 aligned employees × 12 mapped fields
    assert_eq!(result.summary.total_rows, 60);
    assert_eq!(result.summary.fields_compared, 12);

    let s = &result.summary;
    assert_eq!(s.source_employees, 4);
    assert_eq!(s.authoritative_employees, 4);
    assert_eq!(s.common_employees, 3);
    assert_eq!(s.source_only, 1);
    assert_eq!(s.authoritative_only, 1);
    assert_eq!(s.source_duplicates_dropped, 1);
    assert_eq!(s.authoritative_duplicates_dropped, 0);
    assert_eq!(s.unresolved_mappings, 1);
}

#[test]
fn format_differences_compare_equal() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let detail = &result.detail;

    assert_eq!(find(detail, "1001", "Work Phone").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Zip Code").status, Status::Ok);
    assert_eq!(find(detail, "1001", "SSN").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Date of Birth").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Middle Initial").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Employment Status").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Pay Type").status, Status::Ok);
    assert_eq!(find(detail, "1001", "Annual Salary").status, Status::Ok);

    assert_eq!(find(detail, "1002", "Zip Code").status, Status::Mismatch);
}

#[test]
fn one_sided_employees_are_missing_everywhere() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();

    for row in result.detail.iter().filter(|r| r.employee == "1003") {
        assert_eq!(row.status, Status::MissingInAuthoritative, "field {}", row.field);
    }
    for row in result.detail.iter().filter(|r| r.employee == "1004") {
        assert_eq!(row.status, Status::MissingInSource, "field {}", row.field);
    }
}

#[test]
fn column_level_statuses() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let detail = &result.detail;

    // label resolved nothing in the authoritative table
    for employee in ["1001", "1002", "1005"] {
        assert_eq!(
            find(detail, employee, "Parking Spot").status,
            Status::AuthoritativeColumnMissing
        );
    }
    // the source export has no such column
    for employee in ["1001", "1002", "1005"] {
        assert_eq!(
            find(detail, employee, "Badge Number").status,
            Status::SourceColumnMissing
        );
    }
}

#[test]
fn hourly_employee_salary_is_not_a_finding() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let detail = &result.detail;

    // 1002 is hourly with an empty source salary and a populated
    // authoritative one: conditional applicability forces OK.
    let row = find(detail, "1002", "Annual Salary");
    assert_eq!(row.status, Status::Ok);
    assert_eq!(row.source_value, "");
    assert_eq!(row.authoritative_value, "52000");

    assert_eq!(find(detail, "1002", "Hourly Pay Rate").status, Status::Ok);
}

#[test]
fn termination_reason_bucket_accepts_other() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let row = find(&result.detail, "1005", "Termination Reason");
    assert_eq!(row.status, Status::Ok);
}

#[test]
fn duplicate_identifier_uses_first_row() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    // values come from the first 1001 row, not the duplicate
    let row = find(&result.detail, "1001", "Middle Initial");
    assert_eq!(row.source_value, "R.");
}

#[test]
fn context_columns_are_carried_per_employee() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let row = find(&result.detail, "1005", "Zip Code");
    assert_eq!(row.employment_status, "Terminated");
    assert_eq!(row.pay_type, "Salary");
    // absent from the source table: context is empty
    let row = find(&result.detail, "1004", "Zip Code");
    assert_eq!(row.employment_status, "");
    assert_eq!(row.pay_type, "");
}

#[test]
fn pivot_totals_match_detail() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    for fs in &result.fields {
        let rows = result.detail.iter().filter(|r| r.field == fs.field).count();
        assert_eq!(fs.total, rows, "field {}", fs.field);
        assert_eq!(fs.ok + fs.not_ok, rows);
        assert_eq!(fs.counts.values().sum::<usize>(), rows);
    }
    assert_eq!(result.fields.len(), 12);
}

#[test]
fn detail_order_is_deterministic() {
    let result = run(&AuditConfig::default(), &fixture()).unwrap();
    let employees: Vec<&str> = result
        .detail
        .iter()
        .map(|r| r.employee.as_str())
        .collect();
    let mut sorted = employees.clone();
    sorted.sort();
    assert_eq!(employees, sorted);
    // first employee's fields follow mapping order
    assert_eq!(result.detail[0].field, "Middle Initial");
    assert_eq!(result.detail[1].field, "Work Phone");
}
