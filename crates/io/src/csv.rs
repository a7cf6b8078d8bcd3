// Detail-table CSV export

use censaudit_engine::error::AuditError;
use censaudit_engine::model::AuditResult;

use crate::xlsx::DETAIL_HEADERS;

/// Serialize the detail table as CSV, same column order as the report sheet.
pub fn write_detail_csv(result: &AuditResult) -> Result<String, AuditError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(DETAIL_HEADERS).map_err(csv_err)?;
    for row in &result.detail {
        let status = row.status.to_string();
        writer
            .write_record([
                row.employee.as_str(),
                row.field.as_str(),
                row.employment_status.as_str(),
                row.pay_type.as_str(),
                row.source_value.as_str(),
                row.authoritative_value.as_str(),
                status.as_str(),
            ])
            .map_err(csv_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AuditError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AuditError::Io(e.to_string()))
}

fn csv_err(e: csv::Error) -> AuditError {
    AuditError::Io(e.to_string())
}
