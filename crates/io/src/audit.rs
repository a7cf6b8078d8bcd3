// End-to-end audit: uploaded workbook bytes in, report workbook bytes out.

use censaudit_engine::config::AuditConfig;
use censaudit_engine::error::AuditError;
use censaudit_engine::model::AuditResult;

use crate::xlsx::{load_input, write_report};

/// Run the full audit, keeping the in-memory result for inspection alongside
/// the serialized report.
pub fn run_audit_full(
    bytes: &[u8],
    config: &AuditConfig,
) -> Result<(AuditResult, Vec<u8>), AuditError> {
    let input = load_input(bytes, config)?;
    let result = censaudit_engine::run(config, &input)?;
    let report = write_report(&result)?;
    Ok((result, report))
}

/// One-shot entry point: workbook bytes in, report bytes out.
pub fn run_audit(bytes: &[u8], config: &AuditConfig) -> Result<Vec<u8>, AuditError> {
    run_audit_full(bytes, config).map(|(_, report)| report)
}
