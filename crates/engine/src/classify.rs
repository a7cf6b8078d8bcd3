use crate::config::AuditConfig;
use crate::normalize::fold;

/// How a field's values are canonicalized for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    TerminationReason,
    EmploymentStatus,
    EmploymentType,
    PayType,
    Phone,
    PostalCode,
    TaxId,
    Initial,
    Suffix,
    Date,
    Numeric,
    Text,
}

/// Ordered (kind, keywords) rules; the first keyword hit on the folded field
/// name decides. Compound names rely on the fixed priority: termination
/// reason before date, pay type before numeric.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<(FieldKind, Vec<String>)>,
}

impl RuleTable {
    pub fn from_config(config: &AuditConfig) -> Self {
        let kw = &config.keywords;
        let rule = |kind: FieldKind, words: &[String]| -> (FieldKind, Vec<String>) {
            (kind, words.iter().map(|w| fold(w)).collect())
        };
        Self {
            rules: vec![
                rule(FieldKind::TerminationReason, &kw.termination_reason),
                rule(FieldKind::EmploymentStatus, &kw.employment_status),
                rule(FieldKind::EmploymentType, &kw.employment_type),
                rule(FieldKind::PayType, &kw.pay_type),
                rule(FieldKind::Phone, &kw.phone),
                rule(FieldKind::PostalCode, &kw.postal_code),
                rule(FieldKind::TaxId, &kw.tax_id),
                rule(FieldKind::Initial, &kw.initial),
                rule(FieldKind::Suffix, &kw.suffix),
                rule(FieldKind::Date, &kw.date),
                rule(FieldKind::Numeric, &kw.numeric),
            ],
        }
    }

    pub fn classify(&self, field_name: &str) -> FieldKind {
        let name = fold(field_name);
        for (kind, words) in &self.rules {
            if words.iter().any(|w| !w.is_empty() && name.contains(w.as_str())) {
                return *kind;
            }
        }
        FieldKind::Text
    }
}

/// Fields that only apply to one pay type (see the comparison overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideGroup {
    AnnualSalary,
    HourlyRate,
    WeeklyHours,
}

pub fn override_group(field_name: &str, config: &AuditConfig) -> Option<OverrideGroup> {
    let name = fold(field_name);
    let hit = |words: &[String]| words.iter().any(|w| name.contains(fold(w).as_str()));
    if hit(&config.overrides.annual_salary) {
        Some(OverrideGroup::AnnualSalary)
    } else if hit(&config.overrides.hourly_rate) {
        Some(OverrideGroup::HourlyRate)
    } else if hit(&config.overrides.weekly_hours) {
        Some(OverrideGroup::WeeklyHours)
    } else {
        None
    }
}

/// Pay-type context of the employee being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayTypeContext {
    Hourly,
    Salaried,
    Unknown,
}

pub fn pay_type_context(raw: &str) -> PayTypeContext {
    let folded = fold(raw);
    if folded.contains("hour") {
        PayTypeContext::Hourly
    } else if folded.contains("salar") {
        PayTypeContext::Salaried
    } else {
        PayTypeContext::Unknown
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
