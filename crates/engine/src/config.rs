use serde::Deserialize;

use crate::error::AuditError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything the audit treats as data: sheet-name candidates, mapping-header
/// candidates, classifier keyword sets, conditional-applicability field
/// groups, and the termination-reason buckets. Compiled-in defaults cover the
/// common census layouts; a TOML file can override any part.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub name: String,
    pub sheets: SheetNames,
    pub mapping: MappingLabels,
    pub context: ContextFields,
    pub keywords: KeywordConfig,
    pub overrides: OverrideConfig,
    pub termination: TerminationConfig,
    /// Leading digits dropped from phone numbers one country code too long.
    pub phone_country_code: String,
    pub postal_code_width: usize,
    pub tax_id_width: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            name: "Census Audit".into(),
            sheets: SheetNames::default(),
            mapping: MappingLabels::default(),
            context: ContextFields::default(),
            keywords: KeywordConfig::default(),
            overrides: OverrideConfig::default(),
            termination: TerminationConfig::default(),
            phone_country_code: "1".into(),
            postal_code_width: 5,
            tax_id_width: 9,
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet + mapping-header candidates
// ---------------------------------------------------------------------------

/// Candidate names per input sheet, tried in order (case-insensitive).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub source: Vec<String>,
    pub authoritative: Vec<String>,
    pub mapping: Vec<String>,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            source: strings(&["Source Data", "HR Data", "Benefits Data"]),
            authoritative: strings(&["Authoritative Data", "Payroll Data"]),
            mapping: strings(&["Mapping Sheet", "Field Mapping", "Mapping"]),
        }
    }
}

/// Candidate header labels on the mapping sheet, plus the row labels that
/// mark the identifier-correspondence row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MappingLabels {
    pub source_column: Vec<String>,
    pub authoritative_column: Vec<String>,
    pub identifier: Vec<String>,
}

impl Default for MappingLabels {
    fn default() -> Self {
        Self {
            source_column: strings(&["Source Column", "Source Field", "HR Column"]),
            authoritative_column: strings(&[
                "Authoritative Column",
                "Payroll Column",
                "Target Column",
            ]),
            identifier: strings(&[
                "employee id",
                "employee",
                "employee code",
                "employee_code",
                "employee number",
            ]),
        }
    }
}

/// Source-table columns that provide per-employee comparison context.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContextFields {
    pub pay_type: String,
    pub employment_status: String,
}

impl Default for ContextFields {
    fn default() -> Self {
        Self {
            pay_type: "Pay Type".into(),
            employment_status: "Employment Status".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier keywords
// ---------------------------------------------------------------------------

/// Trigger words for the field classifier, matched as substrings of the
/// folded field name. Rule priority is fixed in the classifier; only the
/// vocabulary lives here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub termination_reason: Vec<String>,
    pub employment_status: Vec<String>,
    pub employment_type: Vec<String>,
    pub pay_type: Vec<String>,
    pub phone: Vec<String>,
    pub postal_code: Vec<String>,
    pub tax_id: Vec<String>,
    pub initial: Vec<String>,
    pub suffix: Vec<String>,
    pub date: Vec<String>,
    pub numeric: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            termination_reason: strings(&[
                "termination reason",
                "term reason",
                "reason for termination",
            ]),
            employment_status: strings(&["employment status", "employee status"]),
            employment_type: strings(&[
                "employment type",
                "employee type",
                "full time",
                "full-time",
                "part time",
                "part-time",
            ]),
            pay_type: strings(&["pay type", "pay basis", "compensation type"]),
            phone: strings(&["phone", "mobile", "cell"]),
            postal_code: strings(&["zip", "postal"]),
            tax_id: strings(&["ssn", "social security", "tax id", "taxpayer", "tin"]),
            initial: strings(&["middle initial", "middle name"]),
            suffix: strings(&["suffix"]),
            date: strings(&["date", "dob", "birth"]),
            numeric: strings(&[
                "salary",
                "rate",
                "hours",
                "amount",
                "percent",
                "wage",
                "pay",
                "compensation",
                "deduction",
                "contribution",
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Conditional applicability
// ---------------------------------------------------------------------------

/// Field-name groups that only apply to one pay type: salary fields are not
/// expected for hourly employees, rate/hours fields not for salaried ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    pub annual_salary: Vec<String>,
    pub hourly_rate: Vec<String>,
    pub weekly_hours: Vec<String>,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            annual_salary: strings(&["annual salary", "annual base salary", "base salary"]),
            hourly_rate: strings(&["hourly pay rate", "hourly rate", "rate per hour"]),
            weekly_hours: strings(&[
                "working hours",
                "hours per week",
                "scheduled weekly hours",
                "standard weekly hours",
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Termination-reason buckets
// ---------------------------------------------------------------------------

/// Authoritative-side phrases and the source-side values accepted for them.
/// Phrases match by containment on the folded authoritative value; allowed
/// values match by folded equality on the source value.
#[derive(Debug, Clone, Deserialize)]
pub struct ReasonBucket {
    pub authoritative: Vec<String>,
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerminationConfig {
    pub buckets: Vec<ReasonBucket>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        let bucket = |authoritative: &[&str], allowed: &[&str]| ReasonBucket {
            authoritative: strings(authoritative),
            allowed: strings(allowed),
        };
        Self {
            buckets: vec![
                // Cause-style terminations that source systems record as "Other".
                bucket(
                    &[
                        "attendance violation",
                        "performance",
                        "misconduct",
                        "policy violation",
                        "job abandonment",
                        "insubordination",
                    ],
                    &["other", "involuntary termination", "terminated for cause"],
                ),
                bucket(
                    &[
                        "position eliminated",
                        "layoff",
                        "reduction in force",
                        "restructuring",
                    ],
                    &["layoff", "position eliminated", "other"],
                ),
                bucket(&["retirement", "retired"], &["retirement", "other"]),
                bucket(&["deceased", "death"], &["deceased", "other"]),
                bucket(
                    &[
                        "end of contract",
                        "contract ended",
                        "assignment ended",
                        "end of assignment",
                    ],
                    &["contract ended", "end of assignment", "other"],
                ),
            ],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.sheets.source.is_empty()
            || self.sheets.authoritative.is_empty()
            || self.sheets.mapping.is_empty()
        {
            return Err(AuditError::ConfigValidation(
                "every sheet needs at least one candidate name".into(),
            ));
        }
        if self.mapping.source_column.is_empty() || self.mapping.authoritative_column.is_empty() {
            return Err(AuditError::ConfigValidation(
                "mapping header candidates must not be empty".into(),
            ));
        }
        if self.mapping.identifier.is_empty() {
            return Err(AuditError::ConfigValidation(
                "at least one identifier row label is required".into(),
            ));
        }
        if self.phone_country_code.is_empty()
            || !self.phone_country_code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AuditError::ConfigValidation(format!(
                "phone_country_code must be digits, got '{}'",
                self.phone_country_code
            )));
        }
        if self.postal_code_width == 0 || self.tax_id_width == 0 {
            return Err(AuditError::ConfigValidation(
                "postal_code_width and tax_id_width must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
