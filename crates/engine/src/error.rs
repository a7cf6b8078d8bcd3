use std::fmt;

#[derive(Debug)]
pub enum AuditError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty candidate list, zero width, etc.).
    ConfigValidation(String),
    /// A required sheet is absent from the workbook.
    MissingSheet { name: String, available: Vec<String> },
    /// The mapping sheet lacks one of its two required columns.
    MissingMappingColumn { column: String },
    /// The identifier-correspondence row is absent from the mapping sheet.
    MissingIdentifierRow,
    /// The identifier column could not be located in a census table.
    MissingIdentifierColumn { table: String, label: String },
    /// Workbook bytes could not be opened or decoded.
    Workbook(String),
    /// IO error (file read, report write, etc.).
    Io(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingSheet { name, available } => {
                write!(
                    f,
                    "missing sheet '{name}' (workbook has: {})",
                    available.join(", ")
                )
            }
            Self::MissingMappingColumn { column } => {
                write!(f, "mapping sheet: missing required column '{column}'")
            }
            Self::MissingIdentifierRow => {
                write!(f, "mapping sheet: no employee-identifier row found")
            }
            Self::MissingIdentifierColumn { table, label } => {
                write!(f, "{table} table: identifier column '{label}' not found")
            }
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}
