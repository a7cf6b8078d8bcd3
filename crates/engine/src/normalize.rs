use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::classify::FieldKind;
use crate::config::AuditConfig;

/// Tokens census exports use for "no value".
const BLANK_TOKENS: [&str; 3] = ["nan", "null", "none"];

/// Date formats tried in order; the first parse wins.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%m/%d/%y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Collapse whitespace runs (including non-breaking spaces and newlines) to
/// single spaces, trimming the ends.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Casefolded, whitespace-collapsed form used for header and keyword matching.
pub fn fold(s: &str) -> String {
    collapse_ws(s).to_lowercase()
}

/// Map blank-like cell text ("", "nan", "null", "none") to the empty
/// canonical value; everything else passes through trimmed.
pub fn norm_blank(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() || BLANK_TOKENS.contains(&t.to_lowercase().as_str()) {
        String::new()
    } else {
        t.to_string()
    }
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonicalize a raw cell value for comparison. Total: unparsable input
/// degrades to text normalization, never an error.
pub fn normalize(kind: FieldKind, raw: &str, config: &AuditConfig) -> String {
    let value = norm_blank(raw);
    if value.is_empty() {
        return value;
    }
    match kind {
        FieldKind::Phone => norm_phone(&value, &config.phone_country_code),
        FieldKind::PostalCode => norm_postal(&value, config.postal_code_width),
        FieldKind::TaxId => norm_tax_id(&value, config.tax_id_width),
        FieldKind::Date => norm_date(&value),
        FieldKind::Initial => norm_initial(&value),
        FieldKind::Suffix => norm_suffix(&value),
        FieldKind::EmploymentType => norm_employment_type(&value),
        FieldKind::PayType => norm_pay_type(&value),
        FieldKind::EmploymentStatus => norm_employment_status(&value),
        FieldKind::Numeric => norm_numeric(&value),
        FieldKind::TerminationReason | FieldKind::Text => norm_text(&value),
    }
}

fn norm_phone(value: &str, country_code: &str) -> String {
    let mut d = digits_only(value);
    if d.len() == 10 + country_code.len() && d.starts_with(country_code) {
        d.drain(..country_code.len());
    }
    if d.len() > 10 {
        d = d[d.len() - 10..].to_string();
    }
    d
}

fn norm_postal(value: &str, width: usize) -> String {
    let mut d = digits_only(value);
    if d.is_empty() {
        return d;
    }
    d = format!("{d:0>width$}");
    d.truncate(width);
    d
}

/// Zero-padded so numeric-type coercion upstream never loses leading zeros.
fn norm_tax_id(value: &str, width: usize) -> String {
    let d = digits_only(value);
    if d.is_empty() {
        return d;
    }
    format!("{d:0>width$}")
}

/// Parse to a calendar date, discarding time-of-day. Placeholder zero-dates
/// normalize to empty; unparsable input passes through unchanged.
fn norm_date(value: &str) -> String {
    let d = digits_only(value);
    if !d.is_empty() && d.bytes().all(|b| b == b'0') {
        return String::new();
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    value.to_string()
}

/// Initial-vs-full-name fields compare by first letter only.
fn norm_initial(value: &str) -> String {
    value
        .chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

fn norm_suffix(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// "Full Time", "Full-Time", and "full  time" all compare equal.
fn norm_employment_type(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    fold(&replaced)
}

/// Buckets: anything hourly-flavored vs anything salaried-flavored.
fn norm_pay_type(value: &str) -> String {
    let folded = fold(value);
    if folded.contains("hour") {
        "hourly".to_string()
    } else if folded.contains("salar") {
        "salaried".to_string()
    } else {
        folded
    }
}

/// On-leave employees count as active for comparison purposes.
fn norm_employment_status(value: &str) -> String {
    let folded = fold(value);
    if folded.contains("leave") {
        "active".to_string()
    } else {
        folded
    }
}

/// Exact decimal comparison so trailing-zero formatting never mismatches.
fn norm_numeric(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned);
    match cleaned.parse::<Decimal>() {
        Ok(d) => d.normalize().to_string(),
        Err(_) => norm_text(value),
    }
}

fn norm_text(value: &str) -> String {
    fold(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
