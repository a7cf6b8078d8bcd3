// Census audit CLI - headless audit runs

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use censaudit_engine::error::AuditError;
use censaudit_engine::AuditConfig;
use censaudit_io::audit::run_audit_full;
use censaudit_io::csv::write_detail_csv;

use exit_codes::{
    EXIT_ERROR, EXIT_FINDINGS, EXIT_INVALID_CONFIG, EXIT_SUCCESS, EXIT_USAGE, EXIT_WORKBOOK,
};

#[derive(Parser)]
#[command(name = "censaudit")]
#[command(about = "Census audit - reconcile two employee exports against a field mapping")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an audit over an uploaded workbook
    #[command(after_help = "\
Examples:
  censaudit run census.xlsx
  censaudit run census.xlsx --output report.xlsx
  censaudit run census.xlsx --config audit.toml --json
  censaudit run census.xlsx --csv detail.csv --strict")]
    Run {
        /// Workbook with the source, authoritative, and mapping sheets
        workbook: PathBuf,

        /// Report output path (default: <workbook>.report.xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write the detail table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Audit config TOML (defaults are compiled in)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Exit non-zero when any row is not OK
        #[arg(long)]
        strict: bool,
    },

    /// Validate an audit config without running
    #[command(after_help = "\
Examples:
  censaudit validate audit.toml")]
    Validate {
        /// Path to the audit config TOML
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders its own message; map onto the registry's codes
            let _ = e.print();
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    EXIT_SUCCESS
                }
                _ => EXIT_USAGE,
            };
            return ExitCode::from(code);
        }
    };

    let result = match cli.command {
        Commands::Run {
            workbook,
            output,
            csv,
            config,
            json,
            strict,
        } => cmd_run(workbook, output, csv, config, json, strict),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Map an engine error onto the exit-code registry, with hints for the
    /// configuration errors a user can actually act on.
    fn audit(err: AuditError) -> Self {
        let code = match &err {
            AuditError::ConfigParse(_) | AuditError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            AuditError::MissingSheet { .. }
            | AuditError::MissingMappingColumn { .. }
            | AuditError::MissingIdentifierRow
            | AuditError::MissingIdentifierColumn { .. }
            | AuditError::Workbook(_) => EXIT_WORKBOOK,
            AuditError::Io(_) => EXIT_ERROR,
        };
        let hint = match &err {
            AuditError::MissingSheet { .. } => {
                Some("sheet name candidates are configurable under [sheets] in the audit config".into())
            }
            AuditError::MissingIdentifierRow => {
                Some("the mapping sheet needs a row pairing the employee-identifier columns".into())
            }
            _ => None,
        };
        Self {
            code,
            message: err.to_string(),
            hint,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AuditConfig, CliError> {
    match path {
        None => Ok(AuditConfig::default()),
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", p.display())))?;
            AuditConfig::from_toml(&text).map_err(CliError::audit)
        }
    }
}

fn default_report_path(workbook: &Path) -> PathBuf {
    workbook.with_extension("report.xlsx")
}

fn cmd_run(
    workbook: PathBuf,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let bytes = std::fs::read(&workbook)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", workbook.display())))?;

    let (result, report) = run_audit_full(&bytes, &config).map_err(CliError::audit)?;

    let out_path = output.unwrap_or_else(|| default_report_path(&workbook));
    std::fs::write(&out_path, &report)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", out_path.display())))?;
    eprintln!("wrote {}", out_path.display());

    if let Some(csv_path) = csv {
        let detail = write_detail_csv(&result).map_err(CliError::audit)?;
        std::fs::write(&csv_path, detail)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", csv_path.display())))?;
        eprintln!("wrote {}", csv_path.display());
    }

    if json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    let s = &result.summary;
    eprintln!(
        "{} employees ({} source / {} authoritative), {} fields, {} rows — {} not OK",
        s.common_employees + s.source_only + s.authoritative_only,
        s.source_employees,
        s.authoritative_employees,
        s.fields_compared,
        s.total_rows,
        s.not_ok_rows,
    );

    if strict && s.not_ok_rows > 0 {
        return Err(CliError {
            code: EXIT_FINDINGS,
            message: format!("{} rows are not OK", s.not_ok_rows),
            hint: None,
        });
    }
    Ok(())
}

fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&config)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", config.display())))?;
    let parsed = AuditConfig::from_toml(&text).map_err(CliError::audit)?;
    eprintln!("config OK: {}", parsed.name);
    Ok(())
}
