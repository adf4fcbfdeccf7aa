//! Shared plumbing for the command-line tools: table selection flags,
//! context loading and exit-code mapping.

use clap::Args;
use masak_core::{ComplianceContext, ComplianceError, ComplianceResult, Settings, ValidationError};
use std::path::PathBuf;
use std::process::ExitCode;

/// Table selection. Flags override `MASAK_DATA_DIR` / `MASAK_TABLE_VERSION`.
#[derive(Debug, Clone, Args)]
pub struct TableArgs {
    /// Directory holding thresholds/, risk_model/, required_fields/ and casp_profiles/
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Table version to load (file stem inside each table directory)
    #[arg(long)]
    pub table_version: Option<String>,
}

impl TableArgs {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(version) = &self.table_version {
            settings.table_version = version.clone();
        }
        settings
    }

    pub fn load(&self) -> ComplianceResult<ComplianceContext> {
        ComplianceContext::load(&self.settings())
    }
}

/// 0 on success, 2 for validation and missing-context errors, 1 for
/// configuration failures and anything unexpected.
pub fn exit_code(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            if let Some(e) = err.downcast_ref::<ComplianceError>() {
                e.exit_code() as u8
            } else if err.downcast_ref::<ValidationError>().is_some() {
                2
            } else {
                1
            }
        }
    }
}

/// Print the error (if any) to stderr and turn the result into the process
/// exit status.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    if let Err(err) = &result {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_code(&result))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "YES"
    } else {
        "NO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masak_core::ConfigError;
    use rust_decimal::Decimal;

    #[test]
    fn validation_errors_exit_with_two() {
        let err: anyhow::Error = ComplianceError::from(ValidationError::NegativeAmount {
            amount: Decimal::NEGATIVE_ONE,
        })
        .into();
        assert_eq!(exit_code(&Err(err)), 2);
    }

    #[test]
    fn bare_validation_errors_exit_with_two() {
        let err: anyhow::Error = ValidationError::InvalidCurrency { code: "TL".into() }.into();
        assert_eq!(exit_code(&Err(err)), 2);
    }

    #[test]
    fn config_errors_exit_with_one() {
        let err: anyhow::Error = ComplianceError::from(ConfigError::DuplicateRuleId {
            rule_id: "LTR-WIRE-75K".into(),
        })
        .into();
        assert_eq!(exit_code(&Err(err)), 1);
    }

    #[test]
    fn flags_override_environment_defaults() {
        let args = TableArgs {
            data_dir: Some(PathBuf::from("/srv/masak")),
            table_version: Some("2026".into()),
        };
        let settings = args.settings();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/masak"));
        assert_eq!(settings.table_version, "2026");
    }
}
