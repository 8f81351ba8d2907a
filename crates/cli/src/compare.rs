//! `folha compare` and `folha validate`: config-driven payroll comparison.

use std::path::{Path, PathBuf};

use folha_io::{read_raw_sheet, write_report, IoError};
use folha_recon::{ReconConfig, ReconError};

use crate::exit_codes::{io_exit_code, recon_exit_code, EXIT_CONFIG_INVALID};
use crate::CliError;

/// Output file used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "comparativo_sistemas.xlsx";

pub struct CompareArgs {
    pub sistema1: PathBuf,
    pub sistema2: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub sheet_a: Option<String>,
    pub sheet_b: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::MissingColumn { .. } => Some(
            "check that the Sistema 2 header sits on layout_b.header_row, or adjust layout_b.needles in --config"
                .to_string(),
        ),
        _ => None,
    };
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
}

fn io_err(err: IoError) -> CliError {
    let hint = match &err {
        IoError::SheetNotFound { .. } => Some("omit --sheet-a/--sheet-b to use the first sheet".to_string()),
        _ => None,
    };
    CliError { code: io_exit_code(&err), message: err.to_string(), hint }
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG_INVALID,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    let config = ReconConfig::from_toml(&config_str).map_err(recon_err)?;
    log::debug!("config loaded from {}", path.display());
    Ok(config)
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let sheet_a = read_raw_sheet(&args.sistema1, args.sheet_a.as_deref()).map_err(io_err)?;
    let sheet_b = read_raw_sheet(&args.sistema2, args.sheet_b.as_deref()).map_err(io_err)?;

    let result = folha_recon::run(&config, &sheet_a, &sheet_b).map_err(recon_err)?;

    let output = args.output;
    write_report(&output, &result.rows, &config.report).map_err(io_err)?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: crate::exit_codes::EXIT_REPORT_WRITE,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    }

    if !args.quiet {
        let s = &result.summary;
        eprintln!(
            "{} row(s) compared, {} with difference; unmatched: {} in Sistema 1, {} in Sistema 2; total difference {}",
            s.matched, s.with_difference, s.unmatched_a, s.unmatched_b, s.total_difference,
        );
    }
    eprintln!("Arquivo Excel formatado salvo em: {}", output.display());

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: layout A marker '{}', layout B header row {}, report sheet '{}'",
        config.layout_a.marker_prefix, config.layout_b.header_row, config.report.sheet_name,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_config_path_means_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ReconConfig::default());
    }

    #[test]
    fn unreadable_config_is_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/folha.toml"))).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
        assert!(err.message.contains("cannot read config"));
    }

    #[test]
    fn missing_column_carries_hint() {
        let err = recon_err(ReconError::MissingColumn { field: "date".into(), needle: "data".into() });
        assert_eq!(err.code, crate::exit_codes::EXIT_COLUMN_DISCOVERY);
        assert!(err.hint.is_some());
    }
}
