//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Domain    | Description                                        |
//! |------|-----------|----------------------------------------------------|
//! | 0    | Universal | Success                                            |
//! | 1    | Universal | General error (unspecified)                        |
//! | 2    | Universal | CLI usage error (bad args)                         |
//! | 3    | config    | Config file unreadable or invalid                  |
//! | 4    | input     | A source workbook could not be opened or read      |
//! | 5    | input     | A required Layout-B column was not found           |
//! | 6    | report    | The comparison workbook could not be written       |
//!
//! A comparison that finds differences still exits 0: the report is the
//! deliverable, not a pass/fail verdict.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the mapping functions below

use folha_io::IoError;
use folha_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// Emitted by clap itself before any command runs.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Comparison (3-6)
// =============================================================================

/// Config file could not be read or did not validate.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// Source workbook could not be opened, or the requested sheet is absent.
pub const EXIT_INPUT_READ: u8 = 4;

/// No Layout-B header contains the needle of a required field.
pub const EXIT_COLUMN_DISCOVERY: u8 = 5;

/// Report workbook could not be built or saved.
pub const EXIT_REPORT_WRITE: u8 = 6;

// =============================================================================
// Error mapping
// =============================================================================

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        ReconError::MissingColumn { .. } => EXIT_COLUMN_DISCOVERY,
    }
}

/// Map a file I/O error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Open { .. } | IoError::SheetNotFound { .. } | IoError::NoSheets { .. } | IoError::Read(_) => {
            EXIT_INPUT_READ
        }
        IoError::Write(_) => EXIT_REPORT_WRITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn engine_errors_map_to_registry() {
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_CONFIG_INVALID);
        assert_eq!(recon_exit_code(&ReconError::ConfigValidation("x".into())), EXIT_CONFIG_INVALID);
        let missing = ReconError::MissingColumn { field: "amount".into(), needle: "valor".into() };
        assert_eq!(recon_exit_code(&missing), EXIT_COLUMN_DISCOVERY);
    }

    #[test]
    fn io_errors_map_to_registry() {
        let open = IoError::Open { path: PathBuf::from("a.xlsx"), message: "gone".into() };
        assert_eq!(io_exit_code(&open), EXIT_INPUT_READ);
        assert_eq!(io_exit_code(&IoError::NoSheets { path: PathBuf::from("a.xlsx") }), EXIT_INPUT_READ);
        assert_eq!(io_exit_code(&IoError::Write("disk full".into())), EXIT_REPORT_WRITE);
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CONFIG_INVALID,
            EXIT_INPUT_READ,
            EXIT_COLUMN_DISCOVERY,
            EXIT_REPORT_WRITE,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
