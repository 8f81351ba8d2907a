use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// The workbook could not be opened or its format was not recognized.
    Open { path: PathBuf, message: String },
    /// The requested sheet name is not in the workbook.
    SheetNotFound { path: PathBuf, sheet: String },
    /// The workbook has no worksheets at all.
    NoSheets { path: PathBuf },
    /// Reading cell data failed.
    Read(String),
    /// Building or saving the report failed.
    Write(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => {
                write!(f, "cannot open {}: {message}", path.display())
            }
            Self::SheetNotFound { path, sheet } => {
                write!(f, "{}: no sheet named '{sheet}'", path.display())
            }
            Self::NoSheets { path } => write!(f, "{}: workbook contains no sheets", path.display()),
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<rust_xlsxwriter::XlsxError> for IoError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Write(e.to_string())
    }
}
