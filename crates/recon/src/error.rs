use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty needle, wrong header count, etc.).
    ConfigValidation(String),
    /// No header of a Layout-B sheet contains the needle for a required field.
    MissingColumn { field: String, needle: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { field, needle } => {
                write!(f, "no header contains '{needle}' (required for {field} column)")
            }
        }
    }
}

impl std::error::Error for ReconError {}
