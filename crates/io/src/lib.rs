// File I/O for the payroll comparison: raw sheet import and report export

pub mod error;
pub mod report;
pub mod xlsx;

pub use error::IoError;
pub use report::{render_report, write_report};
pub use xlsx::read_raw_sheet;
