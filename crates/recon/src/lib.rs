//! `folha-recon` — payroll reconciliation engine.
//!
//! Pure engine crate: receives two pre-loaded [`RawSheet`]s (one per source
//! layout), returns the joined comparison rows. No CLI or IO dependencies.

pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout_a;
pub mod layout_b;
pub mod model;
pub mod money;
pub mod normalize;
pub mod summary;

pub use cell::{Cell, RawSheet};
pub use config::ReconConfig;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use layout_a::extract_layout_a;
pub use layout_b::extract_layout_b;
pub use model::{ComparisonRow, NormalizedRecord, ReconResult, ReconSummary};
