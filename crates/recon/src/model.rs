use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Extractor output
// ---------------------------------------------------------------------------

/// Common record shape both source layouts are converted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedRecord {
    /// Branch id, decimal digits or empty.
    pub id: String,
    pub branch: String,
    pub description: String,
    pub total_cents: i64,
    /// `DD/MM/YYYY`, or whatever text the source held, or empty.
    pub date: String,
}

/// Join key shared by both record sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub id: String,
    pub branch: String,
    pub description: String,
    pub date: String,
}

impl NormalizedRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            id: self.id.clone(),
            branch: self.branch.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
        }
    }
}

/// Stable sort by `total_cents` descending; ties keep discovery order.
pub(crate) fn sort_by_total_desc(records: &mut [NormalizedRecord]) {
    records.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
}

// ---------------------------------------------------------------------------
// Reconciler output
// ---------------------------------------------------------------------------

/// One joined transaction. Monetary fields carry exactly two fraction digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub id: String,
    pub branch: String,
    pub description: String,
    pub total_a: Decimal,
    pub total_b: Decimal,
    pub difference: Decimal,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub records_a: usize,
    pub records_b: usize,
    pub matched: usize,
    pub with_difference: usize,
    /// Records on each side that found no partner under the exact key.
    pub unmatched_a: usize,
    pub unmatched_b: usize,
    pub total_a: Decimal,
    pub total_b: Decimal,
    pub total_difference: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<ComparisonRow>,
}
