use std::collections::HashSet;

use crate::model::{ComparisonRow, NormalizedRecord, RecordKey, ReconSummary};
use crate::money::{cents_to_decimal, decimal_to_cents};
use crate::normalize::branch_label;

/// Compute summary statistics for a reconciliation run.
pub fn compute_summary(
    records_a: &[NormalizedRecord],
    records_b: &[NormalizedRecord],
    rows: &[ComparisonRow],
) -> ReconSummary {
    let keys_a: HashSet<RecordKey> = records_a
        .iter()
        .map(|r| RecordKey {
            branch: branch_label(&r.id),
            ..r.key()
        })
        .collect();
    let keys_b: HashSet<RecordKey> = records_b.iter().map(NormalizedRecord::key).collect();

    let unmatched_a = records_a
        .iter()
        .filter(|r| {
            let key = RecordKey {
                branch: branch_label(&r.id),
                ..r.key()
            };
            !keys_b.contains(&key)
        })
        .count();
    let unmatched_b = records_b.iter().filter(|r| !keys_a.contains(&r.key())).count();

    let mut total_a = 0i64;
    let mut total_b = 0i64;
    let mut with_difference = 0;
    for row in rows {
        total_a = total_a.saturating_add(decimal_to_cents(row.total_a));
        total_b = total_b.saturating_add(decimal_to_cents(row.total_b));
        if !row.difference.is_zero() {
            with_difference += 1;
        }
    }

    ReconSummary {
        records_a: records_a.len(),
        records_b: records_b.len(),
        matched: rows.len(),
        with_difference,
        unmatched_a,
        unmatched_b,
        total_a: cents_to_decimal(total_a),
        total_b: cents_to_decimal(total_b),
        total_difference: cents_to_decimal(total_a.saturating_sub(total_b)),
    }
}
