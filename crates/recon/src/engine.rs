use std::collections::HashMap;

use crate::cell::RawSheet;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::layout_a::extract_layout_a;
use crate::layout_b::extract_layout_b;
use crate::model::{ComparisonRow, NormalizedRecord, RecordKey, ReconMeta, ReconResult};
use crate::money::cents_to_decimal;
use crate::normalize::branch_label;
use crate::summary::compute_summary;

/// Extract both sheets, reconcile, and summarize.
pub fn run(config: &ReconConfig, sheet_a: &RawSheet, sheet_b: &RawSheet) -> Result<ReconResult, ReconError> {
    let records_a = extract_layout_a(sheet_a, &config.layout_a);
    let records_b = extract_layout_b(sheet_b, &config.layout_b)?;

    let rows = reconcile(&records_a, &records_b);
    let summary = compute_summary(&records_a, &records_b, &rows);

    log::info!(
        "reconciled {} x {} record(s): {} matched, {} with difference",
        summary.records_a,
        summary.records_b,
        summary.matched,
        summary.with_difference,
    );

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
    })
}

/// Inner join on (id, branch, description, date) and compute differences.
///
/// Layout-A's captured label is replaced with the canonical `Filial {id}`
/// before joining. Records present on one side only are dropped.
pub fn reconcile(a: &[NormalizedRecord], b: &[NormalizedRecord]) -> Vec<ComparisonRow> {
    let mut right: HashMap<RecordKey, Vec<&NormalizedRecord>> = HashMap::new();
    for rec in b {
        right.entry(rec.key()).or_default().push(rec);
    }

    let mut rows: Vec<ComparisonRow> = Vec::new();
    for left in a {
        let left = NormalizedRecord {
            branch: branch_label(&left.id),
            ..left.clone()
        };
        let Some(partners) = right.get(&left.key()) else {
            continue;
        };
        for partner in partners {
            rows.push(compare(&left, partner));
        }
    }

    rows.sort_by(|x, y| x.id.cmp(&y.id).then_with(|| y.total_a.cmp(&x.total_a)));
    rows
}

fn compare(left: &NormalizedRecord, right: &NormalizedRecord) -> ComparisonRow {
    let difference_cents = left.total_cents.saturating_sub(right.total_cents);
    ComparisonRow {
        id: left.id.clone(),
        branch: left.branch.clone(),
        description: left.description.clone(),
        total_a: cents_to_decimal(left.total_cents),
        total_b: cents_to_decimal(right.total_cents),
        difference: cents_to_decimal(difference_cents),
        date: left.date.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::amount_to_cents;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn rec(id: &str, branch: &str, desc: &str, cents: i64, date: &str) -> NormalizedRecord {
        NormalizedRecord {
            id: id.into(),
            branch: branch.into(),
            description: desc.into(),
            total_cents: cents,
            date: date.into(),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn difference_sign_convention() {
        let a = vec![rec("1", "Filial 001 - Centro", "Salário", 15000, "05/04/2025")];
        let b = vec![rec("1", "Filial 1", "Salário", 12000, "05/04/2025")];
        let rows = reconcile(&a, &b);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].branch, "Filial 1");
        assert_eq!(rows[0].total_a, dec("150.00"));
        assert_eq!(rows[0].total_b, dec("120.00"));
        assert_eq!(rows[0].difference, dec("30.00"));
        assert_eq!(rows[0].difference.to_string(), "30.00");
    }

    #[test]
    fn one_sided_records_dropped() {
        let a = vec![
            rec("1", "x", "Salário", 100, "05/04/2025"),
            rec("1", "x", "INSS", 100, "05/04/2025"),
        ];
        let b = vec![
            rec("1", "Filial 1", "Salário", 100, "05/04/2025"),
            rec("1", "Filial 1", "Salário", 100, "06/04/2025"),
            rec("2", "Filial 2", "INSS", 100, "05/04/2025"),
        ];
        let rows = reconcile(&a, &b);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Salário");
        assert_eq!(rows[0].difference, Decimal::ZERO);
    }

    #[test]
    fn empty_join_is_empty_table() {
        let a = vec![rec("1", "x", "Salário", 100, "05/04/2025")];
        assert!(reconcile(&a, &[]).is_empty());
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn sorted_by_id_then_total_a_desc() {
        let a = vec![
            rec("2", "", "A", 500, ""),
            rec("1", "", "B", 100, ""),
            rec("1", "", "C", 900, ""),
            rec("10", "", "D", 50, ""),
        ];
        let b: Vec<NormalizedRecord> = a
            .iter()
            .map(|r| rec(&r.id, &format!("Filial {}", r.id), &r.description, 0, ""))
            .collect();
        let rows = reconcile(&a, &b);
        let order: Vec<(&str, &str)> = rows.iter().map(|r| (r.id.as_str(), r.description.as_str())).collect();
        // ids compare as strings
        assert_eq!(order, vec![("1", "C"), ("1", "B"), ("10", "D"), ("2", "A")]);
    }

    #[test]
    fn ties_keep_input_order() {
        let a = vec![
            rec("1", "", "X", 100, "d"),
            rec("1", "", "Y", 100, "d"),
            rec("1", "", "Z", 100, "d"),
        ];
        let b: Vec<NormalizedRecord> = a
            .iter()
            .rev()
            .map(|r| rec("1", "Filial 1", &r.description, 100, "d"))
            .collect();
        let rows = reconcile(&a, &b);
        let order: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn out_of_range_amounts_do_not_overflow() {
        let a = vec![rec("1", "", "Salário", amount_to_cents(-1e300), "d")];
        let b = vec![rec("1", "Filial 1", "Salário", amount_to_cents(1.0), "d")];
        let rows = reconcile(&a, &b);
        assert_eq!(rows[0].total_a, Decimal::ZERO);
        assert_eq!(rows[0].difference, dec("-1.00"));

        let a = vec![rec("1", "", "Salário", i64::MAX, "d")];
        let b = vec![rec("1", "Filial 1", "Salário", -100, "d")];
        let rows = reconcile(&a, &b);
        assert_eq!(rows[0].difference, cents_to_decimal(i64::MAX));
    }

    #[test]
    fn duplicate_keys_pair_each() {
        let a = vec![
            rec("1", "", "Salário", 100, "d"),
            rec("1", "", "Salário", 300, "d"),
        ];
        let b = vec![rec("1", "Filial 1", "Salário", 200, "d")];
        let rows = reconcile(&a, &b);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].difference, dec("1.00"));
        assert_eq!(rows[1].difference, dec("-1.00"));
    }
}
