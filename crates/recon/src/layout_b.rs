//! Layout-B extraction: one header row, one posting per row.
//!
//! Columns are discovered by case-insensitive substring match on the header,
//! then postings are summed per (id, description, date) so that one record
//! corresponds to one Layout-A detail line.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::cell::{Cell, RawSheet};
use crate::config::{ColumnNeedles, LayoutBConfig};
use crate::error::ReconError;
use crate::model::{sort_by_total_desc, NormalizedRecord};
use crate::money::amount_to_cents;
use crate::normalize::{branch_label, description, format_date, normalize_id};

/// Resolved positions of the four semantic columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: usize,
    pub description: usize,
    pub date: usize,
    pub amount: usize,
}

/// First header (left to right) containing each needle wins.
pub fn discover_columns(headers: &[String], needles: &ColumnNeedles) -> Result<ColumnMap, ReconError> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let mut positions = [0usize; 4];
    for (slot, (field, needle)) in positions.iter_mut().zip(needles.fields()) {
        let needle_lower = needle.to_lowercase();
        *slot = lowered
            .iter()
            .position(|h| h.contains(&needle_lower))
            .ok_or_else(|| ReconError::MissingColumn {
                field: field.into(),
                needle: needle.into(),
            })?;
    }

    let [id, description, date, amount] = positions;
    Ok(ColumnMap {
        id,
        description,
        date,
        amount,
    })
}

// Missing sorts first, then native dates chronologically, then text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Missing,
    Date(NaiveDateTime),
    Text(String),
}

impl DateKey {
    fn from_cell(cell: &Cell) -> Self {
        if cell.is_missing() {
            Self::Missing
        } else if let Some(dt) = cell.as_datetime() {
            Self::Date(dt)
        } else {
            Self::Text(cell.to_display_string())
        }
    }
}

/// Field order gives numeric id order, then description, then date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    id_order: Option<u64>,
    id: String,
    description: String,
    date: DateKey,
}

struct Group {
    date: String,
    amount: f64,
    rows: usize,
}

/// Extract Layout-B records, sorted by `total_cents` descending.
pub fn extract_layout_b(sheet: &RawSheet, config: &LayoutBConfig) -> Result<Vec<NormalizedRecord>, ReconError> {
    let headers: Vec<String> = sheet
        .row(config.header_row)
        .iter()
        .map(Cell::to_display_string)
        .collect();
    let cols = discover_columns(&headers, &config.needles)?;
    log::debug!("sheet '{}': columns {:?}", sheet.name, cols);

    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    let mut data_rows = 0usize;

    for (offset, row) in sheet.rows().skip(config.header_row + 1).enumerate() {
        if row.iter().all(Cell::is_missing) {
            continue;
        }
        data_rows += 1;
        let row_idx = config.header_row + 1 + offset;

        let id_cell = sheet.cell(row_idx, cols.id);
        let date_cell = sheet.cell(row_idx, cols.date);
        let amount_cell = sheet.cell(row_idx, cols.amount);

        let id = normalize_id(id_cell);
        let key = GroupKey {
            id_order: id.parse().ok(),
            id,
            description: description(sheet.cell(row_idx, cols.description)),
            date: DateKey::from_cell(date_cell),
        };

        let amount = match amount_cell.as_f64() {
            Some(v) => v,
            None => {
                if !amount_cell.is_missing() {
                    log::warn!(
                        "sheet '{}', row {}: amount {:?} is not numeric; counted as 0",
                        sheet.name,
                        row_idx + 1,
                        amount_cell,
                    );
                }
                0.0
            }
        };

        let group = groups.entry(key).or_insert_with(|| Group {
            date: format_date(date_cell),
            amount: 0.0,
            rows: 0,
        });
        group.amount += amount;
        group.rows += 1;
    }

    log::info!(
        "sheet '{}': {} posting(s) grouped into {} record(s)",
        sheet.name,
        data_rows,
        groups.len()
    );

    let mut records: Vec<NormalizedRecord> = groups
        .into_iter()
        .map(|(key, group)| {
            if group.rows > 1 {
                log::debug!(
                    "id '{}', '{}': {} postings consolidated",
                    key.id,
                    key.description,
                    group.rows
                );
            }
            NormalizedRecord {
                branch: branch_label(&key.id),
                id: key.id,
                description: key.description,
                total_cents: amount_to_cents(group.amount),
                date: group.date,
            }
        })
        .collect();

    sort_by_total_desc(&mut records);
    Ok(records)
}
