//! Layout-A extraction: repeating per-branch blocks with implicit headers.
//!
//! ```text
//! row i      | <id> | Filial ...  |     |        |   <- marker
//! row i+2    |      |             |     | <date> |
//! row h      |      | Descrição   |     |        |   <- detail header
//! row h+2..  | <x>  | <desc>      |     | <amt>  |   <- details until next marker
//! ```
//!
//! The scan is a small state machine over row indices. A marker whose header
//! is never found is dropped and scanning resumes on the row after it.

use crate::cell::{Cell, RawSheet};
use crate::config::LayoutAConfig;
use crate::model::{sort_by_total_desc, NormalizedRecord};
use crate::money::amount_to_cents;
use crate::normalize::{description, format_date, normalize_id};

/// A branch block located in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub marker_row: usize,
    pub header_row: usize,
    pub detail_rows: Vec<usize>,
    pub id: String,
    /// Trimmed marker text, e.g. "Filial 001 - Centro".
    pub label: String,
    pub date: String,
}

#[derive(Debug)]
struct Marker {
    row: usize,
    id: String,
    label: String,
    date: String,
}

#[derive(Debug)]
enum ScanState {
    SeekingMarker { row: usize },
    SeekingHeader { marker: Marker, row: usize },
    EmittingDetails { block: Block, row: usize },
}

fn is_marker(cell: &Cell, config: &LayoutAConfig) -> bool {
    cell.as_text()
        .map(|s| s.trim().to_lowercase().starts_with(&config.marker_prefix.to_lowercase()))
        .unwrap_or(false)
}

// Exact, case- and accent-sensitive, unlike the marker test.
fn is_detail_header(cell: &Cell, config: &LayoutAConfig) -> bool {
    cell.as_text() == Some(config.header_label.as_str())
}

fn read_marker(sheet: &RawSheet, row: usize, config: &LayoutAConfig) -> Marker {
    let label = sheet
        .cell(row, config.description_column)
        .as_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Marker {
        row,
        id: normalize_id(sheet.cell(row, config.id_column)),
        label,
        date: format_date(sheet.cell(row + config.date_row_offset, config.date_column)),
    }
}

/// Locate every block that has a detail header.
pub fn scan_blocks(sheet: &RawSheet, config: &LayoutAConfig) -> Vec<Block> {
    let height = sheet.height();
    let marker_at = |row: usize| is_marker(sheet.cell(row, config.description_column), config);

    let mut blocks = Vec::new();
    let mut state = ScanState::SeekingMarker { row: 0 };

    loop {
        state = match state {
            ScanState::SeekingMarker { row } => {
                if row >= height {
                    break;
                }
                if marker_at(row) {
                    ScanState::SeekingHeader {
                        marker: read_marker(sheet, row, config),
                        row: row + 1,
                    }
                } else {
                    ScanState::SeekingMarker { row: row + 1 }
                }
            }
            ScanState::SeekingHeader { marker, row } => {
                if row >= height {
                    log::warn!(
                        "sheet '{}': branch marker at row {} has no '{}' header below it; block skipped",
                        sheet.name,
                        marker.row + 1,
                        config.header_label,
                    );
                    ScanState::SeekingMarker { row: marker.row + 1 }
                } else if is_detail_header(sheet.cell(row, config.description_column), config) {
                    log::debug!(
                        "sheet '{}': block '{}' (id '{}') at row {}, header at row {}",
                        sheet.name,
                        marker.label,
                        marker.id,
                        marker.row + 1,
                        row + 1,
                    );
                    ScanState::EmittingDetails {
                        block: Block {
                            marker_row: marker.row,
                            header_row: row,
                            detail_rows: Vec::new(),
                            id: marker.id,
                            label: marker.label,
                            date: marker.date,
                        },
                        row: row + config.detail_row_offset,
                    }
                } else {
                    ScanState::SeekingHeader { marker, row: row + 1 }
                }
            }
            ScanState::EmittingDetails { mut block, row } => {
                if row >= height || marker_at(row) {
                    // The next marker is left for the outer scan.
                    let resume = block.marker_row + 1;
                    blocks.push(block);
                    ScanState::SeekingMarker { row: resume }
                } else {
                    if !sheet.cell(row, config.id_column).is_missing() {
                        block.detail_rows.push(row);
                    }
                    ScanState::EmittingDetails { block, row: row + 1 }
                }
            }
        };
    }

    blocks
}

/// Extract Layout-A records, sorted by `total_cents` descending.
pub fn extract_layout_a(sheet: &RawSheet, config: &LayoutAConfig) -> Vec<NormalizedRecord> {
    let blocks = scan_blocks(sheet, config);

    let mut records: Vec<NormalizedRecord> = blocks
        .iter()
        .flat_map(|block| {
            block.detail_rows.iter().map(move |&row| NormalizedRecord {
                id: block.id.clone(),
                branch: block.label.clone(),
                description: description(sheet.cell(row, config.description_column)),
                total_cents: sheet
                    .cell(row, config.amount_column)
                    .as_f64()
                    .map(amount_to_cents)
                    .unwrap_or(0),
                date: block.date.clone(),
            })
        })
        .collect();

    log::info!(
        "sheet '{}': {} block(s), {} record(s)",
        sheet.name,
        blocks.len(),
        records.len()
    );

    sort_by_total_desc(&mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32, m: u32, y: i32) -> Cell {
        Cell::DateTime(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    fn row(cells: &[Cell]) -> Vec<Cell> {
        cells.to_vec()
    }

    fn e() -> Cell {
        Cell::Empty
    }

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    /// Two blocks: branch 1 with three details (one blank-id row in between),
    /// branch 2 with one detail.
    fn two_block_sheet() -> RawSheet {
        RawSheet::new(
            "Folha",
            vec![
                row(&[t("Relatório de folha"), e(), e(), e()]),
                row(&[n(1.0), t("Filial 001 - Centro"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[e(), t("Competência"), e(), date(5, 4, 2025)]),
                row(&[t("Cód"), t("Descrição"), e(), t("Total")]),
                row(&[e(), e(), e(), e()]),
                row(&[n(10.0), t("Salário"), e(), n(1234.56)]),
                row(&[e(), t("subtotal"), e(), n(99999.0)]),
                row(&[n(11.0), t("INSS"), e(), n(300.0)]),
                row(&[n(12.0), t("FGTS"), e(), e()]),
                row(&[n(2.0), t("  FILIAL 002"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[e(), e(), e(), t("06/04/2025")]),
                row(&[t("Cód"), t("Descrição"), e(), t("Total")]),
                row(&[e(), e(), e(), e()]),
                row(&[n(10.0), t("Salário"), e(), n(500.0)]),
            ],
        )
    }

    #[test]
    fn blocks_and_boundaries() {
        let blocks = scan_blocks(&two_block_sheet(), &LayoutAConfig::default());
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].marker_row, 1);
        assert_eq!(blocks[0].header_row, 4);
        assert_eq!(blocks[0].detail_rows, vec![6, 8, 9]);
        assert_eq!(blocks[0].id, "1");
        assert_eq!(blocks[0].label, "Filial 001 - Centro");
        assert_eq!(blocks[0].date, "05/04/2025");

        assert_eq!(blocks[1].marker_row, 10);
        assert_eq!(blocks[1].detail_rows, vec![15]);
        assert_eq!(blocks[1].id, "2");
        assert_eq!(blocks[1].date, "06/04/2025");
    }

    #[test]
    fn records_carry_block_fields_and_sort_desc() {
        let records = extract_layout_a(&two_block_sheet(), &LayoutAConfig::default());
        let summary: Vec<(&str, &str, i64, &str)> = records
            .iter()
            .map(|r| (r.id.as_str(), r.description.as_str(), r.total_cents, r.date.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1", "Salário", 123456, "05/04/2025"),
                ("2", "Salário", 50000, "06/04/2025"),
                ("1", "INSS", 30000, "05/04/2025"),
                ("1", "FGTS", 0, "05/04/2025"),
            ]
        );
        assert_eq!(records[0].branch, "Filial 001 - Centro");
    }

    #[test]
    fn marker_without_header_is_dropped() {
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[n(7.0), t("Filial 7"), e(), e()]),
                row(&[n(1.0), t("Salário"), e(), n(10.0)]),
            ],
        );
        assert!(scan_blocks(&sheet, &LayoutAConfig::default()).is_empty());
        assert!(extract_layout_a(&sheet, &LayoutAConfig::default()).is_empty());
    }

    #[test]
    fn header_match_is_exact() {
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[n(7.0), t("filial 7"), e(), e()]),
                row(&[e(), t("DESCRIÇÃO"), e(), e()]),
                row(&[e(), t("Descricao"), e(), e()]),
                row(&[n(1.0), t("Salário"), e(), n(10.0)]),
            ],
        );
        assert!(extract_layout_a(&sheet, &LayoutAConfig::default()).is_empty());
    }

    #[test]
    fn block_without_details_yields_nothing() {
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[n(3.0), t("Filial 3"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[e(), e(), e(), date(1, 4, 2025)]),
                row(&[e(), t("Descrição"), e(), e()]),
            ],
        );
        let blocks = scan_blocks(&sheet, &LayoutAConfig::default());
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].detail_rows.is_empty());
        assert!(extract_layout_a(&sheet, &LayoutAConfig::default()).is_empty());
    }

    #[test]
    fn missing_id_and_date_default_to_empty() {
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[e(), t("Filial sem código"), e(), e()]),
                row(&[e(), t("Descrição"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[n(1.0), t("Salário"), e(), n(10.0)]),
            ],
        );
        let records = extract_layout_a(&sheet, &LayoutAConfig::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "");
        assert_eq!(records[0].date, "");
        assert_eq!(records[0].total_cents, 1000);
    }

    #[test]
    fn header_past_next_marker_is_shared() {
        // The first marker's header search runs past the second marker.
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[n(1.0), t("Filial 1"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[e(), e(), e(), date(5, 4, 2025)]),
                row(&[n(2.0), t("Filial 2"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[e(), t("Descrição"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[n(10.0), t("Salário"), e(), n(100.0)]),
                row(&[n(11.0), t("INSS"), e(), n(50.0)]),
            ],
        );
        let blocks = scan_blocks(&sheet, &LayoutAConfig::default());
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].marker_row, blocks[0].header_row), (0, 5));
        assert_eq!((blocks[1].marker_row, blocks[1].header_row), (3, 5));
        assert_eq!(blocks[0].detail_rows, vec![7, 8]);
        assert_eq!(blocks[1].detail_rows, vec![7, 8]);
        assert_eq!(blocks[0].date, "05/04/2025");
        assert_eq!(blocks[1].date, "");

        let records = extract_layout_a(&sheet, &LayoutAConfig::default());
        let got: Vec<(&str, &str)> = records.iter().map(|r| (r.id.as_str(), r.description.as_str())).collect();
        assert_eq!(got, vec![("1", "Salário"), ("2", "Salário"), ("1", "INSS"), ("2", "INSS")]);
    }

    #[test]
    fn equal_totals_keep_discovery_order() {
        let sheet = RawSheet::new(
            "Folha",
            vec![
                row(&[n(1.0), t("Filial 1"), e(), e()]),
                row(&[e(), t("Descrição"), e(), e()]),
                row(&[e(), e(), e(), e()]),
                row(&[n(1.0), t("B"), e(), n(10.0)]),
                row(&[n(2.0), t("A"), e(), n(10.0)]),
                row(&[n(3.0), t("C"), e(), n(20.0)]),
            ],
        );
        let records = extract_layout_a(&sheet, &LayoutAConfig::default());
        let order: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }
}
