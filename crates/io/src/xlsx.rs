// Spreadsheet import (xlsx, xlsm, xlsb, xls, ods) into a RawSheet.
//
// One-way conversion, values only. Cells keep their physical position: the
// grid always starts at A1 even when the sheet's used range starts lower.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use folha_recon::{Cell, RawSheet};

use crate::error::IoError;

/// Read one worksheet as an untyped grid.
///
/// `sheet` selects a worksheet by name; `None` takes the first one.
pub fn read_raw_sheet(path: &Path, sheet: Option<&str>) -> Result<RawSheet, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| IoError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: name.to_string(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IoError::NoSheets { path: path.to_path_buf() })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Read(format!("sheet '{}': {}", sheet_name, e)))?;

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (height, width) = range.get_size();

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(start_row as usize + height);
    rows.resize_with(start_row as usize, Vec::new);

    for row in range.rows() {
        let mut cells: Vec<Cell> = Vec::with_capacity(start_col as usize + width);
        cells.resize(start_col as usize, Cell::Empty);
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }

    log::debug!(
        "{}: sheet '{}' read, {}x{} used range at ({}, {})",
        path.display(),
        sheet_name,
        height,
        width,
        start_row,
        start_col
    );

    Ok(RawSheet::new(sheet_name, rows))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            // Out of chrono's range; keep the serial
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("cell error {:?} read as empty", e);
            Cell::Empty
        }
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
