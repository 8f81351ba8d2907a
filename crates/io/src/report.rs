// Comparison report export (xlsx only).
//
// Presentation snapshot: one sheet holding the comparison rows as an Excel
// table. Money columns are written as numbers with a currency format so the
// autofilter and totals keep working in Excel.

use std::path::Path;

use folha_recon::config::{ReportConfig, TableStyleName, REPORT_COLUMNS};
use folha_recon::ComparisonRow;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, Table, TableColumn, TableStyle, Workbook, Worksheet};

use crate::error::IoError;

/// Column kinds, in output order: id, branch, description, totals, difference, date.
const MONEY_COLUMNS: [bool; REPORT_COLUMNS] = [false, false, false, true, true, true, false];

/// Write the report to `path`.
pub fn write_report(path: &Path, rows: &[ComparisonRow], config: &ReportConfig) -> Result<(), IoError> {
    let mut workbook = build_workbook(rows, config)?;
    workbook
        .save(path)
        .map_err(|e| IoError::Write(format!("cannot save {}: {}", path.display(), e)))?;
    log::info!("{}: {} comparison row(s) written", path.display(), rows.len());
    Ok(())
}

/// Render the report into an in-memory xlsx file.
pub fn render_report(rows: &[ComparisonRow], config: &ReportConfig) -> Result<Vec<u8>, IoError> {
    let mut workbook = build_workbook(rows, config)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(rows: &[ComparisonRow], config: &ReportConfig) -> Result<Workbook, IoError> {
    if config.headers.len() != REPORT_COLUMNS {
        return Err(IoError::Write(format!(
            "expected {REPORT_COLUMNS} header labels, found {}",
            config.headers.len()
        )));
    }

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);
    let text_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);
    let currency_format = Format::new()
        .set_num_format(&config.currency_format)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;

    for (col, (width, is_money)) in config.column_widths.iter().zip(MONEY_COLUMNS).enumerate() {
        let format = if is_money { &currency_format } else { &text_format };
        worksheet.set_column_width(col as u16, *width)?;
        worksheet.set_column_format(col as u16, format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        // Row 0 is the table header
        let r = (i + 1) as u32;
        worksheet.write_string_with_format(r, 0, &row.id, &text_format)?;
        worksheet.write_string_with_format(r, 1, &row.branch, &text_format)?;
        worksheet.write_string_with_format(r, 2, &row.description, &text_format)?;
        write_money(worksheet, r, 3, row.total_a, &currency_format)?;
        write_money(worksheet, r, 4, row.total_b, &currency_format)?;
        write_money(worksheet, r, 5, row.difference, &currency_format)?;
        worksheet.write_string_with_format(r, 6, &row.date, &text_format)?;
    }

    let columns: Vec<TableColumn> = config
        .headers
        .iter()
        .map(|h| TableColumn::new().set_header(h).set_header_format(&header_format))
        .collect();
    let table = Table::new()
        .set_columns(&columns)
        .set_style(table_style(config.table_style))
        .set_header_row(true)
        .set_autofilter(true);

    // A table needs at least one data row; an empty result gets a blank one.
    let last_row = rows.len().max(1) as u32;
    worksheet.add_table(0, 0, last_row, (REPORT_COLUMNS - 1) as u16, &table)?;

    Ok(workbook)
}

fn write_money(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Decimal,
    format: &Format,
) -> Result<(), IoError> {
    let number = value
        .to_f64()
        .ok_or_else(|| IoError::Write(format!("amount {value} does not fit a spreadsheet number")))?;
    worksheet.write_number_with_format(row, col, number, format)?;
    Ok(())
}

fn table_style(name: TableStyleName) -> TableStyle {
    match name {
        TableStyleName::None => TableStyle::None,
        TableStyleName::Light1 => TableStyle::Light1,
        TableStyleName::Light9 => TableStyle::Light9,
        TableStyleName::Medium1 => TableStyle::Medium1,
        TableStyleName::Medium2 => TableStyle::Medium2,
        TableStyleName::Medium9 => TableStyle::Medium9,
    }
}
