//! Field normalization shared by both extractors.

use crate::cell::Cell;

/// Integer cast of a branch id cell. Missing or unusable values become `""`.
pub fn normalize_id(cell: &Cell) -> String {
    if cell.is_missing() {
        return String::new();
    }

    let value = match cell {
        Cell::Number(n) => Some(n.trunc()),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(|n| n as f64)
                .or_else(|| s.parse::<f64>().ok().map(f64::trunc))
        }
        _ => None,
    };

    match value {
        Some(n) if n.is_finite() && n >= 0.0 && n < 1e15 => format!("{}", n as i64),
        _ => {
            log::warn!("cannot use {cell:?} as a branch id; leaving id empty");
            String::new()
        }
    }
}

/// Native dates as `DD/MM/YYYY`, other scalars stringified, missing as `""`.
pub fn format_date(cell: &Cell) -> String {
    if cell.is_missing() {
        return String::new();
    }
    cell.to_display_string()
}

pub fn branch_label(id: &str) -> String {
    format!("Filial {id}")
}

/// Free-text description, verbatim.
pub fn description(cell: &Cell) -> String {
    if cell.is_missing() {
        return String::new();
    }
    cell.to_display_string()
}
