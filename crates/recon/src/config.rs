use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub layout_a: LayoutAConfig,
    pub layout_b: LayoutBConfig,
    pub report: ReportConfig,
}

impl ReconConfig {
    pub fn from_toml(s: &str) -> Result<Self, ReconError> {
        let config: Self = toml::from_str(s).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let a = &self.layout_a;
        if a.marker_prefix.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "layout_a.marker_prefix must not be empty".into(),
            ));
        }
        if a.header_label.is_empty() {
            return Err(ReconError::ConfigValidation(
                "layout_a.header_label must not be empty".into(),
            ));
        }
        if a.description_column == a.id_column {
            return Err(ReconError::ConfigValidation(
                "layout_a.description_column and layout_a.id_column must differ".into(),
            ));
        }

        for (field, needle) in self.layout_b.needles.fields() {
            if needle.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "layout_b.needles.{field} must not be empty"
                )));
            }
        }

        let r = &self.report;
        if r.sheet_name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("report.sheet_name must not be empty".into()));
        }
        if r.headers.len() != REPORT_COLUMNS {
            return Err(ReconError::ConfigValidation(format!(
                "report.headers must have {REPORT_COLUMNS} labels, found {}",
                r.headers.len()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Layout A (block-structured)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutAConfig {
    /// Case-insensitive prefix that marks a branch row (column `description_column`).
    pub marker_prefix: String,
    /// Exact label of the per-block column-header row.
    pub header_label: String,
    pub id_column: usize,
    pub description_column: usize,
    pub amount_column: usize,
    pub date_column: usize,
    /// Rows between the marker and the block's date cell.
    pub date_row_offset: usize,
    /// Rows between the header row and the first detail row.
    pub detail_row_offset: usize,
}

impl Default for LayoutAConfig {
    fn default() -> Self {
        Self {
            marker_prefix: "filial".into(),
            header_label: "Descrição".into(),
            id_column: 0,
            description_column: 1,
            amount_column: 3,
            date_column: 3,
            date_row_offset: 2,
            detail_row_offset: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout B (tabular)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutBConfig {
    /// 0-based physical row holding the column headers.
    pub header_row: usize,
    pub needles: ColumnNeedles,
}

impl Default for LayoutBConfig {
    fn default() -> Self {
        Self {
            header_row: 1,
            needles: ColumnNeedles::default(),
        }
    }
}

/// Case-insensitive substrings used to discover each semantic column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNeedles {
    pub id: String,
    pub description: String,
    pub date: String,
    pub amount: String,
}

impl ColumnNeedles {
    /// In discovery priority order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("id", &self.id),
            ("description", &self.description),
            ("date", &self.date),
            ("amount", &self.amount),
        ]
    }
}

impl Default for ColumnNeedles {
    fn default() -> Self {
        Self {
            id: "filial".into(),
            description: "hist".into(),
            date: "data".into(),
            amount: "valor".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

pub const REPORT_COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub sheet_name: String,
    pub currency_format: String,
    pub table_style: TableStyleName,
    /// Labels for id, branch, description, total A, total B, difference, date.
    pub headers: Vec<String>,
    pub column_widths: [f64; REPORT_COLUMNS],
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Comparativo".into(),
            currency_format: "R$ #,##0.00".into(),
            table_style: TableStyleName::Medium1,
            headers: [
                "ID",
                "Filial",
                "Descrição",
                "Total Sis 1",
                "Total Sis 2",
                "Diferença",
                "Data",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            column_widths: [8.0, 15.0, 30.0, 15.0, 15.0, 15.0, 12.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStyleName {
    None,
    Light1,
    Light9,
    #[default]
    Medium1,
    Medium2,
    Medium9,
}

impl std::fmt::Display for TableStyleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Light1 => write!(f, "light1"),
            Self::Light9 => write!(f, "light9"),
            Self::Medium1 => write!(f, "medium1"),
            Self::Medium2 => write!(f, "medium2"),
            Self::Medium9 => write!(f, "medium9"),
        }
    }
}
