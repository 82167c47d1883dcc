//! Format-neutral cell model of the report.
//!
//! Literal cells carry their value; computed cells describe a calculation
//! over other cells of the same row. Spreadsheet writers render computed
//! cells as live formulas, other targets can evaluate them instead.

use rust_xlsxwriter::utility::column_number_to_name;

/// Value held by a report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Computed(ComputedCell),
}

/// A single cell with its styling.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub bold: bool,
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            bold: false,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            bold: false,
        }
    }

    pub fn header(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            bold: true,
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            value: CellValue::Number(value),
            bold: false,
        }
    }

    pub fn computed(value: ComputedCell) -> Self {
        Self {
            value: CellValue::Computed(value),
            bold: false,
        }
    }
}

/// Calculations a cell can hold. Rows and columns are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedCell {
    /// Average of the numbers in `first_col..=last_col` on `row`, rounded to
    /// `decimals`; blank when the range holds no number.
    RoundedAverage {
        row: u32,
        first_col: u16,
        last_col: u16,
        decimals: u8,
    },
}

impl ComputedCell {
    /// Spreadsheet formula text, using A1 references.
    pub fn formula(&self) -> String {
        match *self {
            ComputedCell::RoundedAverage {
                row,
                first_col,
                last_col,
                decimals,
            } => {
                let range = format!(
                    "{}{}:{}{}",
                    column_number_to_name(first_col),
                    row + 1,
                    column_number_to_name(last_col),
                    row + 1
                );
                format!("=IF(COUNT({range})=0,\"\",ROUND(AVERAGE({range}),{decimals}))")
            }
        }
    }

    /// Computes the value the formula would produce against `sheet`.
    pub fn evaluate(&self, sheet: &ReportSheet) -> Option<f64> {
        match *self {
            ComputedCell::RoundedAverage {
                row,
                first_col,
                last_col,
                decimals,
            } => {
                let numbers: Vec<f64> = (first_col..=last_col)
                    .filter_map(|col| match sheet.cell(row, col).map(|c| &c.value) {
                        Some(CellValue::Number(value)) => Some(*value),
                        _ => None,
                    })
                    .collect();
                if numbers.is_empty() {
                    return None;
                }
                let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
                let factor = 10f64.powi(i32::from(decimals));
                Some((mean * factor).round() / factor)
            }
        }
    }
}

/// One sheet of the report. Row `n` of `rows` is spreadsheet row `n + 1`;
/// an empty row renders as a blank line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.rows
            .get(row as usize)
            .and_then(|cells| cells.get(usize::from(col)))
    }

    /// Renders every cell as text, evaluating computed cells.
    pub fn plain_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match &cell.value {
                        CellValue::Empty => String::new(),
                        CellValue::Text(value) => value.clone(),
                        CellValue::Number(value) => value.to_string(),
                        CellValue::Computed(computed) => computed
                            .evaluate(self)
                            .map(|value| value.to_string())
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Every sheet of the report, in output order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportDocument {
    pub sheets: Vec<ReportSheet>,
}

impl ReportDocument {
    pub fn sheet(&self, name: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}
