use rust_xlsxwriter::{Format, Formula, Workbook};

use crate::error::Result;
use crate::report::{CellValue, ReportDocument};

/// Renders the report as `.xlsx` bytes. Nothing is returned when the writer
/// fails part-way.
pub fn workbook_bytes(document: &ReportDocument) -> Result<Vec<u8>> {
    let mut workbook = render(document)?;
    Ok(workbook.save_to_buffer()?)
}

fn render(document: &ReportDocument) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in &document.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_idx = row_idx as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_idx = col_idx as u16;
                match &cell.value {
                    CellValue::Empty => {}
                    CellValue::Text(value) if cell.bold => {
                        worksheet.write_string_with_format(row_idx, col_idx, value, &bold)?;
                    }
                    CellValue::Text(value) => {
                        worksheet.write_string(row_idx, col_idx, value)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number(row_idx, col_idx, *value)?;
                    }
                    CellValue::Computed(computed) => {
                        let formula = Formula::new(computed.formula());
                        worksheet.write_formula(row_idx, col_idx, formula)?;
                    }
                }
            }
        }

        worksheet.autofit();
    }

    Ok(workbook)
}
