//! Spreadsheet adapters: reading the participant upload and writing the
//! report workbook.

pub mod excel_read;
pub mod excel_write;
