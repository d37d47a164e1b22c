//! Reads the first sheet of an uploaded workbook into header keyed rows.

use std::{collections::HashMap, io::Cursor};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::server::{error::import::ImportError, model::import::ImportRow};

/// Whether the upload name carries a spreadsheet extension we can read.
pub fn is_excel_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Parses workbook bytes and checks the header for the required columns.
///
/// # Arguments
/// - `bytes` - Raw `.xlsx` / `.xls` file content
/// - `required` - Lowercase column names that must appear in the header row
///
/// # Returns
/// - `Ok(Vec<ImportRow>)` - Data rows, blank rows removed
/// - `Err(ImportError)` - Unreadable workbook, empty sheet or missing columns
pub fn read_rows(bytes: Vec<u8>, required: &[&str]) -> Result<Vec<ImportRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::EmptySheet)??;

    rows_from_range(&range, required)
}

/// Converts a sheet range into rows keyed by the normalized header.
///
/// The header is the first used row of the sheet, which need not be sheet line 1. Row
/// line numbers are the 1-based sheet lines the user sees.
pub fn rows_from_range(
    range: &Range<Data>,
    required: &[&str],
) -> Result<Vec<ImportRow>, ImportError> {
    let first_data_line = range.start().map_or(0, |(row, _)| row as usize) + 2;
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Err(ImportError::EmptySheet);
    };

    let columns: Vec<String> = header
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_lowercase())
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !columns.iter().any(|c| c == *name))
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let parsed = rows
        .enumerate()
        .filter_map(|(index, cells)| {
            let values: HashMap<String, String> = columns
                .iter()
                .zip(cells.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), cell_to_string(cell).trim().to_string()))
                .filter(|(_, value)| !value.is_empty())
                .collect();

            if values.is_empty() {
                return None;
            }

            Some(ImportRow::new(first_data_line + index, values))
        })
        .collect();

    Ok(parsed)
}

/// Renders a cell as text. Whole floats lose the trailing `.0` so numeric student IDs
/// read the way they were typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        sheet_at(0, cells)
    }

    /// Builds a range whose first used row is the 0-based sheet row `top`.
    fn sheet_at(top: u32, cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((top, 0), (top + height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((top + r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn reads_rows_with_sheet_line_numbers() {
        let range = sheet(&[
            &[s("Student_ID"), s("full_name"), s("email")],
            &[Data::Float(21012345.0), s("Chan Tai Man"), s("chan@connect.polyu.hk")],
            &[Data::Empty, Data::Empty, Data::Empty],
            &[s("21099999"), s(" Lee Siu Ming "), Data::Empty],
        ]);

        let rows = rows_from_range(&range, &["student_id", "full_name", "email"]).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("student_id"), Some("21012345"));
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].get("full_name"), Some("Lee Siu Ming"));
        assert_eq!(rows[1].get("email"), None);
    }

    #[test]
    fn line_numbers_follow_header_below_blank_rows() {
        let range = sheet_at(
            2,
            &[
                &[s("student_id"), s("full_name")],
                &[s("21012345"), s("Chan Tai Man")],
                &[s("21099999"), s("Lee Siu Ming")],
            ],
        );

        let rows = rows_from_range(&range, &["student_id", "full_name"]).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 4);
        assert_eq!(rows[1].line, 5);
    }

    #[test]
    fn reports_missing_columns() {
        let range = sheet(&[&[s("username"), s("email")]]);

        let err = rows_from_range(&range, &["username", "full_name", "email", "role"]).unwrap_err();

        match err {
            ImportError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["full_name".to_string(), "role".to_string()])
            }
            other => panic!("Expected MissingColumns, got: {:?}", other),
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let range: Range<Data> = Range::empty();

        assert!(matches!(
            rows_from_range(&range, &["email"]),
            Err(ImportError::EmptySheet)
        ));
    }

    #[test]
    fn recognizes_excel_extensions() {
        assert!(is_excel_filename("Students.XLSX"));
        assert!(is_excel_filename("legacy.xls"));
        assert!(!is_excel_filename("students.csv"));
    }
}
