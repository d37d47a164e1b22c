//! Bulk import rows and result tallies.

use std::collections::HashMap;

use crate::model::import::ImportSummaryDto;

/// Errors beyond this count are dropped from the response.
pub const MAX_REPORTED_ERRORS: usize = 20;

/// One data row of an import sheet keyed by lowercased header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    /// Sheet line number, the header being line 1.
    pub line: usize,
    pub values: HashMap<String, String>,
}

impl ImportRow {
    pub fn new(line: usize, values: HashMap<String, String>) -> Self {
        Self { line, values }
    }

    /// Trimmed cell value, `None` when the column is absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Running totals of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub imported_count: u32,
    pub updated_count: u32,
    pub enrolled_count: u32,
    pub skipped_count: u32,
    pub total_rows: u32,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows: total_rows as u32,
            ..Default::default()
        }
    }

    /// Records a row that was not imported.
    pub fn skip(&mut self, line: usize, reason: impl AsRef<str>) {
        self.skipped_count += 1;
        self.error(line, reason);
    }

    /// Records a problem that did not prevent the row from being imported.
    pub fn error(&mut self, line: usize, reason: impl AsRef<str>) {
        self.errors.push(format!("Row {}: {}", line, reason.as_ref()));
    }

    pub fn into_dto(self, message: impl Into<String>) -> ImportSummaryDto {
        let mut errors = self.errors;
        errors.truncate(MAX_REPORTED_ERRORS);

        ImportSummaryDto {
            message: message.into(),
            imported_count: self.imported_count,
            updated_count: self.updated_count,
            enrolled_count: self.enrolled_count,
            skipped_count: self.skipped_count,
            total_rows: self.total_rows,
            errors,
        }
    }
}
