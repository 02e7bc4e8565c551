//! Summarizer for the fixed-layout history file.
//!
//! This is deliberately not a general CSV reader: the file is a single known
//! export and its row/column positions are the contract. Field positions
//! count from the end of each row, so leading columns (area code, name, type,
//! date) never shift the metrics. Malformed cells at the load-bearing
//! positions fail loudly with no partial result.

use std::ops::RangeInclusive;
use std::path::Path;

use thiserror::Error;

// Row 0 is the header. Rows 1 and 2 carry incomplete specimen-date counts, so
// the 7-day case window starts at row 3; the death series lags roughly two
// weeks, hence row 14 for the latest usable cumulative figure.
const HOSPITAL_ROW: usize = 1;
const CASE_WINDOW: RangeInclusive<usize> = 3..=9;
const DEATHS_ROW: usize = 14;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file has {rows} rows, need at least {min}")]
    TooShort { rows: usize, min: usize },

    #[error("row {row}: expected at least {expected} fields, found {found}")]
    MissingField {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: '{value}' is not an integer")]
    BadNumber { row: usize, value: String },
}

/// The three aggregates derived from the history file.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalSummary {
    pub seven_day_cases: i64,
    pub hospital_cases: i64,
    pub total_deaths: i64,
}

/// Reads the file into one string per row, header included.
pub fn parse_rows(path: &Path) -> Result<Vec<String>, HistoryError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Derives the display aggregates from parsed rows: the case count is the
/// last field of each window row, hospital occupancy the second-from-last
/// field of row 1, cumulative deaths the third-from-last field of row 14.
pub fn summarize(rows: &[String]) -> Result<HistoricalSummary, HistoryError> {
    if rows.len() <= DEATHS_ROW {
        return Err(HistoryError::TooShort {
            rows: rows.len(),
            min: DEATHS_ROW + 1,
        });
    }

    let mut seven_day_cases = 0;
    for row in CASE_WINDOW {
        seven_day_cases += field_from_end(rows, row, 1)?;
    }
    let hospital_cases = field_from_end(rows, HOSPITAL_ROW, 2)?;
    let total_deaths = field_from_end(rows, DEATHS_ROW, 3)?;

    Ok(HistoricalSummary {
        seven_day_cases,
        hospital_cases,
        total_deaths,
    })
}

pub fn load_summary(path: &Path) -> Result<HistoricalSummary, HistoryError> {
    summarize(&parse_rows(path)?)
}

fn field_from_end(rows: &[String], row: usize, offset: usize) -> Result<i64, HistoryError> {
    let fields: Vec<&str> = rows[row].split(',').collect();
    if fields.len() < offset {
        return Err(HistoryError::MissingField {
            row,
            expected: offset,
            found: fields.len(),
        });
    }
    let value = fields[fields.len() - offset];
    value.parse().map_err(|_| HistoryError::BadNumber {
        row,
        value: value.to_string(),
    })
}
