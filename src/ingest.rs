//! Converts the lab reporting tool's pivot-grid JSON export into the flat
//! record format the local data file uses.
//!
//! Grid layout: row 1 carries pathogen names at odd cell indices, each
//! followed by that pathogen's positive column; data rows start at index 3
//! and run `[year, negative, positive, negative, positive, ...]`; the last
//! two rows are a blank spacer and the grand total.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::types::Record;

const HEADER_ROW: usize = 1;
const FIRST_DATA_ROW: usize = 3;
const FOOTER_ROWS: usize = 2;

pub fn parse_raw_export(contents: &str) -> Result<Vec<Record>> {
    let rows: Vec<Vec<Value>> =
        serde_json::from_str(contents).context("raw export is not a JSON grid")?;
    if rows.len() < FIRST_DATA_ROW + FOOTER_ROWS {
        bail!("raw export has only {} rows", rows.len());
    }

    let pathogens = header_pathogens(&rows[HEADER_ROW]);
    if pathogens.is_empty() {
        bail!("raw export header names no pathogens");
    }

    let mut records = Vec::new();
    for row in &rows[FIRST_DATA_ROW..rows.len() - FOOTER_ROWS] {
        let year = match row.first().and_then(cell_year) {
            Some(year) => year,
            None => continue,
        };

        for &(column, pathogen) in &pathogens {
            let negative = row.get(column).map_or(0, cell_count);
            let positive = row.get(column + 1).map_or(0, cell_count);
            if positive > 0 || negative > 0 {
                records.push(Record {
                    year,
                    pathogen: pathogen.to_string(),
                    positive,
                    negative,
                    unknown: Some(0),
                });
            }
        }
    }

    Ok(records)
}

/// Pathogen names with the column index of their negative-count cell.
/// Blank and "(blank)" header cells are skipped.
fn header_pathogens(header: &[Value]) -> Vec<(usize, &str)> {
    header
        .iter()
        .enumerate()
        .skip(1)
        .step_by(2)
        .filter_map(|(column, cell)| {
            let name = cell.as_str()?.trim();
            if name.is_empty() || name == "(blank)" {
                None
            } else {
                Some((column, name))
            }
        })
        .collect()
}

fn cell_year(cell: &Value) -> Option<i32> {
    match cell {
        Value::Number(number) => {
            let value = number.as_f64()?;
            (value.fract() == 0.0).then_some(value as i32)
        }
        Value::String(text) if text != "(blank)" => text.trim().parse().ok(),
        _ => None,
    }
}

fn cell_count(cell: &Value) -> u32 {
    match cell.as_f64() {
        Some(value) if value >= 0.0 => value as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export() -> String {
        serde_json::json!([
            ["", "Count of result", null, null, null, null],
            ["", "Brucella", null, "EBV", null, "(blank)"],
            ["Year", "negative", "positive", "negative", "positive", ""],
            [2020, 12, 5, 31, null, null],
            [2021, 9, 7, null, 4, null],
            ["(blank)", null, null, null, null, null],
            [null, null, null, null, null, null],
            ["Grand Total", 21, 12, 31, 4, null]
        ])
        .to_string()
    }

    #[test]
    fn converts_the_grid_into_flat_records() {
        let records = parse_raw_export(&export()).unwrap();
        assert_eq!(
            records,
            vec![
                Record {
                    year: 2020,
                    pathogen: "Brucella".to_string(),
                    positive: 5,
                    negative: 12,
                    unknown: Some(0),
                },
                Record {
                    year: 2020,
                    pathogen: "EBV".to_string(),
                    positive: 0,
                    negative: 31,
                    unknown: Some(0),
                },
                Record {
                    year: 2021,
                    pathogen: "Brucella".to_string(),
                    positive: 7,
                    negative: 9,
                    unknown: Some(0),
                },
                Record {
                    year: 2021,
                    pathogen: "EBV".to_string(),
                    positive: 4,
                    negative: 0,
                    unknown: Some(0),
                },
            ]
        );
    }

    #[test]
    fn blank_year_rows_are_skipped() {
        let records = parse_raw_export(&export()).unwrap();
        assert!(records.iter().all(|r| r.year == 2020 || r.year == 2021));
    }

    #[test]
    fn blank_header_cells_name_no_pathogen() {
        let records = parse_raw_export(&export()).unwrap();
        assert!(records.iter().all(|r| r.pathogen != "(blank)"));
    }

    #[test]
    fn all_zero_pairs_are_dropped() {
        let grid = serde_json::json!([
            [],
            ["", "Brucella"],
            [],
            [2020, 0, 0],
            [],
            []
        ])
        .to_string();
        assert!(parse_raw_export(&grid).unwrap().is_empty());
    }

    #[test]
    fn non_grid_input_is_an_error() {
        assert!(parse_raw_export("{\"rows\": 3}").is_err());
        assert!(parse_raw_export("[[], []]").is_err());
    }

    #[test]
    fn fractional_years_are_skipped() {
        let grid = serde_json::json!([
            [],
            ["", "Brucella"],
            [],
            [2020.5, 3, 1],
            [],
            []
        ])
        .to_string();
        assert!(parse_raw_export(&grid).unwrap().is_empty());
    }
}
