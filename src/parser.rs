use csv::Reader;
use std::collections::HashMap;
use std::io::Read;

use thiserror::Error;

/// Header of the column holding course codes in an uploaded timetable CSV.
pub const COURSE_CODE_COLUMN: &str = "COURSE CODE";
/// Header of the column holding offered slot labels.
pub const SLOT_COLUMN: &str = "SLOT";

/// Why an uploaded timetable document could not be turned into a catalog.
/// Surfaced to the user; the previously loaded catalog stays in place.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("no course rows found")]
    Empty,
}

/// Parses an uploaded timetable CSV into course code -> offered slot labels,
/// keeping the slots of each course in file order. The two required columns
/// are located by header scan so their position does not matter; rows with a
/// blank code or slot are skipped.
pub fn parse_catalog<R: Read>(input: R) -> Result<HashMap<String, Vec<String>>, ParseError> {
    let mut reader = Reader::from_reader(input);

    let headers = reader.headers()?;
    let course_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(COURSE_CODE_COLUMN))
        .ok_or(ParseError::MissingColumn(COURSE_CODE_COLUMN))?;
    let slot_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(SLOT_COLUMN))
        .ok_or(ParseError::MissingColumn(SLOT_COLUMN))?;

    let mut catalog: HashMap<String, Vec<String>> = HashMap::new();
    for result in reader.records() {
        let record = result?;
        let course = record.get(course_col).unwrap_or("").trim();
        let slot = record.get(slot_col).unwrap_or("").trim();
        if course.is_empty() || slot.is_empty() {
            continue;
        }
        catalog
            .entry(course.to_string())
            .or_default()
            .push(slot.to_string());
    }

    if catalog.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_slots_per_course_in_file_order() {
        let csv = "COURSE CODE,SLOT\nCSE101,A1\nCSE102,TF1+L1\nCSE101,B1\n";
        let catalog = parse_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog["CSE101"], vec!["A1", "B1"]);
        assert_eq!(catalog["CSE102"], vec!["TF1+L1"]);
    }

    #[test]
    fn columns_are_found_by_header_scan() {
        let csv = "SL NO,SLOT,COURSE CODE\n1,A1,CSE101\n2,C1,CSE102\n";
        let catalog = parse_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog["CSE101"], vec!["A1"]);
        assert_eq!(catalog["CSE102"], vec!["C1"]);
    }

    #[test]
    fn blank_cells_are_skipped() {
        let csv = "COURSE CODE,SLOT\nCSE101,A1\n,B1\nCSE102,\nCSE102,C1\n";
        let catalog = parse_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["CSE102"], vec!["C1"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "CODE,SLOT\nCSE101,A1\n";
        let err = parse_catalog(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(c) if c == COURSE_CODE_COLUMN));
    }

    #[test]
    fn header_only_input_is_empty() {
        let csv = "COURSE CODE,SLOT\n";
        assert!(matches!(
            parse_catalog(csv.as_bytes()).unwrap_err(),
            ParseError::Empty
        ));
    }
}
