//! Parser for `phenotype.hpoa`
//!
//! # Example
//!
//! ```text
//! #description: "HPO annotations for rare diseases"
//! #version: 2024-01-16
//! database_id  disease_name        qualifier  hpo_id      reference     evidence  onset  frequency  sex  modifier  aspect  biocuration
//! OMIM:619340  Developmental ...              HP:0011097  PMID:31675180 PCS              1/2                  P       HPO:probinson[2021-06-21]
//! OMIM:609153  Pseudohyperkalemia  NOT        HP:0001878  PMID:2766660  PCS                                   P       HPO:lccarmody[2018-10-03]
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. The first remaining
//! line is the header; the columns may appear in any order.
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::annotations::{AnnotationRow, RawRow, RowError, COLUMNS};
use crate::{HpoaError, HpoaResult};

/// A row that was dropped because it failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number within the source text
    pub line: usize,
    pub error: RowError,
}

/// The result of parsing one dataset: all valid rows and all dropped rows
#[derive(Debug, Default)]
pub struct ParsedDataset {
    rows: Vec<AnnotationRow>,
    columns: Vec<[String; 12]>,
    skipped: Vec<SkippedRow>,
}

impl ParsedDataset {
    /// The valid rows, in file order
    pub fn rows(&self) -> &[AnnotationRow] {
        &self.rows
    }

    /// The trimmed source text of every valid row, in the order of [`COLUMNS`]
    pub fn columns(&self) -> &[[String; 12]] {
        &self.columns
    }

    /// The rows that failed validation
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Consumes the dataset and returns the valid rows
    pub fn into_rows(self) -> Vec<AnnotationRow> {
        self.rows
    }
}

/// Position of every column of [`COLUMNS`] within a line
struct Header {
    positions: [usize; 12],
    width: usize,
}

impl Header {
    fn parse(line: &str, line_number: usize) -> HpoaResult<Self> {
        let names: Vec<&str> = line.split('\t').map(str::trim).collect();
        let mut positions = [0usize; 12];
        for (position, column) in positions.iter_mut().zip(COLUMNS) {
            *position = names.iter().position(|name| *name == column).ok_or_else(|| {
                HpoaError::ParseError(format!(
                    "line {line_number}: header is missing column `{column}`"
                ))
            })?;
        }
        Ok(Header {
            positions,
            width: names.len(),
        })
    }

    /// Splits a data line into the columns of [`COLUMNS`]
    fn split<'a>(&self, line: &'a str, line_number: usize) -> HpoaResult<RawRow<'a>> {
        let fields: Vec<&'a str> = line.split('\t').collect();
        if fields.len() != self.width {
            return Err(HpoaError::ParseError(format!(
                "line {line_number}: expected {} fields, found {}",
                self.width,
                fields.len()
            )));
        }
        Ok(self.positions.map(|idx| fields[idx]))
    }
}

/// Parses the content of `phenotype.hpoa`
///
/// Invalid rows are dropped and reported in [`ParsedDataset::skipped`].
///
/// # Errors
///
/// - [`HpoaError::ParseError`]: the header is missing or incomplete, or a line
///   has a different number of fields than the header
///
/// # Examples
///
/// ```
/// use hpoa::parser::phenotype_hpoa;
///
/// let text = "#version: 2024-01-16\n\
///     database_id\tdisease_name\tqualifier\thpo_id\treference\tevidence\tonset\tfrequency\tsex\tmodifier\taspect\tbiocuration\n\
///     OMIM:123456\tFoo syndrome\t\tHP:0000001\tPMID:111\tPCS\t\t\t\t\tP\tHPO:probinson[2021-06-21]\n";
///
/// let dataset = phenotype_hpoa::parse_str(text).unwrap();
/// assert_eq!(dataset.rows().len(), 1);
/// assert!(dataset.skipped().is_empty());
/// ```
pub fn parse_str(text: &str) -> HpoaResult<ParsedDataset> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

    let Some((header_line, header)) = lines.next() else {
        return Err(HpoaError::ParseError("missing header".to_string()));
    };
    let header = Header::parse(header, header_line)?;

    let mut dataset = ParsedDataset::default();
    for (line_number, line) in lines {
        let cols = header.split(line, line_number)?;
        match AnnotationRow::from_columns(&cols) {
            Ok(row) => {
                dataset.rows.push(row);
                dataset.columns.push(cols.map(|col| col.trim().to_string()));
            }
            Err(error) => {
                warn!("Skipping line {}: {}", line_number, error);
                dataset.skipped.push(SkippedRow {
                    line: line_number,
                    error,
                });
            }
        }
    }
    debug!(
        "Parsed {} annotations, skipped {}",
        dataset.rows.len(),
        dataset.skipped.len()
    );
    Ok(dataset)
}

/// Reads and parses a `phenotype.hpoa` file
///
/// # Errors
///
/// - [`HpoaError::CannotOpenFile`]: Source file not present or can't be opened
/// - [`HpoaError::ParseError`]: see [`parse_str`]
pub fn parse_file<P: AsRef<Path>>(file: P) -> HpoaResult<ParsedDataset> {
    let filename = file.as_ref().display().to_string();
    let text = fs::read_to_string(file).map_err(|_| HpoaError::CannotOpenFile(filename))?;
    parse_str(&text)
}

#[cfg(test)]
mod test_hpoa_parsing {
    use super::*;

    const HEADER: &str = "database_id\tdisease_name\tqualifier\thpo_id\treference\tevidence\tonset\tfrequency\tsex\tmodifier\taspect\tbiocuration";

    fn dataset(lines: &[&str]) -> String {
        let mut text = String::from("#description: test\n");
        text.push_str(HEADER);
        text.push('\n');
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn skip_comments_and_blank_lines() {
        let text = dataset(&[
            "",
            "#OMIM:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "OMIM:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "   ",
        ]);
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.rows().len(), 1);
        assert_eq!(parsed.rows()[0].disease_name(), "Gonadal agenesis");
    }

    #[test]
    fn keeps_not_and_non_omim_rows() {
        let text = dataset(&[
            "OMIM:600171\tGonadal agenesis\tNOT\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "ORPHA:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "DECIPHER:1\tWolf-Hirschhorn Syndrome\t\tHP:0000055\tDECIPHER:1\tIEA\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
        ]);
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.rows().len(), 3);
        assert!(parsed.rows()[0].is_negated());
        assert_eq!(parsed.rows()[1].database_id().prefix(), "ORPHA");
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let text = dataset(&[
            "OMIM:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "OMIM:600171\tGonadal agenesis\t\tH55\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
            "OMIM:600172\tOther\t\tHP:0000055\tOMIM:600172\tXXX\t\t\t\t\tP\tHPO:skoehler[2014-11-27]",
        ]);
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.rows().len(), 1);
        assert_eq!(parsed.skipped().len(), 2);
        assert_eq!(parsed.skipped()[0].line, 4);
        assert_eq!(
            parsed.skipped()[0].error,
            RowError::InvalidId("hpo_id", "H55".to_string())
        );
    }

    #[test]
    fn source_text_is_kept() {
        let text = dataset(&[
            "omim:600171\tGonadal agenesis \t\thp:0000055\tOMIM:600171\tTAS\t\t17.0%\t\t\tP\tHPO:skoehler[2014-11-27]",
            "OMIM:600171\tGonadal agenesis\t\tH55\tOMIM:600171\tTAS\t\t01/02\t\t\tP\tHPO:skoehler[2014-11-27]",
        ]);
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.columns().len(), parsed.rows().len());
        let columns = &parsed.columns()[0];
        assert_eq!(columns[0], "omim:600171");
        assert_eq!(columns[1], "Gonadal agenesis");
        assert_eq!(columns[3], "hp:0000055");
        assert_eq!(columns[7], "17.0%");
        assert_eq!(parsed.rows()[0].database_id(), &"OMIM:600171");
    }

    #[test]
    fn header_columns_in_any_order() {
        let text = "biocuration\taspect\tmodifier\tsex\tfrequency\tonset\tevidence\treference\thpo_id\tqualifier\tdisease_name\tdatabase_id\n\
            HPO:skoehler[2014-11-27]\tP\t\t\t\t\tTAS\tOMIM:600171\tHP:0000055\t\tGonadal agenesis\tOMIM:600171\n";
        let parsed = parse_str(text).unwrap();
        assert_eq!(parsed.rows().len(), 1);
        assert_eq!(parsed.rows()[0].database_id(), &"OMIM:600171");
    }

    #[test]
    fn missing_header() {
        assert!(matches!(parse_str(""), Err(HpoaError::ParseError(_))));
        assert!(matches!(
            parse_str("#only\n#comments\n"),
            Err(HpoaError::ParseError(_))
        ));
    }

    #[test]
    fn incomplete_header() {
        let text = "database_id\tdisease_name\thpo_id\n";
        assert!(matches!(parse_str(text), Err(HpoaError::ParseError(_))));
    }

    #[test]
    fn wrong_number_of_fields_is_fatal() {
        let text = dataset(&["OMIM:600171 Gonadal agenesis  HP:0000055 OMIM:600171 TAS P HPO:skoehler[2014-11-27]"]);
        assert!(matches!(parse_str(&text), Err(HpoaError::ParseError(_))));
    }

    #[test]
    fn windows_line_endings() {
        let text = dataset(&["OMIM:600171\tGonadal agenesis\t\tHP:0000055\tOMIM:600171\tTAS\t\t\t\t\tP\tHPO:skoehler[2014-11-27]"])
            .replace('\n', "\r\n");
        let parsed = parse_str(&text).unwrap();
        assert_eq!(parsed.rows().len(), 1);
    }

    #[test]
    fn fixture_file() {
        let parsed = parse_file("tests/phenotype.hpoa").unwrap();
        assert_eq!(parsed.rows().len(), 9);
        assert_eq!(parsed.skipped().len(), 1);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            parse_file("tests/does-not-exist.hpoa"),
            Err(HpoaError::CannotOpenFile(_))
        ));
    }
}
