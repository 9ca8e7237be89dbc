//! Training data loading.
//!
//! The training set is a CSV file with a header row and the columns
//! `age,sex,bmi,children,smoker,region,charges`. Categorical cells are parsed
//! with the same rules the schema validator applies to caller input, so a
//! category that cannot be served can never be fitted either.
//!
//! # Example
//!
//! ```no_run
//! use insurance_charges::dataset;
//!
//! let records = dataset::load_csv("data/insurance.csv").unwrap();
//! assert!(!records.is_empty());
//! ```

mod record;

pub use record::{Field, RawRecord, Record, Region, Sex, Smoker};

use crate::preprocessing::error::ValidationError;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Error raised while reading a training CSV.
#[derive(Debug)]
pub enum DatasetError {
    /// The file could not be opened or read.
    Io(io::Error),
    /// The CSV structure or a numeric cell could not be parsed.
    Csv(csv::Error),
    /// A row parsed but carried an invalid categorical value or no charges.
    InvalidRow { line: u64, source: ValidationError },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "I/O error: {}", err),
            DatasetError::Csv(err) => write!(f, "CSV error: {}", err),
            DatasetError::InvalidRow { line, source } => {
                write!(f, "Invalid row at line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> Self {
        DatasetError::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    age: i64,
    sex: String,
    bmi: f64,
    children: i64,
    smoker: String,
    region: String,
    charges: Option<f64>,
}

impl CsvRow {
    fn into_record(self) -> Result<Record, ValidationError> {
        let charges = self
            .charges
            .ok_or_else(|| ValidationError::missing(Field::Charges))?;
        Ok(Record {
            age: self.age,
            sex: self.sex.trim().parse()?,
            bmi: self.bmi,
            children: self.children,
            smoker: self.smoker.trim().parse()?,
            region: self.region.trim().parse()?,
            charges: Some(charges),
        })
    }
}

/// Load training records from a CSV file on disk.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, DatasetError> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

/// Load training records from any CSV source.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Record>, DatasetError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();

    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: CsvRow = raw.deserialize(Some(&headers))?;
        let record = row
            .into_record()
            .map_err(|source| DatasetError::InvalidRow { line, source })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/insurance_sample.csv"
    ));

    #[test]
    fn test_load_fixture() {
        let records = from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 20);

        let first = &records[0];
        assert_eq!(first.age, 18);
        assert_eq!(first.sex, Sex::Male);
        assert_eq!(first.region, Region::Northwest);
        assert_eq!(first.charges, Some(1725.55));
        assert!(records.iter().all(|r| r.charges.is_some()));
    }

    #[test]
    fn test_invalid_category_reports_line() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n\
                   30,male,25.0,0,no,northeast,100.0\n\
                   31,other,25.0,0,no,northeast,100.0\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidRow { line, source } => {
                assert_eq!(line, 3);
                assert_eq!(source.field, Field::Sex);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_charges_reports_line() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n\
                   30,male,25.0,0,no,northeast,100.0\n\
                   31,female,25.0,0,no,northeast,\n";
        match from_reader(csv.as_bytes()).unwrap_err() {
            DatasetError::InvalidRow { line, source } => {
                assert_eq!(line, 3);
                assert_eq!(source.field, Field::Charges);
                assert_eq!(source.to_string(), "Field 'charges' is missing");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "age,sex,bmi,children,smoker,region,charges\n\
                   thirty,male,25.0,0,no,northeast,100.0\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
