//! Schema validation of caller input against fitted bounds.
//!
//! Bounds are captured from the training set at fit time. A value outside
//! them is rejected here, before it can reach the bin encoder.

use crate::dataset::{Field, RawRecord, Record};
use crate::preprocessing::error::{PreprocessingError, ValidationError};
use serde::{Deserialize, Serialize};

/// Inclusive (min, max) ranges of the numeric input fields seen at fit time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputBounds {
    pub age: (i64, i64),
    pub bmi: (f64, f64),
    pub children: (i64, i64),
}

impl InputBounds {
    /// Capture bounds from training records.
    pub fn from_records(records: &[Record]) -> Result<Self, PreprocessingError> {
        let first = records.first().ok_or_else(|| {
            PreprocessingError::EmptyData("Cannot capture bounds from empty data".to_string())
        })?;

        let mut bounds = Self {
            age: (first.age, first.age),
            bmi: (first.bmi, first.bmi),
            children: (first.children, first.children),
        };

        for (row, record) in records.iter().enumerate() {
            if !record.bmi.is_finite() {
                return Err(PreprocessingError::NonFinite {
                    column: Field::Bmi.name().to_string(),
                    row,
                });
            }
            bounds.age = (bounds.age.0.min(record.age), bounds.age.1.max(record.age));
            bounds.bmi = (bounds.bmi.0.min(record.bmi), bounds.bmi.1.max(record.bmi));
            bounds.children = (
                bounds.children.0.min(record.children),
                bounds.children.1.max(record.children),
            );
        }

        Ok(bounds)
    }
}

/// Enforces the accepted field set and per-field domain bounds.
#[derive(Clone, Copy, Debug)]
pub struct SchemaValidator {
    bounds: InputBounds,
}

impl SchemaValidator {
    pub fn new(bounds: InputBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    /// Validate raw caller input and produce a typed record without target.
    ///
    /// Fields are checked in schema order and the first offending field is
    /// reported.
    pub fn validate(&self, raw: &RawRecord) -> Result<Record, ValidationError> {
        check_int(Field::Age, raw.age, self.bounds.age)?;
        let sex = raw.sex.parse()?;
        check_float(Field::Bmi, raw.bmi, self.bounds.bmi)?;
        check_int(Field::Children, raw.children, self.bounds.children)?;
        let smoker = raw.smoker.parse()?;
        let region = raw.region.parse()?;

        Ok(Record {
            age: raw.age,
            sex,
            bmi: raw.bmi,
            children: raw.children,
            smoker,
            region,
            charges: None,
        })
    }

    /// Check the numeric bounds of an already typed record.
    pub fn check(&self, record: &Record) -> Result<(), ValidationError> {
        check_int(Field::Age, record.age, self.bounds.age)?;
        check_float(Field::Bmi, record.bmi, self.bounds.bmi)?;
        check_int(Field::Children, record.children, self.bounds.children)
    }
}

fn check_int(field: Field, value: i64, (min, max): (i64, i64)) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(
            field,
            value as f64,
            (min as f64, max as f64),
        ));
    }
    Ok(())
}

fn check_float(field: Field, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    // NaN fails both comparisons, so test containment rather than exclusion.
    if !(value >= min && value <= max) {
        return Err(ValidationError::out_of_range(field, value, (min, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Region, Sex, Smoker};
    use crate::preprocessing::error::ValidationErrorKind;

    fn bounds() -> InputBounds {
        InputBounds {
            age: (18, 64),
            bmi: (15.0, 50.0),
            children: (0, 5),
        }
    }

    fn raw() -> RawRecord {
        RawRecord {
            age: 20,
            sex: "male".to_string(),
            bmi: 30.0,
            children: 0,
            smoker: "no".to_string(),
            region: "northwest".to_string(),
        }
    }

    #[test]
    fn test_valid_record() {
        let record = SchemaValidator::new(bounds()).validate(&raw()).unwrap();
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.smoker, Smoker::No);
        assert_eq!(record.region, Region::Northwest);
        assert_eq!(record.charges, None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let validator = SchemaValidator::new(bounds());
        for (age, bmi, children) in [(18, 15.0, 0), (64, 50.0, 5)] {
            let input = RawRecord {
                age,
                bmi,
                children,
                ..raw()
            };
            assert!(validator.validate(&input).is_ok());
        }
    }

    #[test]
    fn test_age_below_min_rejected() {
        let input = RawRecord { age: 17, ..raw() };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Age);
        assert!(matches!(err.kind, ValidationErrorKind::OutOfRange { .. }));
    }

    #[test]
    fn test_age_above_max_rejected() {
        let input = RawRecord { age: 65, ..raw() };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Age);
    }

    #[test]
    fn test_nan_bmi_rejected() {
        let input = RawRecord {
            bmi: f64::NAN,
            ..raw()
        };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Bmi);
    }

    #[test]
    fn test_children_out_of_range() {
        let input = RawRecord {
            children: 6,
            ..raw()
        };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Children);
    }

    #[test]
    fn test_invalid_enum_rejected() {
        let input = RawRecord {
            smoker: "sometimes".to_string(),
            ..raw()
        };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Smoker);
        assert!(matches!(err.kind, ValidationErrorKind::InvalidEnum { .. }));
    }

    #[test]
    fn test_first_offending_field_reported() {
        let input = RawRecord {
            age: 99,
            region: "atlantis".to_string(),
            ..raw()
        };
        let err = SchemaValidator::new(bounds()).validate(&input).unwrap_err();
        assert_eq!(err.field, Field::Age);
    }

    #[test]
    fn test_bounds_from_records() {
        let make = |age, bmi, children| Record {
            age,
            sex: Sex::Female,
            bmi,
            children,
            smoker: Smoker::No,
            region: Region::Southeast,
            charges: Some(1.0),
        };
        let records = vec![make(30, 22.0, 2), make(19, 41.5, 0), make(55, 18.2, 4)];
        let bounds = InputBounds::from_records(&records).unwrap();
        assert_eq!(bounds.age, (19, 55));
        assert_eq!(bounds.bmi, (18.2, 41.5));
        assert_eq!(bounds.children, (0, 4));
    }

    #[test]
    fn test_bounds_from_empty_records() {
        let result = InputBounds::from_records(&[]);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }
}
