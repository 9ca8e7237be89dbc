//! Typed and raw forms of a single insurance observation.

use crate::preprocessing::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input fields of an observation, used to attribute validation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Sex,
    Bmi,
    Children,
    Smoker,
    Region,
    Charges,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Sex => "sex",
            Field::Bmi => "bmi",
            Field::Children => "children",
            Field::Smoker => "smoker",
            Field::Region => "region",
            Field::Charges => "charges",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const VARIANTS: &'static [&'static str] = &["male", "female"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(ValidationError::invalid_enum(Field::Sex, other, Self::VARIANTS)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

impl Smoker {
    pub const VARIANTS: &'static [&'static str] = &["yes", "no"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }
}

impl FromStr for Smoker {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Smoker::Yes),
            "no" => Ok(Smoker::No),
            other => Err(ValidationError::invalid_enum(
                Field::Smoker,
                other,
                Self::VARIANTS,
            )),
        }
    }
}

/// US region of the beneficiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
    ];

    pub const VARIANTS: &'static [&'static str] =
        &["northeast", "northwest", "southeast", "southwest"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Northwest => "northwest",
            Region::Southeast => "southeast",
            Region::Southwest => "southwest",
        }
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "northeast" => Ok(Region::Northeast),
            "northwest" => Ok(Region::Northwest),
            "southeast" => Ok(Region::Southeast),
            "southwest" => Ok(Region::Southwest),
            other => Err(ValidationError::invalid_enum(
                Field::Region,
                other,
                Self::VARIANTS,
            )),
        }
    }
}

/// One typed observation.
///
/// `charges` is the regression target. It is required when fitting and absent
/// when the record is built for inference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: i64,
    pub sex: Sex,
    pub bmi: f64,
    pub children: i64,
    pub smoker: Smoker,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<f64>,
}

impl Record {
    /// Returns a copy carrying the given target value.
    pub fn with_charges(mut self, charges: f64) -> Self {
        self.charges = Some(charges);
        self
    }

    /// Returns a copy with the target removed, as used for inference.
    pub fn without_target(&self) -> Self {
        Self {
            charges: None,
            ..self.clone()
        }
    }
}

/// An observation as received from a caller, before any validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: String,
    pub region: String,
}

impl From<&Record> for RawRecord {
    fn from(record: &Record) -> Self {
        Self {
            age: record.age,
            sex: record.sex.as_str().to_string(),
            bmi: record.bmi,
            children: record.children,
            smoker: record.smoker.as_str().to_string(),
            region: record.region.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::error::ValidationErrorKind;

    #[test]
    fn test_parse_enums() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("no".parse::<Smoker>().unwrap(), Smoker::No);
        assert_eq!("southeast".parse::<Region>().unwrap(), Region::Southeast);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "Male".parse::<Sex>().unwrap_err();
        assert_eq!(err.field, Field::Sex);
        assert!(matches!(err.kind, ValidationErrorKind::InvalidEnum { .. }));
    }

    #[test]
    fn test_invalid_region_names_field() {
        let err = "central".parse::<Region>().unwrap_err();
        assert_eq!(err.field, Field::Region);
        assert!(err.to_string().contains("central"));
    }

    #[test]
    fn test_region_names_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_record_serde_lowercase() {
        let record = Record {
            age: 30,
            sex: Sex::Female,
            bmi: 22.5,
            children: 1,
            smoker: Smoker::Yes,
            region: Region::Northwest,
            charges: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sex"], "female");
        assert_eq!(json["region"], "northwest");
        assert!(json.get("charges").is_none());
    }

    #[test]
    fn test_without_target() {
        let record = Record {
            age: 30,
            sex: Sex::Male,
            bmi: 22.5,
            children: 0,
            smoker: Smoker::No,
            region: Region::Southwest,
            charges: Some(1200.0),
        };
        assert_eq!(record.without_target().charges, None);
        assert_eq!(record.without_target().with_charges(5.0).charges, Some(5.0));
    }
}
