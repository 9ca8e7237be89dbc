//! Stateless categorical encoding.
//!
//! `sex` and `smoker` become 0/1 flags and `region` expands into four 0/1
//! indicator columns. Nothing is learned, so the same record always encodes
//! to the same row at fit and at inference.

use crate::dataset::{Record, Region, Sex, Smoker};
use serde::{Deserialize, Serialize};

/// Discrete columns of an encoded record, in target statistics order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoricalColumn {
    Sex,
    Children,
    Smoker,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl CategoricalColumn {
    pub const COUNT: usize = 7;

    pub const ALL: [CategoricalColumn; Self::COUNT] = [
        CategoricalColumn::Sex,
        CategoricalColumn::Children,
        CategoricalColumn::Smoker,
        CategoricalColumn::Northeast,
        CategoricalColumn::Northwest,
        CategoricalColumn::Southeast,
        CategoricalColumn::Southwest,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Sex => "sex",
            CategoricalColumn::Children => "children",
            CategoricalColumn::Smoker => "smoker",
            CategoricalColumn::Northeast => "northeast",
            CategoricalColumn::Northwest => "northwest",
            CategoricalColumn::Southeast => "southeast",
            CategoricalColumn::Southwest => "southwest",
        }
    }

    /// Position of this column in [`CategoricalColumn::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A record after categorical encoding; numeric fields pass through.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedRecord {
    pub age: i64,
    pub sex: i64,
    pub bmi: f64,
    pub children: i64,
    pub smoker: i64,
    pub northeast: i64,
    pub northwest: i64,
    pub southeast: i64,
    pub southwest: i64,
    pub charges: Option<f64>,
}

impl EncodedRecord {
    /// Value of a discrete column.
    pub fn category(&self, column: CategoricalColumn) -> i64 {
        match column {
            CategoricalColumn::Sex => self.sex,
            CategoricalColumn::Children => self.children,
            CategoricalColumn::Smoker => self.smoker,
            CategoricalColumn::Northeast => self.northeast,
            CategoricalColumn::Northwest => self.northwest,
            CategoricalColumn::Southeast => self.southeast,
            CategoricalColumn::Southwest => self.southwest,
        }
    }

    /// Region indicators in [`Region::ALL`] order.
    pub fn region_indicators(&self) -> [i64; 4] {
        [
            self.northeast,
            self.northwest,
            self.southeast,
            self.southwest,
        ]
    }
}

/// Deterministic categorical encoder with no fit phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, record: &Record) -> EncodedRecord {
        let flag = |on: bool| i64::from(on);
        EncodedRecord {
            age: record.age,
            sex: flag(record.sex == Sex::Male),
            bmi: record.bmi,
            children: record.children,
            smoker: flag(record.smoker == Smoker::Yes),
            northeast: flag(record.region == Region::Northeast),
            northwest: flag(record.region == Region::Northwest),
            southeast: flag(record.region == Region::Southeast),
            southwest: flag(record.region == Region::Southwest),
            charges: record.charges,
        }
    }

    pub fn encode_all(&self, records: &[Record]) -> Vec<EncodedRecord> {
        records.iter().map(|r| self.encode(r)).collect()
    }

    /// Recover the typed record from an encoded row.
    ///
    /// Returns `None` unless the flags are 0/1 and exactly one region
    /// indicator is set.
    pub fn decode(&self, encoded: &EncodedRecord) -> Option<Record> {
        let sex = match encoded.sex {
            1 => Sex::Male,
            0 => Sex::Female,
            _ => return None,
        };
        let smoker = match encoded.smoker {
            1 => Smoker::Yes,
            0 => Smoker::No,
            _ => return None,
        };

        let indicators = encoded.region_indicators();
        if indicators.iter().any(|&v| v != 0 && v != 1) || indicators.iter().sum::<i64>() != 1 {
            return None;
        }
        let region = Region::ALL[indicators.iter().position(|&v| v == 1)?];

        Some(Record {
            age: encoded.age,
            sex,
            bmi: encoded.bmi,
            children: encoded.children,
            smoker,
            region,
            charges: encoded.charges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sex: Sex, smoker: Smoker, region: Region) -> Record {
        Record {
            age: 40,
            sex,
            bmi: 27.5,
            children: 2,
            smoker,
            region,
            charges: Some(9000.0),
        }
    }

    #[test]
    fn test_flags() {
        let encoder = CategoricalEncoder::new();
        let male_smoker = encoder.encode(&record(Sex::Male, Smoker::Yes, Region::Northeast));
        assert_eq!(male_smoker.sex, 1);
        assert_eq!(male_smoker.smoker, 1);

        let female_non_smoker = encoder.encode(&record(Sex::Female, Smoker::No, Region::Northeast));
        assert_eq!(female_non_smoker.sex, 0);
        assert_eq!(female_non_smoker.smoker, 0);
    }

    #[test]
    fn test_region_indicators_one_hot() {
        let encoder = CategoricalEncoder::new();
        for (i, region) in Region::ALL.into_iter().enumerate() {
            let encoded = encoder.encode(&record(Sex::Male, Smoker::No, region));
            let indicators = encoded.region_indicators();
            assert_eq!(indicators.iter().sum::<i64>(), 1);
            assert_eq!(indicators[i], 1);
        }
    }

    #[test]
    fn test_numeric_fields_pass_through() {
        let encoded = CategoricalEncoder::new().encode(&record(Sex::Male, Smoker::No, Region::Southwest));
        assert_eq!(encoded.age, 40);
        assert_eq!(encoded.bmi, 27.5);
        assert_eq!(encoded.children, 2);
        assert_eq!(encoded.charges, Some(9000.0));
    }

    #[test]
    fn test_reencoding_is_noop() {
        let encoder = CategoricalEncoder::new();
        for region in Region::ALL {
            for sex in [Sex::Male, Sex::Female] {
                for smoker in [Smoker::Yes, Smoker::No] {
                    let once = encoder.encode(&record(sex, smoker, region));
                    let decoded = encoder.decode(&once).unwrap();
                    assert_eq!(encoder.encode(&decoded), once);
                }
            }
        }
    }

    #[test]
    fn test_decode_rejects_invalid_indicators() {
        let encoder = CategoricalEncoder::new();
        let mut encoded = encoder.encode(&record(Sex::Male, Smoker::No, Region::Northwest));
        encoded.southeast = 1;
        assert!(encoder.decode(&encoded).is_none());

        encoded.southeast = 0;
        encoded.sex = 2;
        assert!(encoder.decode(&encoded).is_none());
    }

    #[test]
    fn test_category_lookup() {
        let encoded = CategoricalEncoder::new().encode(&record(Sex::Female, Smoker::Yes, Region::Southeast));
        assert_eq!(encoded.category(CategoricalColumn::Sex), 0);
        assert_eq!(encoded.category(CategoricalColumn::Children), 2);
        assert_eq!(encoded.category(CategoricalColumn::Smoker), 1);
        assert_eq!(encoded.category(CategoricalColumn::Southeast), 1);
        assert_eq!(encoded.category(CategoricalColumn::Northwest), 0);
    }

    #[test]
    fn test_column_index_matches_all() {
        for (i, column) in CategoricalColumn::ALL.into_iter().enumerate() {
            assert_eq!(column.index(), i);
        }
    }
}
