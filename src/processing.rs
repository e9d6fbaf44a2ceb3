use crate::scale;
use crate::types::{CountyDatum, CountyShape, EducationRecord};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("no education record for county fips {0}")]
    MissingRecord(u32),
    #[error("duplicate education record for fips {0}")]
    DuplicateFips(u32),
}

/// Education records keyed by fips code, built once after load so the
/// county join is O(1) and a missing match is a named error instead
/// of a failed lookup deep in render code.
#[derive(Debug)]
pub struct EducationIndex<'a> {
    by_fips: HashMap<u32, &'a EducationRecord>,
}

impl<'a> EducationIndex<'a> {
    pub fn build(records: &'a [EducationRecord]) -> Result<Self, JoinError> {
        let mut by_fips = HashMap::with_capacity(records.len());
        for record in records {
            if by_fips.insert(record.fips, record).is_some() {
                return Err(JoinError::DuplicateFips(record.fips));
            }
        }
        Ok(EducationIndex { by_fips })
    }

    pub fn get(&self, fips: u32) -> Option<&EducationRecord> {
        self.by_fips.get(&fips).copied()
    }

    pub fn len(&self) -> usize {
        self.by_fips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fips.is_empty()
    }
}

/// Join each county shape with its education record and resolve the
/// fill color. Every shape must have exactly one matching record.
pub fn join_counties(
    shapes: Vec<CountyShape>,
    index: &EducationIndex,
) -> Result<Vec<CountyDatum>, JoinError> {
    shapes
        .into_iter()
        .map(|shape| {
            let record = index
                .get(shape.fips)
                .ok_or(JoinError::MissingRecord(shape.fips))?;
            Ok(CountyDatum {
                fips: shape.fips,
                area_name: record.area_name.clone(),
                state: record.state.clone(),
                percent: record.bachelors_or_higher,
                color: scale::band_color(record.bachelors_or_higher),
                geometry: shape.geometry,
            })
        })
        .collect()
}

/// Min and max of the bachelor's percentage, None for an empty
/// dataset.
pub fn value_range(records: &[EducationRecord]) -> Option<(f64, f64)> {
    records.iter().fold(None, |acc, record| {
        let v = record.bachelors_or_higher;
        Some(match acc {
            None => (v, v),
            Some((min, max)) => (min.min(v), max.max(v)),
        })
    })
}
