use serde::{ser, Serialize};
use serde_json::{Map, Value};

use crate::error::DataContractError;
use crate::year::{Year, YearStart};

/// A yearly statistics object exactly as the endpoint sent it, kept loose so
/// that fields we don't know about survive normalization.
pub type RawRecord = Map<String, Value>;

/// Carbon emission per passenger, undefined for years without passengers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerPerson {
    Defined(f64),
    Undefined,
}

impl PerPerson {
    pub fn from_counts(carbon_emission: f64, number_of_people: f64) -> PerPerson {
        if number_of_people == 0.0 {
            PerPerson::Undefined
        } else {
            PerPerson::Defined(carbon_emission / number_of_people)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            PerPerson::Defined(value) => Some(value),
            PerPerson::Undefined => None,
        }
    }

    /// Plotting form, NaN when undefined
    pub fn as_f64(self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }

    pub fn is_undefined(self) -> bool {
        self == PerPerson::Undefined
    }
}

impl ser::Serialize for PerPerson {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            PerPerson::Defined(value) => serializer.serialize_f64(*value),
            PerPerson::Undefined => serializer.serialize_none(),
        }
    }
}

/// One yearly observation or forecast, ready for charting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub year: Year,
    pub date: YearStart,
    pub number_of_people: f64,
    pub carbon_emission: f64,
    pub per_person: PerPerson,
    pub prediction: bool,
    /// fields of the raw record which aren't interpreted here
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TripRecord {
    /// Build a record from its raw form, `index` is only used to report errors.
    pub fn from_raw(index: usize, raw: &RawRecord) -> Result<TripRecord, DataContractError> {
        let mut extra = raw.clone();
        let year = take_year(index, raw, &mut extra)?;
        let date = YearStart::new(year)
            .ok_or_else(|| invalid(index, raw, "year", "not a calendar year"))?;
        let number_of_people = take_count(index, raw, &mut extra, "number_of_people")?;
        let carbon_emission = take_count(index, raw, &mut extra, "carbon_emission")?;
        let prediction = match extra.remove("prediction") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(prediction)) => prediction,
            Some(_) => return Err(invalid(index, raw, "prediction", "not a boolean")),
        };
        Ok(TripRecord {
            year,
            date,
            number_of_people,
            carbon_emission,
            per_person: PerPerson::from_counts(carbon_emission, number_of_people),
            prediction,
            extra,
        })
    }

    /// The calendar year of the date the record is plotted at
    pub fn calendar_year(&self) -> Year {
        self.date.year()
    }
}

fn take_year(
    index: usize,
    raw: &RawRecord,
    extra: &mut RawRecord,
) -> Result<Year, DataContractError> {
    match extra.remove("year") {
        None | Some(Value::Null) => Err(missing(index, raw, "year")),
        Some(value) => value
            .as_i64()
            .and_then(|year| Year::try_from(year).ok())
            .ok_or_else(|| invalid(index, raw, "year", "not an integer year")),
    }
}

fn take_count(
    index: usize,
    raw: &RawRecord,
    extra: &mut RawRecord,
    field: &'static str,
) -> Result<f64, DataContractError> {
    match extra.remove(field) {
        None | Some(Value::Null) => Err(missing(index, raw, field)),
        // forecasts of a shrinking route can go below zero, they are kept as sent
        Some(value) => value
            .as_f64()
            .filter(|count| count.is_finite())
            .ok_or_else(|| invalid(index, raw, field, "not a number")),
    }
}

fn missing(index: usize, raw: &RawRecord, field: &'static str) -> DataContractError {
    DataContractError::MissingField {
        index,
        field,
        record: Value::Object(raw.clone()).to_string(),
    }
}

fn invalid(
    index: usize,
    raw: &RawRecord,
    field: &'static str,
    reason: &'static str,
) -> DataContractError {
    DataContractError::InvalidField {
        index,
        field,
        reason,
        record: Value::Object(raw.clone()).to_string(),
    }
}
