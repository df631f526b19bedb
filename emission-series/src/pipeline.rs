use crate::error::DataContractError;
use crate::payload::{StatisticsPayload, TransportModes};
use crate::record::{RawRecord, TripRecord};
use crate::year::Year;

/// Turn raw statistics into records, one for one and in the same order.
///
/// A year without passengers still produces a record, with an undefined
/// per-person emission. A record which is missing a required field fails the
/// whole series, guessing a value would put points in the wrong place.
pub fn normalize(raw: &[RawRecord]) -> Result<Vec<TripRecord>, DataContractError> {
    raw.iter()
        .enumerate()
        .map(|(index, record)| TripRecord::from_raw(index, record))
        .collect()
}

/// Chronological order, stable for equal years
pub fn sort(mut records: Vec<TripRecord>) -> Vec<TripRecord> {
    records.sort_by_key(|record| record.date);
    records
}

/// Records whose calendar year is within `start..=end`, in their existing order
pub fn filter_by_year_range(records: &[TripRecord], start: Year, end: Year) -> Vec<TripRecord> {
    records
        .iter()
        .filter(|record| (start..=end).contains(&record.calendar_year()))
        .cloned()
        .collect()
}

/// The first forecast in the order given.
///
/// Forecasts are expected to be a suffix of a sorted series, but nothing here
/// checks that: records after the one returned aren't necessarily forecasts.
pub fn first_prediction(records: &[TripRecord]) -> Option<&TripRecord> {
    records.iter().find(|record| record.prediction)
}

/// Earliest and latest calendar year in the series
pub fn year_span(records: &[TripRecord]) -> Option<(Year, Year)> {
    let mut years = records.iter().map(TripRecord::calendar_year);
    let first = years.next()?;
    Some(years.fold((first, first), |(min, max), year| {
        (min.min(year), max.max(year))
    }))
}

/// Result of processing one statistics response
#[derive(Debug, Clone, PartialEq)]
pub enum TripData {
    /// There are flights, `records` is normalized and sorted
    Series {
        records: Vec<TripRecord>,
        transport: TransportModes,
    },
    /// No direct flight data, only the alternatives can be shown
    NoDirectFlights { transport: TransportModes },
}

impl TripData {
    pub fn transport(&self) -> &TransportModes {
        match self {
            Self::Series { transport, .. } | Self::NoDirectFlights { transport } => transport,
        }
    }

    pub fn records(&self) -> &[TripRecord] {
        match self {
            Self::Series { records, .. } => records,
            Self::NoDirectFlights { .. } => &[],
        }
    }
}

/// Normalize and sort the plane series of a payload. The series is never
/// looked at when the payload has no plane data.
pub fn process(payload: StatisticsPayload) -> Result<TripData, DataContractError> {
    match payload.into_parts() {
        (Some(planes), transport) if !planes.is_empty() => Ok(TripData::Series {
            records: sort(normalize(&planes)?),
            transport,
        }),
        (_, transport) => Ok(TripData::NoDirectFlights { transport }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::PerPerson;
    use serde_json::{json, Value};

    fn raw(values: Value) -> Vec<RawRecord> {
        serde_json::from_value(values).unwrap()
    }

    fn scenario() -> Vec<TripRecord> {
        sort(
            normalize(&raw(json!([
                {"year": 2021, "number_of_people": 1000, "carbon_emission": 500},
                {"year": 2019, "number_of_people": 800, "carbon_emission": 400},
                {
                    "year": 2025,
                    "number_of_people": 1200,
                    "carbon_emission": 700,
                    "prediction": true,
                },
            ])))
            .unwrap(),
        )
    }

    fn years(records: &[TripRecord]) -> Vec<Year> {
        records.iter().map(|record| record.year).collect()
    }

    #[test]
    fn normalize_then_sort() {
        let records = sort(
            normalize(&raw(json!([
                {"year": 2021, "number_of_people": 1000, "carbon_emission": 500},
                {"year": 2019, "number_of_people": 800, "carbon_emission": 400},
            ])))
            .unwrap(),
        );
        assert_eq!(years(&records), vec![2019, 2021]);
        assert_eq!(records[0].per_person, PerPerson::Defined(0.5));
        assert_eq!(records[1].per_person, PerPerson::Defined(0.5));
    }

    #[test]
    fn normalize_keeps_length_and_fields() {
        let input = raw(json!([
            {"year": 2018, "number_of_people": 10, "carbon_emission": 5, "source": "BTS"},
            {"year": 2017, "number_of_people": 20, "carbon_emission": 5, "prediction": false},
        ]));
        let records = normalize(&input).unwrap();
        assert_eq!(records.len(), input.len());
        assert_eq!(years(&records), vec![2018, 2017]);
        assert_eq!(records[0].extra.get("source"), Some(&json!("BTS")));
        assert_eq!(records[1].number_of_people, 20.0);
    }

    #[test]
    fn zero_passengers_doesnt_stop_processing() {
        let records = normalize(&raw(json!([
            {"year": 2020, "number_of_people": 0, "carbon_emission": 300},
            {"year": 2021, "number_of_people": 3, "carbon_emission": 300},
        ])))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].per_person.as_f64().is_nan());
        assert_eq!(records[1].per_person, PerPerson::Defined(100.0));
    }

    #[test]
    fn normalize_rejects_incomplete_record() {
        let error = normalize(&raw(json!([
            {"year": 2020, "number_of_people": 1, "carbon_emission": 300},
            {"year": 2021, "number_of_people": 1},
        ])))
        .unwrap_err();
        assert_eq!(error.index(), 1);
    }

    #[test]
    fn negative_forecast_keeps_the_series() {
        let payload: StatisticsPayload = serde_json::from_value(json!([
            {"year": 2018, "number_of_people": 120, "carbon_emission": 900},
            {"year": 2019, "number_of_people": 10, "carbon_emission": 80},
            {"year": 2020, "number_of_people": -35, "carbon_emission": -260, "prediction": true},
        ]))
        .unwrap();
        let data = process(payload).unwrap();
        assert_eq!(years(data.records()), vec![2018, 2019, 2020]);
        let forecast = first_prediction(data.records()).unwrap();
        assert_eq!(forecast.year, 2020);
        assert_eq!(forecast.number_of_people, -35.0);
    }

    #[test]
    fn sort_is_idempotent() {
        let once = scenario();
        assert_eq!(sort(once.clone()), once);
    }

    #[test]
    fn sort_is_stable() {
        let records = sort(
            normalize(&raw(json!([
                {"year": 2020, "number_of_people": 1, "carbon_emission": 1, "tag": "a"},
                {"year": 2019, "number_of_people": 1, "carbon_emission": 1},
                {"year": 2020, "number_of_people": 1, "carbon_emission": 1, "tag": "b"},
            ])))
            .unwrap(),
        );
        assert_eq!(records[1].extra.get("tag"), Some(&json!("a")));
        assert_eq!(records[2].extra.get("tag"), Some(&json!("b")));
    }

    #[test]
    fn reverse_input_sorts_like_chronological_input() {
        let chronological = raw(json!([
            {"year": 2017, "number_of_people": 5, "carbon_emission": 1},
            {"year": 2018, "number_of_people": 0, "carbon_emission": 2},
            {"year": 2019, "number_of_people": 7, "carbon_emission": 3},
        ]));
        let mut reversed = chronological.clone();
        reversed.reverse();
        assert_eq!(
            sort(normalize(&reversed).unwrap()),
            normalize(&chronological).unwrap()
        );
    }

    #[test]
    fn single_year_range() {
        let records = scenario();
        let filtered = filter_by_year_range(&records, 2019, 2019);
        assert_eq!(years(&filtered), vec![2019]);
    }

    #[test]
    fn full_span_range_is_everything() {
        let records = scenario();
        let (min, max) = year_span(&records).unwrap();
        assert_eq!((min, max), (2019, 2025));
        assert_eq!(filter_by_year_range(&records, min, max), records);
    }

    #[test]
    fn range_keeps_order_and_input() {
        let records = scenario();
        let before = records.clone();
        assert_eq!(years(&filter_by_year_range(&records, 2020, 2030)), vec![2021, 2025]);
        assert!(filter_by_year_range(&records, 2022, 2024).is_empty());
        assert!(filter_by_year_range(&records, 2025, 2019).is_empty());
        assert_eq!(records, before);
    }

    #[test]
    fn first_prediction_found() {
        let records = scenario();
        assert_eq!(first_prediction(&records).map(|record| record.year), Some(2025));
    }

    #[test]
    fn first_prediction_none() {
        let records = filter_by_year_range(&scenario(), 2000, 2024);
        assert_eq!(first_prediction(&records), None);
    }

    #[test]
    fn first_prediction_is_earliest_flagged() {
        let records = sort(
            normalize(&raw(json!([
                {"year": 2023, "number_of_people": 1, "carbon_emission": 1, "prediction": true},
                {"year": 2021, "number_of_people": 1, "carbon_emission": 1, "prediction": true},
                {"year": 2022, "number_of_people": 1, "carbon_emission": 1, "prediction": false},
            ])))
            .unwrap(),
        );
        assert_eq!(first_prediction(&records).map(|record| record.year), Some(2021));
    }

    #[test]
    fn empty_span() {
        assert_eq!(year_span(&[]), None);
    }

    #[test]
    fn no_planes_skips_series() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "planes": null,
            "cars": [{"type": "Average car", "emissions": 210}],
            "train": [{"type": "Regional", "emissions": 30}],
        }))
        .unwrap();
        let data = process(payload).unwrap();
        match &data {
            TripData::NoDirectFlights { transport } => {
                assert_eq!(transport.cars.len(), 1);
                assert_eq!(transport.train.len(), 1);
            }
            other => panic!("expected no direct flights, got {:?}", other),
        }
        assert!(data.records().is_empty());
    }

    #[test]
    fn planes_are_processed() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "planes": [
                {"year": 2016, "number_of_people": 4, "carbon_emission": 2},
                {"year": 2015, "number_of_people": 2, "carbon_emission": 2},
            ],
            "cars": [],
        }))
        .unwrap();
        let data = process(payload).unwrap();
        assert_eq!(years(data.records()), vec![2015, 2016]);
        assert!(data.transport().is_empty());
    }

    #[test]
    fn empty_planes_is_no_data() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "planes": [],
            "train": [{"type": "Regional", "emissions": 30}],
        }))
        .unwrap();
        assert!(matches!(
            process(payload).unwrap(),
            TripData::NoDirectFlights { transport } if transport.train.len() == 1
        ));
    }

    #[test]
    fn null_payload_is_no_data() {
        assert_eq!(
            process(StatisticsPayload::Nothing).unwrap(),
            TripData::NoDirectFlights {
                transport: TransportModes::default()
            }
        );
    }
}
