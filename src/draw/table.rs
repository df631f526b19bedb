//! Plain text rendering, one column per year.

use std::fmt::{self, Write};

use super::NO_DIRECT_FLIGHTS;
use crate::series::{OtherTransportOption, TransportModes, TripRecord};
use crate::view::{Renderer, YearWindow};

/// Whole number with `,` between each group of thousands
pub fn format_number(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    if value.is_sign_negative() && rounded != "0" {
        out.push('-');
    }
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

fn format_per_person(record: &TripRecord) -> String {
    match record.per_person.value() {
        Some(value) => format!("{:.2}", value),
        None => "-".to_owned(),
    }
}

#[derive(Debug, Default)]
pub struct TableRenderer;

impl TableRenderer {
    fn write_row(
        out: &mut String,
        label: &str,
        cells: &[String],
        widths: &[usize],
    ) -> fmt::Result {
        write!(out, "{:<18}", label)?;
        for (cell, width) in cells.iter().zip(widths) {
            write!(out, " {:>width$}", cell, width = *width)?;
        }
        writeln!(out)
    }
}

impl Renderer for TableRenderer {
    type Output = String;

    fn render_series(
        &mut self,
        records: &[TripRecord],
        window: YearWindow,
    ) -> Result<String, fmt::Error> {
        let years: Vec<String> = records
            .iter()
            .map(|record| {
                if record.prediction {
                    format!("{}*", record.year)
                } else {
                    record.year.to_string()
                }
            })
            .collect();
        let people: Vec<String> = records
            .iter()
            .map(|record| format_number(record.number_of_people))
            .collect();
        let emissions: Vec<String> = records
            .iter()
            .map(|record| format_number(record.carbon_emission))
            .collect();
        let per_person: Vec<String> = records.iter().map(format_per_person).collect();

        let widths: Vec<usize> = (0..records.len())
            .map(|i| {
                [&years[i], &people[i], &emissions[i], &per_person[i]]
                    .iter()
                    .map(|cell| cell.len())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        writeln!(out, "Flights {} to {}", window.start, window.end)?;
        Self::write_row(&mut out, "year", &years, &widths)?;
        Self::write_row(&mut out, "number_of_people", &people, &widths)?;
        Self::write_row(&mut out, "carbon_emission", &emissions, &widths)?;
        Self::write_row(&mut out, "per_person", &per_person, &widths)?;
        if records.iter().any(|record| record.prediction) {
            writeln!(out, "* predicted")?;
        }
        Ok(out)
    }

    fn render_no_data(&mut self) -> Result<String, fmt::Error> {
        Ok(NO_DIRECT_FLIGHTS.to_owned())
    }

    fn render_transport(&mut self, transport: &TransportModes) -> Result<String, fmt::Error> {
        let rows = transport
            .cars
            .iter()
            .map(|option| ("road", option))
            .chain(transport.train.iter().map(|option| ("rail", option)));
        let kind_width = transport
            .cars
            .iter()
            .chain(&transport.train)
            .map(|option: &OtherTransportOption| option.kind.len())
            .max()
            .unwrap_or(0)
            .max("type".len());

        let mut out = String::new();
        writeln!(
            out,
            "{:<4}  {:<kind_width$}  emissions",
            "mode",
            "type",
            kind_width = kind_width
        )?;
        for (mode, option) in rows {
            writeln!(
                out,
                "{:<4}  {:<kind_width$}  {:>9}",
                mode,
                option.kind,
                format_number(option.emissions),
                kind_width = kind_width
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::series::{normalize, sort, RawRecord};
    use serde_json::json;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(-1234.4), "-1,234");
        assert_eq!(format_number(99999.6), "100,000");
    }

    fn records() -> Vec<TripRecord> {
        let raw: Vec<RawRecord> = serde_json::from_value(json!([
            {"year": 2019, "number_of_people": 1234567, "carbon_emission": 89000},
            {"year": 2020, "number_of_people": 0, "carbon_emission": 0, "prediction": true},
        ]))
        .unwrap();
        sort(normalize(&raw).unwrap())
    }

    #[test]
    fn predicted_columns_are_marked() {
        let table = TableRenderer
            .render_series(&records(), YearWindow::new(2019, 2020))
            .unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Flights 2019 to 2020");
        assert!(lines[1].starts_with("year"));
        assert!(lines[1].ends_with(" 2019 2020*"));
        assert!(lines[2].contains("1,234,567"));
        assert!(lines[3].contains("89,000"));
        assert!(lines[4].ends_with(" -"));
        assert_eq!(lines[5], "* predicted");
    }

    #[test]
    fn no_marker_without_predictions() {
        let records = records();
        let table = TableRenderer
            .render_series(&records[..1], YearWindow::new(2019, 2019))
            .unwrap();
        assert!(!table.contains('*'));
    }

    #[test]
    fn negative_forecast_keeps_its_sign() {
        let raw: Vec<RawRecord> = serde_json::from_value(json!([
            {"year": 2019, "number_of_people": 10, "carbon_emission": 80},
            {"year": 2020, "number_of_people": -35, "carbon_emission": -2600, "prediction": true},
        ]))
        .unwrap();
        let records = sort(normalize(&raw).unwrap());
        let table = TableRenderer
            .render_series(&records, YearWindow::new(2019, 2020))
            .unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].ends_with(" -35"));
        assert!(lines[3].ends_with(" -2,600"));
        assert!(lines[4].ends_with(" 74.29"));
    }

    #[test]
    fn transport_rows() {
        let transport: TransportModes = serde_json::from_value(json!({
            "cars": [{"type": "Average car", "emissions": 1500}],
            "train": [{"type": "Acela", "emissions": 250}],
        }))
        .unwrap();
        let table = TableRenderer.render_transport(&transport).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("road  Average car"));
        assert!(lines[1].ends_with("1,500"));
        assert!(lines[2].starts_with("rail  Acela"));
    }
}
