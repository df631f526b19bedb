//! SVG line charts of a windowed series and bars for the other ways to travel.

use std::fmt::{self, Write};

use super::table::format_number;
use super::NO_DIRECT_FLIGHTS;
use crate::series::{first_prediction, TransportModes, TripRecord, Year};
use crate::view::{Renderer, YearWindow};
use crate::write_xml;

const MARGIN_LEFT: f64 = 70.;
const MARGIN_RIGHT: f64 = 20.;
const PANEL_GAP: f64 = 50.;
const LEGEND_HEIGHT: f64 = 40.;
const BAR_HEIGHT: f64 = 22.;

const STYLE: &str = "
text { font-family: sans-serif; font-size: 11px; }
.axis { stroke: #888; }
.line { fill: none; stroke-width: 2; }
.passengers { stroke: #1f77b4; fill: #1f77b4; }
.emissions { stroke: #d62728; fill: #d62728; }
.per-person { stroke: #2ca02c; fill: #2ca02c; }
.prediction-boundary { stroke: #555; stroke-dasharray: 4 4; }
.road { fill: #9467bd; }
.rail { fill: #ff7f0e; }
";

/// One line chart, a value taken from each record
struct Panel {
    title: &'static str,
    class: &'static str,
    value: fn(&TripRecord) -> Option<f64>,
}

const PANELS: [Panel; 3] = [
    Panel {
        title: "Passengers",
        class: "passengers",
        value: |record| Some(record.number_of_people),
    },
    Panel {
        title: "Carbon emission",
        class: "emissions",
        value: |record| Some(record.carbon_emission),
    },
    Panel {
        title: "Emission per passenger",
        class: "per-person",
        value: |record| record.per_person.value(),
    },
];

fn round(value: f64) -> f64 {
    (value * 10.).round() / 10.
}

/// Maps the years of the window onto the width of a panel
struct XScale {
    start: Year,
    span: f64,
    width: f64,
}

impl XScale {
    fn new(window: YearWindow, width: f64) -> XScale {
        XScale {
            start: window.start,
            // a single year still needs somewhere to go
            span: (i64::from(window.end) - i64::from(window.start)).max(1) as f64,
            width,
        }
    }

    fn x(&self, year: Year) -> f64 {
        let offset = i64::from(year) - i64::from(self.start);
        round(MARGIN_LEFT + offset as f64 / self.span * self.width)
    }
}

/// Maps values onto the height of a panel. Zero is always within the range,
/// forecasts can drop below it.
struct YScale {
    min: f64,
    max: f64,
    top: f64,
    height: f64,
}

impl YScale {
    fn new(values: impl Iterator<Item = f64>, top: f64, height: f64) -> YScale {
        let (min, max) = values.fold((0., 0.), |(min, max): (f64, f64), value| {
            (min.min(value), max.max(value))
        });
        YScale {
            min,
            max: if max > min { max } else { min + 1. },
            top,
            height,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let share = (value - self.min) / (self.max - self.min);
        round(self.top + self.height - share * self.height)
    }
}

/// Points of the lines through the defined values, a line is broken wherever
/// a value is undefined.
fn line_segments(
    records: &[TripRecord],
    value: fn(&TripRecord) -> Option<f64>,
    x: &XScale,
    y: &YScale,
) -> Vec<Vec<String>> {
    let mut segments = vec![];
    let mut current = vec![];
    for record in records {
        match value(record) {
            Some(v) => current.push(format!("{},{}", x.x(record.year), y.y(v))),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Renders to a standalone SVG document
#[derive(Debug, Clone)]
pub struct SvgChart {
    pub width: f64,
    pub panel_height: f64,
}

impl Default for SvgChart {
    fn default() -> Self {
        SvgChart {
            width: 720.,
            panel_height: 160.,
        }
    }
}

impl SvgChart {
    fn plot_width(&self) -> f64 {
        self.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn begin(&self, out: &mut String, height: f64, title: &str) -> fmt::Result {
        writeln!(
            out,
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
            width = self.width,
            height = height
        )?;
        write_xml!(out, <title>{title}</title>)?;
        write_xml!(out, <style>{STYLE}</style>)
    }

    fn write_legend(&self, out: &mut String, prediction: Option<Year>) -> fmt::Result {
        write_xml!(out, <g class="legend" transform="translate(70, 20)">)?;
        let mut x = 0.;
        for panel in &PANELS {
            write_xml!(out,
                <rect class={panel.class} x={x} y="-9" width="12" height="12" />
                <text x={x + 16.} y="1">{panel.title}</text>
            )?;
            x += 170.;
        }
        if let Some(year) = prediction {
            write_xml!(out,
                <line class="prediction-boundary" x1={x} y1="-3" x2={x + 12.} y2="-3" />
                <text x={x + 16.} y="1">"predicted from "{year}</text>
            )?;
        }
        write_xml!(out, </g>)
    }

    fn write_panel(
        &self,
        out: &mut String,
        panel: &Panel,
        records: &[TripRecord],
        x: &XScale,
        top: f64,
        prediction: Option<Year>,
    ) -> fmt::Result {
        let height = self.panel_height;
        let bottom = top + height;
        let right = MARGIN_LEFT + self.plot_width();
        let y = YScale::new(records.iter().filter_map(panel.value), top, height);
        let label_x = MARGIN_LEFT - 6.;

        write_xml!(out,
            <g class={panel.class}>
            <text x={MARGIN_LEFT} y={top - 8.}>{panel.title}</text>
            <line class="axis" x1={MARGIN_LEFT} y1={bottom} x2={right} y2={bottom} />
            <line class="axis" x1={MARGIN_LEFT} y1={top} x2={MARGIN_LEFT} y2={bottom} />
            <text x={label_x} y={top + 4.} text-anchor="end">{format_number(y.max)}</text>
            <text x={label_x} y={bottom} text-anchor="end">{format_number(y.min)}</text>
        )?;
        if y.min < 0. {
            let zero = y.y(0.);
            write_xml!(out,
                <line class="axis zero" x1={MARGIN_LEFT} y1={zero} x2={right} y2={zero} />
            )?;
        }
        for record in records {
            let year_x = x.x(record.year);
            write_xml!(out,
                <text x={year_x} y={bottom + 14.} text-anchor="middle">{record.year}</text>
            )?;
        }
        for segment in line_segments(records, panel.value, x, &y) {
            write_xml!(out,
                <polyline class={format!("line {}", panel.class)} points=[&segment[..]; " "] />
            )?;
        }
        if let Some(year) = prediction {
            let at = x.x(year);
            write_xml!(out,
                <line class="prediction-boundary" x1={at} y1={top} x2={at} y2={bottom} />
            )?;
        }
        write_xml!(out, </g>)
    }
}

impl Renderer for SvgChart {
    type Output = String;

    fn render_series(
        &mut self,
        records: &[TripRecord],
        window: YearWindow,
    ) -> Result<String, fmt::Error> {
        let prediction = first_prediction(records).map(|record| record.year);
        let x = XScale::new(window, self.plot_width());
        let height = LEGEND_HEIGHT + PANELS.len() as f64 * (self.panel_height + PANEL_GAP);

        let mut out = String::new();
        self.begin(
            &mut out,
            height,
            &format!("Flights {} to {}", window.start, window.end),
        )?;
        self.write_legend(&mut out, prediction)?;
        let mut top = LEGEND_HEIGHT + PANEL_GAP / 2.;
        for panel in &PANELS {
            self.write_panel(&mut out, panel, records, &x, top, prediction)?;
            top += self.panel_height + PANEL_GAP;
        }
        writeln!(out, "</svg>")?;
        Ok(out)
    }

    fn render_no_data(&mut self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.begin(&mut out, 60., NO_DIRECT_FLIGHTS)?;
        let center = self.width / 2.;
        write_xml!(&mut out,
            <text class="no-data" x={center} y="34" text-anchor="middle">{NO_DIRECT_FLIGHTS}</text>
        )?;
        writeln!(out, "</svg>")?;
        Ok(out)
    }

    fn render_transport(&mut self, transport: &TransportModes) -> Result<String, fmt::Error> {
        let options: Vec<_> = transport
            .cars
            .iter()
            .map(|option| ("road", option))
            .chain(transport.train.iter().map(|option| ("rail", option)))
            .collect();
        let max = options
            .iter()
            .map(|(_, option)| option.emissions)
            .fold(0., f64::max);
        let max = if max > 0. { max } else { 1. };
        let label_width = 160.;
        let bar_space = self.width - label_width - MARGIN_RIGHT - 60.;
        let height = 20. + options.len() as f64 * (BAR_HEIGHT + 8.);

        let mut out = String::new();
        self.begin(&mut out, height, "Other ways to travel")?;
        let mut y = 10.;
        for (mode, option) in &options {
            let width = round(option.emissions.max(0.) / max * bar_space);
            let amount = format_number(option.emissions);
            write_xml!(&mut out,
                <g class={*mode}>
                <text x={label_width - 6.} y={y + 15.} text-anchor="end">{&option.kind}</text>
                <rect class={*mode} x={label_width} y={y} width={width} height={BAR_HEIGHT} />
                <text x={label_width + width + 6.} y={y + 15.}>{amount}</text>
                </g>
            )?;
            y += BAR_HEIGHT + 8.;
        }
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::series::{normalize, sort};
    use serde_json::{json, Value};

    fn records(raw: Value) -> Vec<TripRecord> {
        sort(normalize(&serde_json::from_value::<Vec<_>>(raw).unwrap()).unwrap())
    }

    #[test]
    fn prediction_boundary_only_with_prediction() {
        let recorded = records(json!([
            {"year": 2017, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2018, "number_of_people": 20, "carbon_emission": 8},
        ]));
        let svg = SvgChart::default()
            .render_series(&recorded, YearWindow::new(2017, 2018))
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<line class=\"prediction-boundary\""));
        assert_eq!(svg.matches("<polyline").count(), 3);

        let predicted = records(json!([
            {"year": 2017, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2018, "number_of_people": 20, "carbon_emission": 8},
            {"year": 2019, "number_of_people": 30, "carbon_emission": 9, "prediction": true},
            {"year": 2020, "number_of_people": 40, "carbon_emission": 9, "prediction": true},
        ]));
        let svg = SvgChart::default()
            .render_series(&predicted, YearWindow::new(2017, 2020))
            .unwrap();
        // one per panel and one in the legend
        assert_eq!(svg.matches("<line class=\"prediction-boundary\"").count(), 4);
        assert!(svg.contains("predicted from 2019"));
    }

    #[test]
    fn boundary_sits_on_first_predicted_year() {
        let predicted = records(json!([
            {"year": 2010, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2020, "number_of_people": 40, "carbon_emission": 9, "prediction": true},
        ]));
        let mut chart = SvgChart {
            width: 290.,
            panel_height: 100.,
        };
        let svg = chart
            .render_series(&predicted, YearWindow::new(2010, 2020))
            .unwrap();
        // plot spans x 70 to 270
        assert!(svg.contains("<line class=\"prediction-boundary\" x1=\"270\""));
    }

    #[test]
    fn undefined_per_person_breaks_the_line() {
        let recorded = records(json!([
            {"year": 2015, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2016, "number_of_people": 12, "carbon_emission": 5},
            {"year": 2017, "number_of_people": 0, "carbon_emission": 0},
            {"year": 2018, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2019, "number_of_people": 10, "carbon_emission": 6},
        ]));
        let svg = SvgChart::default()
            .render_series(&recorded, YearWindow::new(2015, 2019))
            .unwrap();
        assert_eq!(svg.matches("<polyline class=\"line per-person\"").count(), 2);
        assert_eq!(svg.matches("<polyline class=\"line passengers\"").count(), 1);
    }

    #[test]
    fn negative_forecast_drops_below_zero() {
        let forecast = records(json!([
            {"year": 2018, "number_of_people": 120, "carbon_emission": 900},
            {"year": 2019, "number_of_people": 10, "carbon_emission": 80},
            {"year": 2020, "number_of_people": -35, "carbon_emission": -260, "prediction": true},
        ]));
        let mut chart = SvgChart {
            width: 290.,
            panel_height: 100.,
        };
        let svg = chart
            .render_series(&forecast, YearWindow::new(2018, 2020))
            .unwrap();
        assert!(svg.contains(">-35</text>"));
        assert!(svg.contains(">-260</text>"));
        assert_eq!(svg.matches("<line class=\"axis zero\"").count(), 2);
        // passengers panel spans y 65 to 165, zero at 35 / 155 of the way up
        assert!(svg.contains("<line class=\"axis zero\" x1=\"70\" y1=\"142.4\""));
    }

    #[test]
    fn widest_window_is_drawn() {
        let recorded = records(json!([
            {"year": 2017, "number_of_people": 10, "carbon_emission": 5},
            {"year": 2018, "number_of_people": 20, "carbon_emission": 8},
        ]));
        let svg = SvgChart::default()
            .render_series(&recorded, YearWindow::new(i32::MIN, i32::MAX))
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn no_data_message() {
        let svg = SvgChart::default().render_no_data().unwrap();
        assert!(svg.contains(NO_DIRECT_FLIGHTS));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn transport_bars() {
        let transport: TransportModes = serde_json::from_value(json!({
            "cars": [{"type": "Average car", "emissions": 100}],
            "train": [{"type": "Amtrak & co", "emissions": 50}],
        }))
        .unwrap();
        let svg = SvgChart::default().render_transport(&transport).unwrap();
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Amtrak &amp; co"));
    }
}
