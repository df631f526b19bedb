use std::fmt;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::ser;

/// A calendar year as reported by the statistics endpoint
pub type Year = i32;

/// The first instant of a calendar year, midnight on the 1st of January in UTC.
///
/// Anchoring to UTC keeps year-only precision: the value never drifts into the
/// previous year whatever the local time zone of the consumer is.
/// # Examples
/// ```rust
/// use emission_series::year::YearStart;
/// let start = YearStart::new(2019).unwrap();
/// assert_eq!(start.year(), 2019);
/// assert_eq!(start.to_string(), "2019-01-01T00:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct YearStart(DateTime<Utc>);

impl YearStart {
    /// `None` when the year cannot be represented as a date
    pub fn new(year: Year) -> Option<YearStart> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .map(YearStart)
    }

    /// The calendar year extracted back out of the date
    pub fn year(&self) -> Year {
        self.0.year()
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for YearStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl ser::Serialize for YearStart {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.collect_str(self)
    }
}
