//! Normalization and range filtering of yearly trip statistics.
//!
//! Everything in here is synchronous and side-effect free, it can be shared
//! between the server and any client that wants to chart the same data.

pub mod error;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod year;

pub use error::DataContractError;
pub use payload::{OtherTransportOption, StatisticsPayload, TransportModes};
pub use pipeline::{
    filter_by_year_range, first_prediction, normalize, process, sort, year_span, TripData,
};
pub use record::{PerPerson, RawRecord, TripRecord};
pub use year::{Year, YearStart};
