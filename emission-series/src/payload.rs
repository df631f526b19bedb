use serde::{Deserialize, Serialize};

use crate::record::RawRecord;

/// Emissions of a way of making the trip without flying, eg. a car model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherTransportOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub emissions: f64,
}

/// Alternatives to flying, grouped by mode. No ordering is implied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportModes {
    /// road
    #[serde(default)]
    pub cars: Vec<OtherTransportOption>,
    /// rail
    #[serde(default)]
    pub train: Vec<OtherTransportOption>,
}

impl TransportModes {
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty() && self.train.is_empty()
    }
}

/// Body of a statistics response. The endpoint has answered in three shapes
/// over time:
/// * a bare array of plane records
/// * an object with `planes`, `cars` and `train`, where `planes` is `null`
///   when there is no direct route
/// * `null` when no airport is close to either end of the trip
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatisticsPayload {
    Planes(Vec<RawRecord>),
    Modes {
        #[serde(default)]
        planes: Option<Vec<RawRecord>>,
        #[serde(flatten)]
        transport: TransportModes,
    },
    Nothing,
}

impl StatisticsPayload {
    /// Split into the plane series, if any, and the alternatives
    pub fn into_parts(self) -> (Option<Vec<RawRecord>>, TransportModes) {
        match self {
            Self::Planes(planes) => (Some(planes), TransportModes::default()),
            Self::Modes { planes, transport } => (planes, transport),
            Self::Nothing => (None, TransportModes::default()),
        }
    }
}
