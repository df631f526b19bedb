//! Resolving free text places into a driving route and place details.

use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;

use crate::descriptor::Geolocation;

pub mod google;

pub use google::GoogleMaps;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The mapping service answered, but not with `OK`, eg. `NOT_FOUND` or `ZERO_RESULTS`
    #[error("mapping service answered with status {0}")]
    Status(String),
    #[error("route has {0} geocoded waypoints, expected an origin and a destination")]
    Waypoints(usize),
    #[error("route has no legs")]
    NoLegs,
    #[error("place {0} is not in a city")]
    NoLocality(String),
    #[error("mapping service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A driving route between two places
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub origin_place_id: String,
    pub destination_place_id: String,
    pub distance_meters: f64,
    /// human readable distance, as the mapping service wrote it
    pub distance_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    pub place_id: String,
    pub address_components: Vec<AddressComponent>,
    pub location: Geolocation,
}

impl PlaceDetails {
    /// Name of the city the place is in
    pub fn locality(&self) -> Option<&str> {
        self.address_components
            .iter()
            .find(|component| component.types.iter().any(|kind| kind == "locality"))
            .map(|component| component.long_name.as_str())
    }
}

/// The mapping service, each lookup fails with the status it answered with
/// unless that status is `OK`.
pub trait RouteResolver: Send + Sync {
    fn route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> BoxFuture<'a, Result<Route, ResolutionError>>;

    fn place_details<'a>(
        &'a self,
        place_id: &'a str,
    ) -> BoxFuture<'a, Result<PlaceDetails, ResolutionError>>;
}
