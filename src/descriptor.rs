//! The trip as it is posted to the statistics endpoint.

use geo::algorithm::haversine_distance::HaversineDistance;
use serde::{Deserialize, Serialize};

use crate::route::{PlaceDetails, ResolutionError, Route};

pub const MILES_PER_METER: f64 = 0.000621371;

pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: f64,
    pub lng: f64,
}

impl Geolocation {
    pub fn point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }

    /// Great circle distance, as a plane would fly it
    pub fn miles_to(self, other: Geolocation) -> f64 {
        meters_to_miles(self.point().haversine_distance(&other.point()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub city: String,
    pub geolocation: Geolocation,
}

impl Place {
    pub fn from_details(details: &PlaceDetails) -> Result<Place, ResolutionError> {
        let city = details
            .locality()
            .ok_or_else(|| ResolutionError::NoLocality(details.place_id.clone()))?;
        Ok(Place {
            city: city.to_owned(),
            geolocation: details.location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDescriptor {
    pub origin: Place,
    pub destination: Place,
    /// driving distance in miles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl TripDescriptor {
    pub fn new(
        route: &Route,
        origin: &PlaceDetails,
        destination: &PlaceDetails,
    ) -> Result<TripDescriptor, ResolutionError> {
        Ok(TripDescriptor {
            origin: Place::from_details(origin)?,
            destination: Place::from_details(destination)?,
            distance: Some(meters_to_miles(route.distance_meters)),
        })
    }

    pub fn flight_miles(&self) -> f64 {
        self.origin
            .geolocation
            .miles_to(self.destination.geolocation)
    }
}
