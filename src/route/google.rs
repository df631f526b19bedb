use futures::future::{BoxFuture, FutureExt};
use log::debug;
use serde::Deserialize;

use super::{AddressComponent, PlaceDetails, ResolutionError, Route, RouteResolver};
use crate::descriptor::{meters_to_miles, Geolocation};

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const PLACE_DETAILS_PATH: &str = "/maps/api/place/details/json";

/// Google Directions and Place Details web services
pub struct GoogleMaps {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(base_url: &str, api_key: &str) -> GoogleMaps {
        GoogleMaps {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    async fn directions(&self, origin: &str, destination: &str) -> Result<Route, ResolutionError> {
        debug!("directions from {:?} to {:?}", origin, destination);
        let response: DirectionsResponse = self
            .client
            .get(format!("{}{}", self.base_url, DIRECTIONS_PATH))
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        response.into_route()
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, ResolutionError> {
        debug!("place details of {}", place_id);
        let response: PlaceDetailsResponse = self
            .client
            .get(format!("{}{}", self.base_url, PLACE_DETAILS_PATH))
            .query(&[
                ("place_id", place_id),
                ("fields", "geometry,address_components"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        response.into_details(place_id)
    }
}

impl RouteResolver for GoogleMaps {
    fn route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> BoxFuture<'a, Result<Route, ResolutionError>> {
        self.directions(origin, destination).boxed()
    }

    fn place_details<'a>(
        &'a self,
        place_id: &'a str,
    ) -> BoxFuture<'a, Result<PlaceDetails, ResolutionError>> {
        self.details(place_id).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    geocoded_waypoints: Vec<GeocodedWaypoint>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct GeocodedWaypoint {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Geolocation,
}

impl DirectionsResponse {
    /// Uses the first route, which the service ranks best
    fn into_route(self) -> Result<Route, ResolutionError> {
        if self.status != "OK" {
            return Err(ResolutionError::Status(self.status));
        }
        let mut waypoints = self.geocoded_waypoints.into_iter();
        let (origin, destination) = match (waypoints.next(), waypoints.last()) {
            (Some(origin), Some(destination)) => (origin, destination),
            (Some(_), None) => return Err(ResolutionError::Waypoints(1)),
            _ => return Err(ResolutionError::Waypoints(0)),
        };
        let legs = self
            .routes
            .into_iter()
            .next()
            .map(|route| route.legs)
            .unwrap_or_default();
        let distance_meters = legs.iter().map(|leg| leg.distance.value).sum();
        let distance_text = match &legs[..] {
            [] => return Err(ResolutionError::NoLegs),
            [leg] => leg.distance.text.clone(),
            _ => format!("{:.0} mi", meters_to_miles(distance_meters)),
        };
        Ok(Route {
            origin_place_id: origin.place_id,
            destination_place_id: destination.place_id,
            distance_meters,
            distance_text,
        })
    }
}

impl PlaceDetailsResponse {
    fn into_details(self, place_id: &str) -> Result<PlaceDetails, ResolutionError> {
        if self.status != "OK" {
            return Err(ResolutionError::Status(self.status));
        }
        match self.result {
            Some(result) => Ok(PlaceDetails {
                place_id: place_id.to_owned(),
                address_components: result.address_components,
                location: result.geometry.location,
            }),
            None => Err(ResolutionError::Status("NOT_FOUND".to_owned())),
        }
    }
}
