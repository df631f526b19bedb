use futures::future::{BoxFuture, FutureExt};
use log::debug;
use thiserror::Error;

use crate::descriptor::TripDescriptor;
use crate::series::StatisticsPayload;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("statistics endpoint answered with HTTP {0}")]
    Status(u16),
    #[error("statistics request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Where trip statistics come from
pub trait StatisticsClient: Send + Sync {
    fn fetch<'a>(
        &'a self,
        descriptor: &'a TripDescriptor,
    ) -> BoxFuture<'a, Result<StatisticsPayload, TransportError>>;
}

/// Posts the trip as JSON to the statistics endpoint
pub struct HttpStatisticsClient {
    client: reqwest::Client,
    url: String,
}

impl HttpStatisticsClient {
    pub fn new(url: &str) -> HttpStatisticsClient {
        HttpStatisticsClient {
            client: reqwest::Client::new(),
            url: url.to_owned(),
        }
    }

    async fn post(&self, descriptor: &TripDescriptor) -> Result<StatisticsPayload, TransportError> {
        debug!(
            "posting trip {} -> {} to {}",
            descriptor.origin.city, descriptor.destination.city, self.url
        );
        let response = self.client.post(&self.url).json(descriptor).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

impl StatisticsClient for HttpStatisticsClient {
    fn fetch<'a>(
        &'a self,
        descriptor: &'a TripDescriptor,
    ) -> BoxFuture<'a, Result<StatisticsPayload, TransportError>> {
        self.post(descriptor).boxed()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::descriptor::{Geolocation, Place};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use warp::Filter;

    fn descriptor() -> TripDescriptor {
        TripDescriptor {
            origin: Place {
                city: "Chicago".to_owned(),
                geolocation: Geolocation { lat: 41.88, lng: -87.63 },
            },
            destination: Place {
                city: "Detroit".to_owned(),
                geolocation: Geolocation { lat: 42.33, lng: -83.05 },
            },
            distance: Some(282.0),
        }
    }

    /// Serves `/statistics` on a free port, echoing the posted city back in the payload
    fn serve(status: u16) -> SocketAddr {
        let route = warp::path!("statistics")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |body: Value| {
                let payload = json!({
                    "planes": [{"year": 2019, "number_of_people": 5, "carbon_emission": 1}],
                    "cars": [{"type": body["origin"]["city"], "emissions": 3}],
                });
                warp::reply::with_status(
                    warp::reply::json(&payload),
                    warp::http::StatusCode::from_u16(status).unwrap(),
                )
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn posts_descriptor() {
        let addr = serve(200);
        let client = HttpStatisticsClient::new(&format!("http://{}/statistics", addr));
        let (planes, transport) = client.fetch(&descriptor()).await.unwrap().into_parts();
        assert_eq!(planes.unwrap().len(), 1);
        assert_eq!(transport.cars[0].kind, "Chicago");
    }

    #[tokio::test]
    async fn error_status() {
        let addr = serve(503);
        let client = HttpStatisticsClient::new(&format!("http://{}/statistics", addr));
        assert!(matches!(
            client.fetch(&descriptor()).await,
            Err(TransportError::Status(503))
        ));
    }
}
