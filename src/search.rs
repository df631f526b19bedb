//! A search submission, from the text the user typed to the data on display.

use std::fmt;
use std::sync::Mutex;

use log::{error, info};
use thiserror::Error;

use crate::descriptor::TripDescriptor;
use crate::route::{ResolutionError, RouteResolver};
use crate::series::{process, DataContractError, TripData};
use crate::session::lock;
use crate::statistics::{StatisticsClient, TransportError};
use crate::view::{Renderer, RequestId, ViewState};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    DataContract(#[from] DataContractError),
    #[error("failed to render the result")]
    Render(#[from] fmt::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// driving distance, as the mapping service phrased it
    pub summary: String,
    pub descriptor: TripDescriptor,
    pub data: TripData,
}

/// What happened to a submission which didn't fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Applied(RequestId),
    /// a newer submission started while this one was in flight
    Stale(RequestId),
}

pub struct Searcher<R, S> {
    resolver: R,
    statistics: S,
}

impl<R: RouteResolver, S: StatisticsClient> Searcher<R, S> {
    pub fn new(resolver: R, statistics: S) -> Searcher<R, S> {
        Searcher {
            resolver,
            statistics,
        }
    }

    /// Route, then both places at once, then the statistics for the trip.
    /// Nothing is fetched from the statistics endpoint unless both places resolve.
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let route = self.resolver.route(origin, destination).await?;
        let (origin_details, destination_details) = futures::try_join!(
            self.resolver.place_details(&route.origin_place_id),
            self.resolver.place_details(&route.destination_place_id),
        )?;
        let descriptor = TripDescriptor::new(&route, &origin_details, &destination_details)?;
        info!(
            "Trip from {} to {}: {} by road, {:.0} mi flying",
            descriptor.origin.city,
            descriptor.destination.city,
            route.distance_text,
            descriptor.flight_miles()
        );

        let data = process(self.statistics.fetch(&descriptor).await?)?;
        match &data {
            TripData::Series { records, .. } => info!(
                "Statistics for {} to {} cover {} years",
                descriptor.origin.city,
                descriptor.destination.city,
                records.len()
            ),
            TripData::NoDirectFlights { .. } => info!(
                "No direct flights from {} to {}",
                descriptor.origin.city, descriptor.destination.city
            ),
        }
        Ok(SearchOutcome {
            summary: route.distance_text,
            descriptor,
            data,
        })
    }

    /// Search and show the result on `view`. The view is cleared before
    /// anything is requested and is left clear if the search fails.
    pub async fn submit<D: Renderer>(
        &self,
        view: &Mutex<ViewState<D>>,
        origin: &str,
        destination: &str,
    ) -> Result<Submitted, SearchError> {
        let request = lock(view).begin_request();
        let outcome = match self.search(origin, destination).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    "Search {} for {:?} to {:?} failed: {}",
                    request, origin, destination, err
                );
                return Err(err);
            }
        };
        let applied = lock(view).apply(request, outcome)?;
        Ok(if applied {
            Submitted::Applied(request)
        } else {
            Submitted::Stale(request)
        })
    }
}
