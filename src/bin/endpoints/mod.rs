use std::convert::Infallible;
use std::sync::Arc;

use log::{error, warn};
use serde::Serialize;
use urlencoding::decode;
use warp::http::StatusCode;
use warp::{reject, Filter, Rejection, Reply};

use trip_emissions::descriptor::Place;
use trip_emissions::draw::SvgChart;
use trip_emissions::route::RouteResolver;
use trip_emissions::series::{first_prediction, TransportModes, TripData, TripRecord, Year};
use trip_emissions::session::{SessionContainer, SessionId};
use trip_emissions::statistics::StatisticsClient;
use trip_emissions::view::{Displayed, RequestId, ViewState, YearWindow};
use trip_emissions::{SearchError, Searcher};

mod chart_endpoint;
mod trip_endpoint;
mod window_endpoint;

pub use chart_endpoint::{chart_route, transport_route};
pub use trip_endpoint::trip_route;
pub use window_endpoint::window_route;

pub type Sessions = SessionContainer<ViewState<SvgChart>>;

pub fn with_data<D: Sync + Send>(
    db: Arc<D>,
) -> impl Filter<Extract = (Arc<D>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || db.clone())
}

#[derive(Debug)]
pub enum Failure {
    Search(SearchError),
    /// a newer search was started on the session before this one finished
    Superseded(RequestId),
    NoSession(SessionId),
    NothingToDraw(SessionId),
    Decode(String),
}

impl reject::Reject for Failure {}

impl Failure {
    fn status(&self) -> StatusCode {
        match self {
            Failure::Search(SearchError::Resolution(_)) => StatusCode::NOT_FOUND,
            Failure::Search(SearchError::Transport(_)) => StatusCode::BAD_GATEWAY,
            Failure::Search(SearchError::DataContract(_)) => StatusCode::BAD_GATEWAY,
            Failure::Search(SearchError::Render(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Failure::Superseded(_) => StatusCode::CONFLICT,
            Failure::NoSession(_) | Failure::NothingToDraw(_) => StatusCode::NOT_FOUND,
            Failure::Decode(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::Search(err) => err.to_string(),
            Failure::Superseded(request) => format!("request {} was superseded", request),
            Failure::NoSession(session) => format!("no session {}", session),
            Failure::NothingToDraw(session) => format!("nothing to draw for session {}", session),
            Failure::Decode(text) => format!("can't decode {:?}", text),
        }
    }
}

pub fn decode_segment(text: &str) -> Result<String, Rejection> {
    match decode(text) {
        Ok(decoded) => Ok(decoded.into_owned()),
        Err(err) => {
            warn!("failed to decode {:?}: {:?}", text, err);
            Err(reject::custom(Failure::Decode(text.to_owned())))
        }
    }
}

#[derive(Serialize)]
struct FEError {
    message: String,
}

pub async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(failure) = rejection.find::<Failure>() {
        if failure.status().is_server_error() {
            error!("{}", failure.message());
        }
        (failure.status(), failure.message())
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_owned())
    } else if let Some(err) = rejection.find::<reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_owned())
    } else {
        error!("unhandled rejection {:?}", rejection);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&FEError { message }),
        status,
    ))
}

/// Every endpoint, failures answered as JSON with their status
pub fn api<R, S>(
    searcher: Arc<Searcher<R, S>>,
    sessions: Arc<Sessions>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone
where
    R: RouteResolver + 'static,
    S: StatisticsClient + 'static,
{
    trip_route(searcher, sessions.clone())
        .or(window_route(sessions.clone()))
        .or(chart_route(sessions.clone()))
        .or(transport_route(sessions))
        .recover(handle_rejection)
}

/// The JSON form of what a session is showing
#[derive(Serialize)]
pub struct FETrip<'s> {
    session: SessionId,
    request: RequestId,
    summary: &'s str,
    origin: &'s Place,
    destination: &'s Place,
    distance: Option<f64>,
    series: Vec<TripRecord>,
    first_prediction: Option<Year>,
    window: Option<YearWindow>,
    /// the window is a single year, no charts were drawn for it
    skipped: bool,
    no_direct_flights: bool,
    transport: &'s TransportModes,
}

impl<'s> FETrip<'s> {
    pub fn new(session: SessionId, displayed: &'s Displayed) -> FETrip<'s> {
        let series = displayed.windowed();
        FETrip {
            session,
            request: displayed.request,
            summary: &displayed.summary,
            origin: &displayed.trip.origin,
            destination: &displayed.trip.destination,
            distance: displayed.trip.distance,
            first_prediction: first_prediction(&series).map(|record| record.year),
            series,
            window: displayed.window,
            skipped: displayed.window.map_or(false, |window| window.is_degenerate()),
            no_direct_flights: matches!(displayed.data, TripData::NoDirectFlights { .. }),
            transport: displayed.data.transport(),
        }
    }
}
