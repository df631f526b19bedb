use std::sync::Arc;

use serde::Deserialize;
use warp::{reject, Filter};

use trip_emissions::session::{lock, SessionId};

use super::{with_data, Failure, Sessions};

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    session: SessionId,
}

fn svg_reply(svg: String) -> impl warp::Reply {
    warp::reply::with_header(svg, "content-type", "image/svg+xml")
}

async fn chart_handler(
    query: ChartQuery,
    sessions: Arc<Sessions>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session = sessions
        .existing(query.session)
        .ok_or_else(|| reject::custom(Failure::NoSession(query.session)))?;
    let view = lock(&session);
    match view.charts().or_else(|| view.message()) {
        Some(svg) => Ok(svg_reply(svg.clone())),
        None => Err(reject::custom(Failure::NothingToDraw(query.session))),
    }
}

async fn transport_handler(
    query: ChartQuery,
    sessions: Arc<Sessions>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session = sessions
        .existing(query.session)
        .ok_or_else(|| reject::custom(Failure::NoSession(query.session)))?;
    let view = lock(&session);
    match view.transport() {
        Some(svg) => Ok(svg_reply(svg.clone())),
        None => Err(reject::custom(Failure::NothingToDraw(query.session))),
    }
}

pub fn chart_route(
    sessions: Arc<Sessions>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors().allow_any_origin();
    warp::path!("chart.svg")
        .and(warp::query::<ChartQuery>())
        .and(with_data(sessions))
        .and_then(chart_handler)
        .with(cors)
}

pub fn transport_route(
    sessions: Arc<Sessions>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors().allow_any_origin();
    warp::path!("transport.svg")
        .and(warp::query::<ChartQuery>())
        .and(with_data(sessions))
        .and_then(transport_handler)
        .with(cors)
}
