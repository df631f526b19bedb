use std::sync::Arc;

use log::info;
use serde::Deserialize;
use warp::{reject, Filter};

use trip_emissions::route::RouteResolver;
use trip_emissions::search::Submitted;
use trip_emissions::session::{lock, SessionId};
use trip_emissions::statistics::StatisticsClient;
use trip_emissions::Searcher;

use super::{decode_segment, with_data, FETrip, Failure, Sessions};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    session: Option<SessionId>,
}

async fn trip_handler<R, S>(
    from: String,
    to: String,
    query: SessionQuery,
    searcher: Arc<Searcher<R, S>>,
    sessions: Arc<Sessions>,
) -> Result<impl warp::Reply, warp::Rejection>
where
    R: RouteResolver,
    S: StatisticsClient,
{
    let from = decode_segment(&from)?;
    let to = decode_segment(&to)?;
    // only ids this server handed out are accepted
    let (session_id, session) = match query.session {
        Some(id) => match sessions.existing(id) {
            Some(session) => (id, session),
            None => return Err(reject::custom(Failure::NoSession(id))),
        },
        None => sessions.create(),
    };
    info!("session {} searching {:?} to {:?}", session_id, from, to);

    match searcher.submit(&*session, &from, &to).await {
        Ok(Submitted::Applied(request)) => {
            let view = lock(&session);
            match view.displayed() {
                Some(displayed) => Ok(warp::reply::json(&FETrip::new(session_id, displayed))),
                // cleared by a newer search as soon as the lock was released
                None => Err(reject::custom(Failure::Superseded(request))),
            }
        }
        Ok(Submitted::Stale(request)) => Err(reject::custom(Failure::Superseded(request))),
        Err(err) => Err(reject::custom(Failure::Search(err))),
    }
}

pub fn trip_route<R, S>(
    searcher: Arc<Searcher<R, S>>,
    sessions: Arc<Sessions>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    R: RouteResolver + 'static,
    S: StatisticsClient + 'static,
{
    let cors = warp::cors().allow_any_origin();
    warp::path!("trip" / String / String)
        .and(warp::query::<SessionQuery>())
        .and(with_data(searcher))
        .and(with_data(sessions))
        .and_then(trip_handler::<R, S>)
        .with(cors)
}
