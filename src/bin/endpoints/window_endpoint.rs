use std::sync::Arc;

use serde::Deserialize;
use warp::{reject, Filter};

use trip_emissions::series::Year;
use trip_emissions::session::{lock, SessionId};
use trip_emissions::view::YearWindow;
use trip_emissions::SearchError;

use super::{with_data, FETrip, Failure, Sessions};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    session: SessionId,
    start: Year,
    end: Year,
}

async fn window_handler(
    query: WindowQuery,
    sessions: Arc<Sessions>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session = sessions
        .existing(query.session)
        .ok_or_else(|| reject::custom(Failure::NoSession(query.session)))?;
    let mut view = lock(&session);
    match view.set_window(YearWindow::new(query.start, query.end)) {
        Ok(Some(displayed)) => Ok(warp::reply::json(&FETrip::new(query.session, displayed))),
        Ok(None) => Err(reject::custom(Failure::NothingToDraw(query.session))),
        Err(err) => Err(reject::custom(Failure::Search(SearchError::Render(err)))),
    }
}

pub fn window_route(
    sessions: Arc<Sessions>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors().allow_any_origin();
    warp::path!("window")
        .and(warp::query::<WindowQuery>())
        .and(with_data(sessions))
        .and_then(window_handler)
        .with(cors)
}
