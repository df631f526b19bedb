use std::error::Error;
use std::sync::Arc;

use log::info;
use warp::Filter;

mod endpoints;
use trip_emissions::config::Config;
use trip_emissions::draw::SvgChart;
use trip_emissions::route::GoogleMaps;
use trip_emissions::statistics::HttpStatisticsClient;
use trip_emissions::{Searcher, ViewState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let config = Config::from_env()?;

    let searcher = Arc::new(Searcher::new(
        GoogleMaps::new(&config.maps_base_url, &config.maps_api_key),
        HttpStatisticsClient::new(&config.statistics_url),
    ));
    let sessions = Arc::new(endpoints::Sessions::new(|| {
        ViewState::new(SvgChart::default())
    }));

    info!(
        "Starting web server on port {}, statistics from {}",
        config.port, config.statistics_url
    );
    warp::serve(
        warp::fs::dir(config.static_dir.clone()).or(endpoints::api(searcher, sessions)),
    )
    .run(([127, 0, 0, 1], config.port))
    .await;
    Ok(())
}
