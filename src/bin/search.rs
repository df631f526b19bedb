use std::error::Error;
use std::sync::Mutex;

use clap::Parser;
use log::warn;

use trip_emissions::config::Config;
use trip_emissions::draw::TableRenderer;
use trip_emissions::route::GoogleMaps;
use trip_emissions::search::Submitted;
use trip_emissions::series::Year;
use trip_emissions::session::lock;
use trip_emissions::statistics::HttpStatisticsClient;
use trip_emissions::{Searcher, ViewState, YearWindow};

/// Look up the flights between two places and print them as a table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where the trip starts, anything the mapping service understands
    from: String,
    /// Where the trip ends
    to: String,
    /// First year to show, defaults to the earliest in the data
    #[arg(long)]
    start: Option<Year>,
    /// Last year to show, defaults to the latest in the data
    #[arg(long)]
    end: Option<Year>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::from_env()?;

    let searcher = Searcher::new(
        GoogleMaps::new(&config.maps_base_url, &config.maps_api_key),
        HttpStatisticsClient::new(&config.statistics_url),
    );
    let view = Mutex::new(ViewState::new(TableRenderer::default()));

    if let Submitted::Stale(request) = searcher.submit(&view, &args.from, &args.to).await? {
        warn!("request {} was superseded", request);
        return Ok(());
    }

    let mut view = lock(&view);
    let full = view.displayed().and_then(|displayed| displayed.window);
    if let Some(full) = full {
        if args.start.is_some() || args.end.is_some() {
            let window = YearWindow::new(
                args.start.unwrap_or(full.start),
                args.end.unwrap_or(full.end),
            );
            view.set_window(window)?;
        }
    }

    if let Some(displayed) = view.displayed() {
        println!(
            "{} to {}: {} by road",
            displayed.trip.origin.city, displayed.trip.destination.city, displayed.summary
        );
        if let Some(window) = displayed.window.filter(|window| window.is_degenerate()) {
            println!("{} is a single year, nothing to chart", window.start);
        }
    }
    for region in [view.charts(), view.message(), view.transport()].iter().flatten() {
        println!();
        print!("{}", region);
        if !region.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
