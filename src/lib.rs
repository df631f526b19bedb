pub mod config;
pub mod descriptor;
pub mod draw;
pub mod route;
pub mod search;
pub mod session;
pub mod statistics;
pub mod view;

pub use emission_series as series;
pub use search::{SearchError, SearchOutcome, Searcher};
pub use view::{Renderer, ViewState, YearWindow};
