pub mod chart;
pub mod table;
pub mod xml;

pub use chart::SvgChart;
pub use table::TableRenderer;

/// Shown in place of the charts when the statistics have no flights
pub const NO_DIRECT_FLIGHTS: &str = "No direct flights between these cities";
