//! What is currently on display, and the renderers which draw it.
//!
//! Each area of the display holds at most one rendered handle. Installing a
//! new one drops the previous one first, a new search clears everything before
//! its request goes out.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::descriptor::TripDescriptor;
use crate::search::SearchOutcome;
use crate::series::{filter_by_year_range, year_span, TransportModes, TripData, TripRecord, Year};

/// Identifies a search submission, later submissions have larger ids
pub type RequestId = u64;

/// The selected range of years, both ends included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWindow {
    pub start: Year,
    pub end: Year,
}

impl YearWindow {
    pub fn new(start: Year, end: Year) -> YearWindow {
        YearWindow { start, end }
    }

    /// Every year present in the series
    pub fn full(records: &[TripRecord]) -> Option<YearWindow> {
        year_span(records).map(|(start, end)| YearWindow { start, end })
    }

    /// A single year isn't a range, nothing gets charted for it
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn apply(&self, records: &[TripRecord]) -> Vec<TripRecord> {
        filter_by_year_range(records, self.start, self.end)
    }
}

/// Draws the parts of the display
pub trait Renderer {
    type Output;

    /// Charts of the records within `window`, `records` has already been filtered
    fn render_series(
        &mut self,
        records: &[TripRecord],
        window: YearWindow,
    ) -> Result<Self::Output, fmt::Error>;

    /// Shown instead of the charts when there are no direct flights
    fn render_no_data(&mut self) -> Result<Self::Output, fmt::Error>;

    fn render_transport(&mut self, transport: &TransportModes) -> Result<Self::Output, fmt::Error>;
}

/// One area of the display
pub struct Region<H> {
    handle: Option<H>,
}

impl<H> Default for Region<H> {
    fn default() -> Self {
        Region { handle: None }
    }
}

impl<H> Region<H> {
    fn install(&mut self, handle: H) {
        self.dispose();
        self.handle = Some(handle);
    }

    fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
        }
    }

    pub fn get(&self) -> Option<&H> {
        self.handle.as_ref()
    }
}

/// The result of a search as it is being shown
#[derive(Debug, Clone, PartialEq)]
pub struct Displayed {
    pub request: RequestId,
    pub summary: String,
    pub trip: TripDescriptor,
    pub data: TripData,
    pub window: Option<YearWindow>,
}

impl Displayed {
    /// The records within the selected window
    pub fn windowed(&self) -> Vec<TripRecord> {
        match self.window {
            Some(window) => window.apply(self.data.records()),
            None => Vec::new(),
        }
    }
}

pub struct ViewState<R: Renderer> {
    renderer: R,
    latest_request: RequestId,
    displayed: Option<Displayed>,
    charts: Region<R::Output>,
    transport: Region<R::Output>,
    message: Region<R::Output>,
}

impl<R: Renderer> ViewState<R> {
    pub fn new(renderer: R) -> ViewState<R> {
        ViewState {
            renderer,
            latest_request: 0,
            displayed: None,
            charts: Region::default(),
            transport: Region::default(),
            message: Region::default(),
        }
    }

    /// Clear the display and hand out the id of a new submission, any earlier
    /// submission still in flight is stale from now on.
    pub fn begin_request(&mut self) -> RequestId {
        self.clear();
        self.latest_request += 1;
        self.latest_request
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        request == self.latest_request
    }

    pub fn clear(&mut self) {
        self.charts.dispose();
        self.transport.dispose();
        self.message.dispose();
        self.displayed = None;
    }

    /// Show the outcome of a search unless a newer one has been started since.
    /// Returns whether it was shown.
    pub fn apply(
        &mut self,
        request: RequestId,
        outcome: SearchOutcome,
    ) -> Result<bool, fmt::Error> {
        if !self.is_current(request) {
            warn!(
                "dropping response to request {}, request {} is newer",
                request, self.latest_request
            );
            return Ok(false);
        }
        self.clear();
        let SearchOutcome {
            summary,
            descriptor,
            data,
        } = outcome;
        let window = YearWindow::full(data.records());
        match &data {
            TripData::Series { records, .. } => {
                if let Some(window) = window {
                    draw_charts(&mut self.renderer, &mut self.charts, records, window)?;
                }
            }
            TripData::NoDirectFlights { .. } => {
                self.message.install(self.renderer.render_no_data()?);
            }
        }
        if !data.transport().is_empty() {
            self.transport
                .install(self.renderer.render_transport(data.transport())?);
        }
        self.displayed = Some(Displayed {
            request,
            summary,
            trip: descriptor,
            data,
            window,
        });
        Ok(true)
    }

    /// Select a new window over the displayed series and redraw the charts.
    /// `None` when there is no series on display.
    pub fn set_window(&mut self, window: YearWindow) -> Result<Option<&Displayed>, fmt::Error> {
        let displayed = match &mut self.displayed {
            Some(displayed) if !displayed.data.records().is_empty() => displayed,
            _ => return Ok(None),
        };
        displayed.window = Some(window);
        draw_charts(
            &mut self.renderer,
            &mut self.charts,
            displayed.data.records(),
            window,
        )?;
        Ok(Some(&*displayed))
    }

    pub fn displayed(&self) -> Option<&Displayed> {
        self.displayed.as_ref()
    }

    pub fn charts(&self) -> Option<&R::Output> {
        self.charts.get()
    }

    pub fn transport(&self) -> Option<&R::Output> {
        self.transport.get()
    }

    pub fn message(&self) -> Option<&R::Output> {
        self.message.get()
    }
}

fn draw_charts<R: Renderer>(
    renderer: &mut R,
    charts: &mut Region<R::Output>,
    records: &[TripRecord],
    window: YearWindow,
) -> fmt::Result {
    charts.dispose();
    if window.is_degenerate() {
        debug!("window {}..={} is a single year, not charting", window.start, window.end);
        return Ok(());
    }
    charts.install(renderer.render_series(&window.apply(records), window)?);
    Ok(())
}
