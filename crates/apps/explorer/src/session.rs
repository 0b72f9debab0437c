use foundation::bounds::GeoBounds;
use foundation::time::YearWindow;
use layers::markers::{article_points, MarkerLayer};
use layers::popup::PointerEvent;
use layers::surface::{MarkerHandle, MarkerSurface};
use protocol::{QueryParams, QueryResultRecord};
use runtime::debounce::Millis;
use runtime::sequence::{RequestSeq, RequestSequencer};
use runtime::viewport::{ViewportWatcher, QUERY_DEBOUNCE_MS};
use tracing::{debug, warn};

use crate::transport::FetchError;

/// A query that is due to be sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingQuery {
    pub seq: RequestSeq,
    pub params: QueryParams,
}

/// What happened to a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The marker set was rebuilt with this many markers.
    Applied { markers: usize },
    /// A newer request has already been applied.
    Stale,
    /// The request failed; the previous markers stay on the map.
    Failed,
}

/// Client-side state of one explorer view.
#[derive(Debug)]
pub struct ExplorerSession {
    watcher: ViewportWatcher,
    sequencer: RequestSequencer,
    markers: MarkerLayer,
    last_error: Option<String>,
}

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new(YearWindow::default())
    }
}

impl ExplorerSession {
    pub fn new(window: YearWindow) -> Self {
        Self::with_debounce(window, QUERY_DEBOUNCE_MS)
    }

    pub fn with_debounce(window: YearWindow, debounce_ms: Millis) -> Self {
        Self {
            watcher: ViewportWatcher::with_window(debounce_ms, window.clamped()),
            sequencer: RequestSequencer::new(),
            markers: MarkerLayer::new(0),
            last_error: None,
        }
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        self.watcher.bounds()
    }

    pub fn window(&self) -> YearWindow {
        self.watcher.window()
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn bounds_settled(&mut self, bounds: GeoBounds, now: Millis) {
        if self.watcher.bounds_settled(bounds.clamped(), now) {
            debug!("bounds changed, query scheduled");
        }
    }

    /// Years beyond what a query can carry are clamped, like bounds are.
    pub fn set_year_window(&mut self, window: YearWindow, now: Millis) {
        let window = window.clamped();
        if self.watcher.set_year_window(window, now) {
            debug!(
                "year window {}..{} scheduled",
                window.start_year, window.end_year
            );
        }
    }

    /// Earliest time anything in the session needs attention.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.watcher.next_deadline(), self.markers.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending_query(&self) -> bool {
        self.watcher.next_deadline().is_some()
    }

    /// The next query to send, once the view has been quiet long enough.
    pub fn poll(&mut self, now: Millis) -> Option<PendingQuery> {
        let key = self.watcher.poll(now)?;
        let seq = self.sequencer.issue();
        let params = QueryParams::from_view(key.bounds, key.window);
        debug!("issuing query {seq:?}");
        Some(PendingQuery { seq, params })
    }

    pub fn complete<S: MarkerSurface + ?Sized>(
        &mut self,
        seq: RequestSeq,
        result: Result<Vec<QueryResultRecord>, FetchError>,
        surface: &mut S,
    ) -> Completion {
        if !self.sequencer.try_apply(seq) {
            debug!("discarding stale response {seq:?}");
            return Completion::Stale;
        }
        match result {
            Ok(records) => {
                let points = article_points(records);
                self.markers.replace(points, surface);
                self.last_error = None;
                Completion::Applied {
                    markers: self.markers.len(),
                }
            }
            Err(err) => {
                warn!("query {seq:?} failed: {err}");
                self.last_error = Some(err.to_string());
                Completion::Failed
            }
        }
    }

    pub fn pointer<S: MarkerSurface + ?Sized>(
        &mut self,
        marker: MarkerHandle,
        event: PointerEvent,
        now: Millis,
        surface: &mut S,
    ) {
        self.markers.pointer(marker, event, now, surface);
    }

    pub fn tick<S: MarkerSurface + ?Sized>(&mut self, now: Millis, surface: &mut S) {
        self.markers.tick(now, surface);
    }
}
