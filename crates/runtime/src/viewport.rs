use foundation::bounds::GeoBounds;
use foundation::time::YearWindow;

use crate::debounce::{Debouncer, Millis};

/// Quiet period between the last view change and the query it triggers.
pub const QUERY_DEBOUNCE_MS: Millis = 500;

/// Everything a query depends on: the settled map extent and the year window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QueryKey {
    pub bounds: GeoBounds,
    pub window: YearWindow,
}

/// Watches the view state reported by the map and the timeline and decides
/// when a query is due.
///
/// Nothing is scheduled until the map has reported bounds at least once.
/// Re-reporting an unchanged state does not restart the quiet period.
#[derive(Debug, Clone)]
pub struct ViewportWatcher {
    bounds: Option<GeoBounds>,
    window: YearWindow,
    last_key: Option<QueryKey>,
    debounce: Debouncer<QueryKey>,
}

impl Default for ViewportWatcher {
    fn default() -> Self {
        Self::new(QUERY_DEBOUNCE_MS)
    }
}

impl ViewportWatcher {
    pub fn new(delay_ms: Millis) -> Self {
        Self::with_window(delay_ms, YearWindow::default())
    }

    pub fn with_window(delay_ms: Millis, window: YearWindow) -> Self {
        Self {
            bounds: None,
            window,
            last_key: None,
            debounce: Debouncer::new(delay_ms),
        }
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }

    /// The query key for the current state, if bounds are known.
    pub fn key(&self) -> Option<QueryKey> {
        self.bounds.map(|bounds| QueryKey {
            bounds,
            window: self.window,
        })
    }

    /// Map finished a pan/zoom.
    pub fn bounds_settled(&mut self, bounds: GeoBounds, now: Millis) -> bool {
        self.bounds = Some(bounds);
        self.rederive(now)
    }

    pub fn set_year_window(&mut self, window: YearWindow, now: Millis) -> bool {
        self.window = window;
        self.rederive(now)
    }

    /// Returns `true` if a query was (re)scheduled.
    fn rederive(&mut self, now: Millis) -> bool {
        let Some(key) = self.key() else {
            return false;
        };
        if self.last_key == Some(key) {
            return false;
        }
        self.last_key = Some(key);
        self.debounce.schedule(key, now);
        true
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.debounce.deadline()
    }

    /// The key to query with, once the quiet period has elapsed.
    pub fn poll(&mut self, now: Millis) -> Option<QueryKey> {
        self.debounce.poll(now)
    }
}
