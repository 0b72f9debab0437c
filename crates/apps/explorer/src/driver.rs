//! Async loop that feeds view events into an [`ExplorerSession`] and runs
//! its queries through a [`QueryTransport`].

use std::time::Duration;

use foundation::bounds::GeoBounds;
use foundation::time::YearWindow;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use layers::popup::PointerEvent;
use layers::surface::{MarkerHandle, MarkerSurface};
use runtime::debounce::Millis;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::map_slot::MapSlot;
use crate::session::{Completion, ExplorerSession};
use crate::transport::QueryTransport;

/// Something the map view reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// The map finished moving or zooming.
    BoundsSettled(GeoBounds),
    /// The user picked a new year window.
    YearWindow(YearWindow),
    Pointer {
        marker: MarkerHandle,
        event: PointerEvent,
    },
}

/// Milliseconds since the loop started.
struct Clock {
    origin: Instant,
}

impl Clock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }

    fn at(&self, ms: Millis) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

/// Run the session until `events` is closed and every request and timer has
/// settled. Responses arriving while no widget is mounted are dropped.
pub async fn drive<S, T>(
    mut session: ExplorerSession,
    slot: &mut MapSlot<S>,
    transport: &T,
    mut events: mpsc::Receiver<ViewEvent>,
) -> ExplorerSession
where
    S: MarkerSurface,
    T: QueryTransport + ?Sized,
{
    let clock = Clock {
        origin: Instant::now(),
    };
    let mut in_flight = FuturesUnordered::new();
    let mut open = true;

    loop {
        let now = clock.now();
        if let Some(query) = session.poll(now) {
            let seq = query.seq;
            in_flight.push(transport.query(query.params).map(move |r| (seq, r)));
        }
        if let Some(surface) = slot.get_mut() {
            session.tick(now, surface);
        }

        let deadline = session.next_deadline();
        if !open && in_flight.is_empty() && deadline.is_none() {
            break;
        }
        let wake = clock.at(deadline.unwrap_or(now));

        tokio::select! {
            event = events.recv(), if open => {
                let now = clock.now();
                match event {
                    Some(ViewEvent::BoundsSettled(bounds)) => session.bounds_settled(bounds, now),
                    Some(ViewEvent::YearWindow(window)) => session.set_year_window(window, now),
                    Some(ViewEvent::Pointer { marker, event }) => {
                        if let Some(surface) = slot.get_mut() {
                            session.pointer(marker, event, now, surface);
                        }
                    }
                    None => open = false,
                }
            }
            Some((seq, result)) = in_flight.next(), if !in_flight.is_empty() => {
                let Some(surface) = slot.get_mut() else {
                    debug!("no map mounted, dropping response {seq:?}");
                    continue;
                };
                if let Completion::Applied { markers } = session.complete(seq, result, surface) {
                    info!("placed {markers} markers");
                }
            }
            _ = sleep_until(wake), if deadline.is_some() => {}
        }
    }

    session
}
