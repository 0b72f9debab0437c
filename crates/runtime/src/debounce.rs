/// Milliseconds on the caller's clock.
///
/// The runtime never reads a wall clock itself; callers pass `now` in so the
/// behaviour can be replayed deterministically.
pub type Millis = u64;

/// Trailing-edge debounce.
///
/// Every [`Debouncer::schedule`] replaces the pending value and restarts the
/// quiet period. The value is released by [`Debouncer::poll`] once the quiet
/// period has elapsed without another schedule.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: Millis,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Millis,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: Millis) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> Millis {
        self.delay_ms
    }

    /// Arm (or re-arm) the timer with `value`.
    ///
    /// Returns `true` if an earlier pending value was superseded.
    pub fn schedule(&mut self, value: T, now: Millis) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: now.saturating_add(self.delay_ms),
        });
        superseded
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time at which the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }
}
