use runtime::debounce::Millis;

/// Grace period between the pointer leaving a marker/popup and the popup
/// closing.
pub const POPUP_CLOSE_GRACE_MS: Millis = 200;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    MarkerEnter,
    MarkerLeave,
    MarkerClick,
    PopupEnter,
    PopupLeave,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    Open,
    ClosingScheduled {
        deadline: Millis,
    },
}

/// Hover-intent state machine for one marker's popup.
///
/// Entering the marker opens the popup at once. Leaving marker or popup only
/// schedules the close, so crossing the gap between the two does not flicker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HoverIntent {
    state: PopupState,
    grace_ms: Millis,
}

impl Default for HoverIntent {
    fn default() -> Self {
        Self::new(POPUP_CLOSE_GRACE_MS)
    }
}

impl HoverIntent {
    pub fn new(grace_ms: Millis) -> Self {
        Self {
            state: PopupState::Closed,
            grace_ms,
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    /// The popup is visible in every state except `Closed`.
    pub fn is_visible(&self) -> bool {
        self.state != PopupState::Closed
    }

    pub fn deadline(&self) -> Option<Millis> {
        match self.state {
            PopupState::ClosingScheduled { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Feed a pointer event. Returns the new visibility if it changed.
    pub fn handle(&mut self, event: PointerEvent, now: Millis) -> Option<bool> {
        use PointerEvent::*;

        let was_visible = self.is_visible();
        self.state = match (self.state, event) {
            (PopupState::Closed, MarkerEnter | MarkerClick) => PopupState::Open,
            // The popup surface does not exist while closed.
            (PopupState::Closed, _) => PopupState::Closed,

            (PopupState::Open, MarkerLeave | PopupLeave) => PopupState::ClosingScheduled {
                deadline: now.saturating_add(self.grace_ms),
            },
            (PopupState::Open, _) => PopupState::Open,

            (PopupState::ClosingScheduled { .. }, MarkerEnter | MarkerClick | PopupEnter) => {
                PopupState::Open
            }
            (s @ PopupState::ClosingScheduled { .. }, MarkerLeave | PopupLeave) => s,
        };

        let visible = self.is_visible();
        (visible != was_visible).then_some(visible)
    }

    /// Advance the close timer. Returns `true` if the popup just closed.
    pub fn tick(&mut self, now: Millis) -> bool {
        match self.state {
            PopupState::ClosingScheduled { deadline } if now >= deadline => {
                self.state = PopupState::Closed;
                true
            }
            _ => false,
        }
    }
}
