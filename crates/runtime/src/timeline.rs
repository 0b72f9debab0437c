use foundation::time::{Era, YearWindow, parse_year_input, to_signed_year};
use foundation::timescale::{slider_position, year_at_slider};

/// State behind the timeline slider and the sidebar year inputs.
///
/// Slider interactions always report an ordered window. The text inputs edit
/// one edge at a time and may leave the window reversed.
#[derive(Debug, Clone, Default)]
pub struct TimelineControl {
    window: YearWindow,
    drag: Option<RangeDrag>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct RangeDrag {
    x0: f64,
    x1: f64,
    pointer_x: f64,
    width_px: f64,
}

impl TimelineControl {
    pub fn new(window: YearWindow) -> Self {
        Self { window, drag: None }
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }

    /// Current handle positions, sorted left to right.
    pub fn handles(&self) -> (f64, f64) {
        let a = slider_position(self.window.start_year);
        let b = slider_position(self.window.end_year);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Both handles moved to `x0`/`x1` (either order).
    pub fn slider_changed(&mut self, x0: f64, x1: f64) -> YearWindow {
        let window = YearWindow::new(year_at_slider(x0), year_at_slider(x1)).ordered();
        self.window = window;
        window
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Grab the selected range at `pointer_x` on a track `width_px` wide.
    pub fn begin_range_drag(&mut self, pointer_x: f64, width_px: f64) {
        if width_px <= 0.0 || !width_px.is_finite() {
            return;
        }
        let (x0, x1) = self.handles();
        self.drag = Some(RangeDrag {
            x0,
            x1,
            pointer_x,
            width_px,
        });
    }

    /// Shift the grabbed range, keeping its width on the slider.
    pub fn drag_to(&mut self, pointer_x: f64) -> Option<YearWindow> {
        let drag = self.drag?;
        let delta = (pointer_x - drag.pointer_x) / drag.width_px;
        let range = drag.x1 - drag.x0;
        let next_x0 = (drag.x0 + delta).clamp(0.0, 1.0 - range);
        Some(self.slider_changed(next_x0, next_x0 + range))
    }

    pub fn end_range_drag(&mut self) {
        self.drag = None;
    }

    pub fn set_start_input(&mut self, text: &str, era: Era) -> YearWindow {
        self.window.start_year = to_signed_year(parse_year_input(text), era);
        self.window
    }

    pub fn set_end_input(&mut self, text: &str, era: Era) -> YearWindow {
        self.window.end_year = to_signed_year(parse_year_input(text), era);
        self.window
    }

    /// Flip the era of the start year, keeping its magnitude.
    pub fn set_start_era(&mut self, era: Era) -> YearWindow {
        self.window.start_year = to_signed_year(self.window.start_year, era);
        self.window
    }

    pub fn set_end_era(&mut self, era: Era) -> YearWindow {
        self.window.end_year = to_signed_year(self.window.end_year, era);
        self.window
    }
}
