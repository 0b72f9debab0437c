//! Nonlinear time axis.
//!
//! Calendar years map to a normalized coordinate `u` in `[0, 1]` where `u = 0`
//! is the present and `u = 1` is the oldest representable past. The mapping is
//! an inverse power of the age, so recent centuries get most of the axis and
//! billions of years still fit at the far end.
//!
//! The timeline widget draws the past on the left, so slider positions are
//! `x = 1 - u`.

/// The "now" anchor of the axis.
pub const PRESENT_YEAR: i64 = 2025;
/// Oldest representable age, in years before [`PRESENT_YEAR`].
///
/// Roughly the age of the Earth. Anything shorter would push the 1.8 By
/// timeline mark off the end of the slider.
pub const MAX_AGE: i64 = 4_500_000_000;
/// Higher values give more resolution near the present.
pub const EXPONENT: f64 = 4.0;

/// Oldest year the axis can represent.
pub const OLDEST_YEAR: i64 = PRESENT_YEAR - MAX_AGE;
/// Latest year a four-digit xsd date can carry.
pub const LATEST_YEAR: i64 = 9999;

/// Ages (years before present) that get a labelled tick on the timeline.
pub const MARK_AGES: [i64; 5] = [0, 10_000, 1_000_000, 100_000_000, 1_800_000_000];

pub fn year_to_normalized(year: i64) -> f64 {
    let age = PRESENT_YEAR.saturating_sub(year).clamp(0, MAX_AGE);
    (age as f64 / MAX_AGE as f64).powf(1.0 / EXPONENT)
}

pub fn normalized_to_year(u: f64) -> i64 {
    // NaN would otherwise survive the clamp.
    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
    let age = MAX_AGE as f64 * u.powf(EXPONENT);
    (PRESENT_YEAR as f64 - age).round() as i64
}

/// Timeline position of `year`, with the far past at 0 and the present at 1.
pub fn slider_position(year: i64) -> f64 {
    1.0 - year_to_normalized(year)
}

pub fn year_at_slider(x: f64) -> i64 {
    normalized_to_year(1.0 - x)
}

/// Label an age (or a large year magnitude) with a unit step.
pub fn format_age_label(age: i64) -> String {
    let a = age as f64;
    if age >= 1_000_000_000 {
        format!("{:.1} By", a / 1_000_000_000.0)
    } else if age >= 1_000_000 {
        format!("{} My", (a / 1_000_000.0).round())
    } else if age >= 1_000 {
        format!("{} ky", (a / 1_000.0).round())
    } else {
        age.to_string()
    }
}

/// Render a signed year: CE years literally, everything earlier as an age
/// before present (`"12kya"`, `"65mya"`).
pub fn format_year_readable(year: i64) -> String {
    if year >= 1 {
        return year.to_string();
    }
    let age = PRESENT_YEAR.saturating_sub(year);
    let a = age as f64;
    if age >= 1_000_000_000 {
        format!("{}bya", (a / 1_000_000_000.0).round())
    } else if age >= 1_000_000 {
        format!("{}mya", (a / 1_000_000.0).round())
    } else if age >= 1_000 {
        format!("{}kya", (a / 1_000.0).round())
    } else {
        format!("{age}ya")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMark {
    /// Slider position in `[0, 1]`, rounded to 6 decimals.
    pub position: f64,
    pub label: String,
}

pub fn timeline_marks() -> Vec<TimelineMark> {
    MARK_AGES
        .iter()
        .map(|&age| {
            let x = slider_position(PRESENT_YEAR - age);
            let label = if age == 0 {
                "present".to_string()
            } else {
                format!("{} ago", format_age_label(age))
            };
            TimelineMark {
                position: (x * 1e6).round() / 1e6,
                label,
            }
        })
        .collect()
}
