use crate::timescale::{LATEST_YEAR, OLDEST_YEAR};

/// Year window in astronomical numbering (0 and below are BCE).
///
/// No ordering is enforced between the edges; call [`YearWindow::ordered`]
/// where a consumer needs `start <= end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct YearWindow {
    pub start_year: i64,
    pub end_year: i64,
}

impl YearWindow {
    pub const fn new(start_year: i64, end_year: i64) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    pub fn ordered(self) -> Self {
        Self {
            start_year: self.start_year.min(self.end_year),
            end_year: self.start_year.max(self.end_year),
        }
    }

    pub fn span_years(&self) -> i64 {
        self.end_year.saturating_sub(self.start_year).saturating_abs()
    }

    /// Both edges pulled into `[OLDEST_YEAR, LATEST_YEAR]`, the range a
    /// query can carry. Edge order is left alone.
    pub fn clamped(self) -> Self {
        Self {
            start_year: self.start_year.clamp(OLDEST_YEAR, LATEST_YEAR),
            end_year: self.end_year.clamp(OLDEST_YEAR, LATEST_YEAR),
        }
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::new(1900, 2000)
    }
}

/// Era selector used by the year inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Era {
    Ad,
    Bc,
}

impl Era {
    pub fn of(year: i64) -> Self {
        if year < 0 { Era::Bc } else { Era::Ad }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Era::Ad => "AD",
            Era::Bc => "BC",
        }
    }
}

/// Apply an era to an unsigned year magnitude.
pub fn to_signed_year(year: i64, era: Era) -> i64 {
    match era {
        Era::Bc => -year.saturating_abs(),
        Era::Ad => year.saturating_abs(),
    }
}

/// Parse free-form year text such as `"1,200"`.
///
/// Thousands separators and surrounding whitespace are ignored. Anything that
/// does not parse to a finite number yields 0. Magnitudes beyond `i64`
/// saturate symmetrically, so the result can always be negated.
pub fn parse_year_input(input: &str) -> i64 {
    let cleaned: String = input.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => (v.trunc() as i64).max(-i64::MAX),
        _ => 0,
    }
}
