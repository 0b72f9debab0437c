use foundation::bounds::GeoBounds;
use foundation::time::YearWindow;
pub use foundation::timescale::{LATEST_YEAR, OLDEST_YEAR};
use protocol::{QueryParams, RESULT_LIMIT};

/// Label and article language.
pub const QUERY_LANGUAGE: &str = "en";

/// Error for request parameters that cannot be placed in a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ParamError {}

impl ParamError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Query parameters that passed validation.
///
/// Only values of this type are ever interpolated into query text: finite,
/// in-range coordinates and integral years inside the representable range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryWindow {
    bounds: GeoBounds,
    years: YearWindow,
}

impl QueryWindow {
    pub fn from_params(params: &QueryParams) -> Result<Self, ParamError> {
        let west = coordinate("lonW", params.lon_w, 180.0)?;
        let south = coordinate("latS", params.lat_s, 90.0)?;
        let east = coordinate("lonE", params.lon_e, 180.0)?;
        let north = coordinate("latN", params.lat_n, 90.0)?;
        if west > east {
            return Err(ParamError::new("lonW", "west edge is east of lonE"));
        }
        if south > north {
            return Err(ParamError::new("latS", "south edge is north of latN"));
        }

        let start = year("yearStart", params.year_start)?;
        let end = year("yearEnd", params.year_end)?;

        Ok(Self {
            bounds: GeoBounds::new(west, south, east, north),
            years: YearWindow::new(start, end),
        })
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn years(&self) -> YearWindow {
        self.years
    }
}

fn coordinate(field: &'static str, value: f64, limit: f64) -> Result<f64, ParamError> {
    if !value.is_finite() {
        return Err(ParamError::new(field, "not a finite number"));
    }
    if !(-limit..=limit).contains(&value) {
        return Err(ParamError::new(
            field,
            format!("{value} outside [-{limit}, {limit}]"),
        ));
    }
    Ok(value)
}

fn year(field: &'static str, value: f64) -> Result<i64, ParamError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ParamError::new(field, "not a whole year"));
    }
    if value < OLDEST_YEAR as f64 || value > LATEST_YEAR as f64 {
        return Err(ParamError::new(
            field,
            format!("{value} outside [{OLDEST_YEAR}, {LATEST_YEAR}]"),
        ));
    }
    Ok(value as i64)
}

/// Signed, zero-padded xsd year: `0500`, `-0500`, `-65000000`.
pub fn xsd_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    }
}

/// Render the fixed query: entities with a coordinate inside the box and a
/// point in time inside `[start-01-01, end-01-01)`.
pub fn render_query(window: &QueryWindow) -> String {
    let b = window.bounds;
    let start = xsd_year(window.years.start_year);
    let end = xsd_year(window.years.end_year);
    let lang = QUERY_LANGUAGE;
    let limit = RESULT_LIMIT;

    // f64 Display never uses exponent notation, so coordinates stay fixed-point.
    format!(
        r#"PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
PREFIX geo: <http://www.opengis.net/ont/geosparql#>
PREFIX schema: <http://schema.org/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>

SELECT ?item ?itemLabel ?coord ?when ?article WHERE {{
  SERVICE wikibase:box {{
    ?item wdt:P625 ?coord .
    bd:serviceParam wikibase:cornerWest "Point({west} {south})"^^geo:wktLiteral ;
                    wikibase:cornerEast "Point({east} {north})"^^geo:wktLiteral .
  }}
  ?item wdt:P585 ?when .
  FILTER(
    ?when >= "{start}-01-01T00:00:00Z"^^xsd:dateTime &&
    ?when <  "{end}-01-01T00:00:00Z"^^xsd:dateTime
  )
  OPTIONAL {{
    ?article schema:about ?item ;
             schema:inLanguage "{lang}" ;
             schema:isPartOf <https://{lang}.wikipedia.org/> .
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{lang}". }}
}}
LIMIT {limit}
"#,
        west = b.west,
        south = b.south,
        east = b.east,
        north = b.north,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> QueryParams {
        QueryParams {
            lon_w: -10.0,
            lat_s: 35.0,
            lon_e: 5.0,
            lat_n: 45.0,
            year_start: 1900.0,
            year_end: 2000.0,
        }
    }

    #[test]
    fn renders_box_corners_and_half_open_interval() {
        let q = render_query(&QueryWindow::from_params(&params()).expect("valid"));
        assert!(q.contains(r#"wikibase:cornerWest "Point(-10 35)"^^geo:wktLiteral"#));
        assert!(q.contains(r#"wikibase:cornerEast "Point(5 45)"^^geo:wktLiteral"#));
        assert!(q.contains(r#"?when >= "1900-01-01T00:00:00Z"^^xsd:dateTime"#));
        assert!(q.contains(r#"?when <  "2000-01-01T00:00:00Z"^^xsd:dateTime"#));
        assert!(q.contains(r#"wikibase:language "en""#));
        assert!(q.trim_end().ends_with("LIMIT 200"));
    }

    #[test]
    fn small_coordinates_stay_fixed_point() {
        let mut p = params();
        p.lon_w = -0.0000001;
        let q = render_query(&QueryWindow::from_params(&p).expect("valid"));
        assert!(q.contains("Point(-0.0000001 35)"));
    }

    #[test]
    fn bce_years_are_signed_and_padded() {
        assert_eq!(xsd_year(500), "0500");
        assert_eq!(xsd_year(0), "0000");
        assert_eq!(xsd_year(-500), "-0500");
        assert_eq!(xsd_year(-65_000_000), "-65000000");

        let mut p = params();
        p.year_start = -500.0;
        let q = render_query(&QueryWindow::from_params(&p).expect("valid"));
        assert!(q.contains(r#""-0500-01-01T00:00:00Z""#));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut p = params();
        p.lat_n = 91.0;
        assert_eq!(QueryWindow::from_params(&p).unwrap_err().field, "latN");

        let mut p = params();
        p.lon_w = f64::NAN;
        assert_eq!(QueryWindow::from_params(&p).unwrap_err().field, "lonW");
    }

    #[test]
    fn rejects_swapped_edges() {
        let mut p = params();
        p.lon_w = 20.0;
        let err = QueryWindow::from_params(&p).unwrap_err();
        assert_eq!(err.to_string(), "invalid lonW: west edge is east of lonE");
    }

    #[test]
    fn rejects_fractional_and_unrepresentable_years() {
        let mut p = params();
        p.year_start = 1900.5;
        assert_eq!(QueryWindow::from_params(&p).unwrap_err().field, "yearStart");

        let mut p = params();
        p.year_end = 10_000.0;
        assert_eq!(QueryWindow::from_params(&p).unwrap_err().field, "yearEnd");

        let mut p = params();
        p.year_start = (OLDEST_YEAR - 1) as f64;
        assert!(QueryWindow::from_params(&p).is_err());
    }

    #[test]
    fn reversed_year_window_is_passed_through() {
        let mut p = params();
        p.year_start = 2000.0;
        p.year_end = 1900.0;
        let w = QueryWindow::from_params(&p).expect("valid");
        assert_eq!(w.years(), YearWindow::new(2000, 1900));
    }
}
