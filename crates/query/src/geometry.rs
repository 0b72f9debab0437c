use foundation::bounds::LatLng;

/// A parsed WKT point. Longitude comes first, as in the literal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WktPoint {
    pub lon: f64,
    pub lat: f64,
}

impl WktPoint {
    pub fn to_lat_lng(self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

/// Parse `Point(<lon> <lat>)`.
///
/// The form is strict: exactly one space between the tokens and nothing
/// around them. Both tokens must be finite numbers.
pub fn parse_point(literal: &str) -> Option<WktPoint> {
    let inner = literal.strip_prefix("Point(")?.strip_suffix(')')?;
    let (lon, lat) = inner.split_once(' ')?;
    let lon: f64 = lon.parse().ok()?;
    let lat: f64 = lat.parse().ok()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(WktPoint { lon, lat })
}

#[cfg(test)]
mod tests {
    use super::{WktPoint, parse_point};
    use foundation::bounds::LatLng;

    #[test]
    fn lon_then_lat() {
        assert_eq!(
            parse_point("Point(-3.7 40.4)"),
            Some(WktPoint {
                lon: -3.7,
                lat: 40.4
            })
        );
        assert_eq!(
            parse_point("Point(-3.7 40.4)").map(WktPoint::to_lat_lng),
            Some(LatLng::new(40.4, -3.7))
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert_eq!(parse_point("Point(abc def)"), None);
        assert_eq!(parse_point("Point(1 NaN)"), None);
        assert_eq!(parse_point("Point(inf 2)"), None);
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(parse_point("(1 2)"), None);
        assert_eq!(parse_point("Point(1 2"), None);
        assert_eq!(parse_point("Point(1)"), None);
        assert_eq!(parse_point("Point(1  2)"), None);
        assert_eq!(parse_point("Point(1 2 3)"), None);
        assert_eq!(parse_point("LineString(1 2, 3 4)"), None);
    }
}
